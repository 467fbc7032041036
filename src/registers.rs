use crate::RegisterDecodeError;

/// Pixel storage format codes used by texture and buffer registers
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    #[default]
    Ct32,
    Ct24,
    Ct16,
    Ct16s,
    Z32,
    Z24,
    Z16,
    Z16s,
    /// 8-bit indexed
    I8,
    /// 4-bit indexed
    I4,
    /// 8-bit indexed stored in the high byte of 32-bit words
    I8h,
    /// 4-bit indexed stored in the low nibble of the high byte
    I4hl,
    /// 4-bit indexed stored in the high nibble of the high byte
    I4hh,
}

impl TryFrom<u8> for PixelFormat {
    type Error = RegisterDecodeError;

    fn try_from(code: u8) -> Result<Self, RegisterDecodeError> {
        Ok(match code {
            0x00 => Self::Ct32,
            0x01 => Self::Ct24,
            0x02 => Self::Ct16,
            0x0a => Self::Ct16s,
            0x30 => Self::Z32,
            0x31 => Self::Z24,
            0x32 => Self::Z16,
            0x3a => Self::Z16s,
            0x13 => Self::I8,
            0x14 => Self::I4,
            0x1b => Self::I8h,
            0x24 => Self::I4hl,
            0x2c => Self::I4hh,
            _ => return Err(RegisterDecodeError::UnknownPixelFormat(code)),
        })
    }
}

/// Color depth of the palette's source representation
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClutDepth {
    #[default]
    Rgba32,
    Rgb24,
    Rgba16,
    /// 16-bit with signed-wrap block addressing in raster memory
    Rgba16s,
}

impl ClutDepth {
    /// Storage width in raster memory
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Rgba32 | Self::Rgb24 => 32,
            Self::Rgba16 | Self::Rgba16s => 16,
        }
    }

    /// Meaningful color bits per entry
    pub fn color_bits(self) -> u8 {
        match self {
            Self::Rgba32 => 32,
            Self::Rgb24 => 24,
            Self::Rgba16 | Self::Rgba16s => 16,
        }
    }
}

impl TryFrom<u8> for ClutDepth {
    type Error = RegisterDecodeError;

    fn try_from(code: u8) -> Result<Self, RegisterDecodeError> {
        Ok(match code {
            0x00 => Self::Rgba32,
            0x01 => Self::Rgb24,
            0x02 => Self::Rgba16,
            0x0a => Self::Rgba16s,
            _ => return Err(RegisterDecodeError::UnknownClutDepth(code)),
        })
    }
}

/// How a palette load locates its source data
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Read a contiguous block-swizzled source starting at the base block
    #[default]
    Direct,
    /// Fetch entries through the buffer address resolver at explicit coordinates
    Gather,
}

impl TryFrom<u8> for StorageMode {
    type Error = RegisterDecodeError;

    fn try_from(code: u8) -> Result<Self, RegisterDecodeError> {
        Ok(match code {
            0 => Self::Direct,
            1 => Self::Gather,
            _ => return Err(RegisterDecodeError::UnknownStorageMode(code)),
        })
    }
}

/// Texture-configuration register bundle, the palette-identity half of a bind
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexRegisters {
    /// Source base block of the palette in raster memory
    pub clut_base: u32,
    pub texture_format: PixelFormat,
    pub clut_depth: ClutDepth,
    pub storage_mode: StorageMode,
    /// Starting 16-entry bank within the palette table (5 bits)
    pub entry_offset: u8,
    /// 3-bit load-control code selecting unconditional/conditional/suppressed reload
    pub load_control: u8,
}

/// Gather-mode source coordinates
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherRegisters {
    /// Source buffer width in pixels
    pub buffer_width: u32,
    /// Horizontal origin in units of 16 pixels
    pub u: u16,
    pub v: u16,
}

/// Alpha-expansion register bundle for 16-bit palette sources
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaRegisters {
    pub alpha0: u8,
    pub alpha1: u8,
    /// Force alpha to zero for entries whose raw value is exactly zero
    pub zero_transparent: bool,
}
