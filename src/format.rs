use crate::registers::PixelFormat;

/// Static properties of a pixel format consulted for branch selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub bits_per_pixel: u8,
    /// Palette entry count for indexed formats, 0 otherwise
    pub palette_entries: u16,
}

impl FormatInfo {
    pub const fn new(bits_per_pixel: u8, palette_entries: u16) -> Self {
        Self {
            bits_per_pixel,
            palette_entries,
        }
    }

    pub fn is_indexed(self) -> bool {
        self.palette_entries != 0
    }
}

/// Read-only pixel-format descriptor table, indexed by [`PixelFormat`].
///
/// Injected into the cache at construction; `FormatTable::default()` holds the
/// hardware values. The high-byte/high-nibble indexed variants occupy 32-bit
/// words but address the same palette sizes as their plain counterparts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTable {
    entries: [FormatInfo; 13],
}

impl Default for FormatTable {
    #[rustfmt::skip]
    fn default() -> Self {
        Self {
            entries: [
                FormatInfo::new(32, 0),   // Ct32
                FormatInfo::new(32, 0),   // Ct24
                FormatInfo::new(16, 0),   // Ct16
                FormatInfo::new(16, 0),   // Ct16s
                FormatInfo::new(32, 0),   // Z32
                FormatInfo::new(32, 0),   // Z24
                FormatInfo::new(16, 0),   // Z16
                FormatInfo::new(16, 0),   // Z16s
                FormatInfo::new(8, 256),  // I8
                FormatInfo::new(4, 16),   // I4
                FormatInfo::new(32, 256), // I8h
                FormatInfo::new(32, 16),  // I4hl
                FormatInfo::new(32, 16),  // I4hh
            ],
        }
    }
}

impl FormatTable {
    pub fn new(entries: [FormatInfo; 13]) -> Self {
        Self { entries }
    }

    pub fn info(&self, format: PixelFormat) -> FormatInfo {
        self.entries[format as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn indexed_formats_have_palettes() {
        let table = FormatTable::default();
        assert_eq!(table.info(PixelFormat::I8).palette_entries, 256);
        assert_eq!(table.info(PixelFormat::I8h).palette_entries, 256);
        assert_eq!(table.info(PixelFormat::I4).palette_entries, 16);
        assert_eq!(table.info(PixelFormat::I4hl).palette_entries, 16);
        assert_eq!(table.info(PixelFormat::I4hh).palette_entries, 16);
        assert!(!table.info(PixelFormat::Ct32).is_indexed());
        assert!(!table.info(PixelFormat::Z16s).is_indexed());
    }
}
