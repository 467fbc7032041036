/// Logical palette entries addressable by the hardware
pub const PALETTE_ENTRIES: usize = 512;

/// Owned backing buffers for the palette cache.
///
/// `raw` holds the deswizzled 16-bit palette halves: 512 logical entries plus
/// a second 512-entry half that absorbs out-of-range bank offsets (the
/// hardware clamps instead of wrapping, so overflowing writes and reads must
/// land in owned memory). 32-bit entries are stored split, low halfword at
/// index i and high halfword at i + 256.
pub struct PaletteStore {
    pub raw: Box<[u16; PALETTE_ENTRIES * 2]>,
    /// Sampler-ready RGBA expansion of the bound palette
    pub expanded: Box<[u32; 256]>,
    /// Dual-pixel cross product of a 16-entry palette for paired sampling
    pub paired: Box<[u64; 256]>,
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self {
            raw: Box::new([0; PALETTE_ENTRIES * 2]),
            expanded: Box::new([0; 256]),
            paired: Box::new([0; 256]),
        }
    }
}
