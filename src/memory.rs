/// Raster-memory backing store consulted by palette loads.
///
/// The cache never owns the store; callers pass a reference per write. Block
/// views expose memory from the given block number forward, in the typed
/// layout the hardware uses for that width (the signed-wrap 16-bit layout has
/// its own block addressing, hence the separate view). Pixel fetches resolve
/// (buffer base, width, x, y) through the store's address-offset resolver.
pub trait RasterMemory {
    /// 32-bit view starting at the given block, contiguous forward
    fn block32(&self, block: u32) -> &[u32];
    /// 16-bit view starting at the given block
    fn block16(&self, block: u32) -> &[u16];
    /// 16-bit signed-wrap view starting at the given block
    fn block16s(&self, block: u32) -> &[u16];

    /// Single 32-bit pixel at (x, y) in the buffer at `base` with `width` pixels per row
    fn pixel32(&self, base: u32, width: u32, x: u32, y: u32) -> u32;
    /// Single 16-bit pixel at (x, y)
    fn pixel16(&self, base: u32, width: u32, x: u32, y: u32) -> u16;
    /// Single 16-bit signed-wrap pixel at (x, y)
    fn pixel16s(&self, base: u32, width: u32, x: u32, y: u32) -> u16;
}
