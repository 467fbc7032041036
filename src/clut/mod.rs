use std::rc::Rc;

use crate::format::FormatTable;
use crate::memory::RasterMemory;
use crate::registers::{AlphaRegisters, ClutDepth, GatherRegisters, TexRegisters};

use codec::WriteCodec;
use state::{ReadState, WriteState};
use store::PaletteStore;

mod codec;
mod state;
mod store;

/// Palette (CLUT) cache and conversion engine.
///
/// Sits between raster memory and the texture sampler: decides when a palette
/// reload is required, deswizzles the source into a linear table, and lazily
/// expands it into a 32-bit sampler buffer with a memoized alpha range.
/// Single-owner; every operation is a bounded synchronous transform.
pub struct ClutCache {
    store: PaletteStore,
    write: WriteState,
    read: ReadState,
    /// Conditional-reload memory: last base address recorded per slot
    loaded_base: [u32; 2],
    formats: Rc<FormatTable>,
}

impl Default for ClutCache {
    fn default() -> Self {
        Self::new(Rc::default())
    }
}

impl ClutCache {
    pub fn new(formats: Rc<FormatTable>) -> Self {
        Self {
            store: PaletteStore::default(),
            write: WriteState::default(),
            read: ReadState::default(),
            loaded_base: [0; 2],
            formats,
        }
    }

    /// Decide whether a palette reload should proceed for these registers.
    ///
    /// Non-indexed texture formats never load and must not touch the
    /// conditional-reload slots; doing so corrupts later load decisions for
    /// real content. Otherwise the 3-bit load-control code picks between
    /// unconditional, conditional-on-base-address, and suppressed reloads
    /// before the dirty comparison runs.
    pub fn write_test(&mut self, tex: &TexRegisters, gather: &GatherRegisters) -> bool {
        if !self.formats.info(tex.texture_format).is_indexed() {
            return false;
        }

        match tex.load_control {
            0 => return false,
            1 => {}
            2 => self.loaded_base[0] = tex.clut_base,
            3 => self.loaded_base[1] = tex.clut_base,
            4 => {
                if self.loaded_base[0] == tex.clut_base {
                    return false;
                }
                self.loaded_base[0] = tex.clut_base;
            }
            5 => {
                if self.loaded_base[1] == tex.clut_base {
                    return false;
                }
                self.loaded_base[1] = tex.clut_base;
            }
            // Some titles depend on 6 and 7 never loading
            6 | 7 => return false,
            _ => unreachable!("load control is a 3-bit field"),
        }

        self.write.is_dirty(tex, gather, &self.formats)
    }

    /// Commit a palette reload: record the snapshot, invalidate the expansion
    /// cache, and run the conversion routine for this register combination.
    /// Unmapped combinations are ignored with a warning; never fails.
    pub fn write(&mut self, mem: &impl RasterMemory, tex: &TexRegisters, gather: &GatherRegisters) {
        self.write.tex = *tex;
        self.write.gather = *gather;
        self.write.dirty = false;
        self.read.dirty = true;

        let info = self.formats.info(tex.texture_format);
        let bank = usize::from(tex.entry_offset);
        let raw = &mut self.store.raw;

        match codec::select_write_codec(tex.storage_mode, tex.clut_depth, info) {
            WriteCodec::Direct32I8 => {
                codec::write_direct32_i8(mem.block32(tex.clut_base), raw, bank & 15);
            }
            WriteCodec::Direct32I4 => {
                codec::write_direct32_i4(mem.block32(tex.clut_base), raw, (bank & 15) << 4);
            }
            WriteCodec::Direct16I8 => {
                codec::write_direct16_i8(mem.block16(tex.clut_base), raw, bank << 4);
            }
            WriteCodec::Direct16I4 => {
                codec::write_direct16_i4(mem.block16(tex.clut_base), raw, bank << 4);
            }
            WriteCodec::Direct16sI8 => {
                codec::write_direct16_i8(mem.block16s(tex.clut_base), raw, bank << 4);
            }
            WriteCodec::Direct16sI4 => {
                codec::write_direct16_i4(mem.block16s(tex.clut_base), raw, bank << 4);
            }
            WriteCodec::Gather32 => {
                let offset = (bank & 15) << 4;
                for i in 0..usize::from(info.palette_entries) {
                    let x = (u32::from(gather.u) << 4) + i as u32;
                    let color =
                        mem.pixel32(tex.clut_base, gather.buffer_width, x, u32::from(gather.v));
                    raw[offset + i] = color as u16;
                    raw[offset + i + 256] = (color >> 16) as u16;
                }
            }
            WriteCodec::Gather16 => {
                let offset = bank << 4;
                for i in 0..usize::from(info.palette_entries) {
                    let x = (u32::from(gather.u) << 4) + i as u32;
                    raw[offset + i] =
                        mem.pixel16(tex.clut_base, gather.buffer_width, x, u32::from(gather.v));
                }
            }
            WriteCodec::Gather16s => {
                let offset = bank << 4;
                for i in 0..usize::from(info.palette_entries) {
                    let x = (u32::from(gather.u) << 4) + i as u32;
                    raw[offset + i] =
                        mem.pixel16s(tex.clut_base, gather.buffer_width, x, u32::from(gather.v));
                }
            }
            WriteCodec::Ignored => {
                log::warn!(
                    "palette write ignored (format {:?}, depth {:?}, mode {:?})",
                    tex.texture_format,
                    tex.clut_depth,
                    tex.storage_mode
                );
            }
        }
    }

    /// Obtain the expanded 32-bit palette, recomputing it only when the
    /// registers or palette contents changed since the last read. The returned
    /// borrow is valid until the next write or register change.
    pub fn read(&mut self, tex: &TexRegisters, alpha: &AlphaRegisters) -> &[u32; 256] {
        if self.read.is_dirty(tex, alpha, &self.formats) {
            self.read.tex = *tex;
            self.read.alpha = *alpha;
            self.read.dirty = false;
            self.read.alpha_dirty = true;

            let entries = self.formats.info(tex.texture_format).palette_entries;
            let bank = usize::from(tex.entry_offset);
            let raw = &self.store.raw;

            match tex.clut_depth {
                ClutDepth::Rgba32 | ClutDepth::Rgb24 => match entries {
                    256 => codec::expand32_i8(raw, &mut self.store.expanded, (bank & 15) << 4),
                    16 => {
                        codec::expand32_i4(raw, &mut self.store.expanded[..], (bank & 15) << 4);
                        codec::expand_pairs(&self.store.expanded, &mut self.store.paired);
                    }
                    _ => {}
                },
                ClutDepth::Rgba16 | ClutDepth::Rgba16s => match entries {
                    256 => codec::expand16(
                        &raw[bank << 4..(bank << 4) + 256],
                        &mut self.store.expanded[..],
                        alpha,
                    ),
                    16 => {
                        codec::expand16(
                            &raw[bank << 4..(bank << 4) + 16],
                            &mut self.store.expanded[..16],
                            alpha,
                        );
                        codec::expand_pairs(&self.store.expanded, &mut self.store.paired);
                    }
                    _ => {}
                },
            }
        }

        &self.store.expanded
    }

    /// Dual-pixel palette buffer filled by 4-bit-index reads
    pub fn paired(&self) -> &[u64; 256] {
        &self.store.paired
    }

    /// Cached (min, max) of the expanded palette's alpha bytes.
    ///
    /// Only meaningful directly after a current [`read`](Self::read); the
    /// ordering is a caller contract. 24-bit palettes without zero exclusion
    /// have a constant alpha, so no scan runs for them.
    pub fn alpha_min_max(&mut self) -> (u8, u8) {
        debug_assert!(!self.read.dirty, "alpha range queried before read");

        if self.read.alpha_dirty {
            self.read.alpha_dirty = false;

            if self.read.tex.clut_depth.color_bits() == 24 && !self.read.alpha.zero_transparent {
                self.read.amin = self.read.alpha.alpha0;
                self.read.amax = self.read.alpha.alpha0;
            } else {
                let entries = self.formats.info(self.read.tex.texture_format).palette_entries;
                let count = if entries == 256 { 256 } else { 16 };
                let mut amin = u8::MAX;
                let mut amax = u8::MIN;
                for &color in &self.store.expanded[..count] {
                    let a = (color >> 24) as u8;
                    amin = amin.min(a);
                    amax = amax.max(a);
                }
                self.read.amin = amin;
                self.read.amax = amax;
            }
        }

        (self.read.amin, self.read.amax)
    }

    /// Force the next write test to report dirty
    pub fn invalidate(&mut self) {
        self.write.dirty = true;
    }

    /// Invalidate if the written block lands in the same page-aligned group as
    /// the palette source. Coarse on purpose: a precise check could miss
    /// writes that only partially overlap the palette.
    pub fn invalidate_block(&mut self, block: u32) {
        if (block ^ self.write.tex.clut_base) & !0x1f == 0 {
            self.write.dirty = true;
        }
    }

    /// Invalidate if the palette source's block footprint intersects
    /// `[start_block, end_block]`. The footprint is 4 blocks, halved for
    /// 16-bit palette storage and halved again for 4-bit indices.
    pub fn invalidate_range(&mut self, start_block: u32, end_block: u32) {
        let mut blocks = 4u32;

        if self.write.tex.clut_depth.bits_per_pixel() == 16 {
            blocks >>= 1;
        }
        if self.formats.info(self.write.tex.texture_format).bits_per_pixel == 4 {
            blocks >>= 1;
        }

        let base = self.write.tex.clut_base;
        if base + blocks >= start_block && base <= end_block {
            self.write.dirty = true;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::registers::{PixelFormat, StorageMode};

    // Linear raster memory: 32-bit blocks are 64 words, 16-bit blocks 128
    struct LinearMemory {
        words: Vec<u32>,
        halves: Vec<u16>,
    }

    impl LinearMemory {
        fn new() -> Self {
            Self {
                words: vec![0; 0x8000],
                halves: vec![0; 0x10000],
            }
        }
    }

    impl RasterMemory for LinearMemory {
        fn block32(&self, block: u32) -> &[u32] {
            &self.words[block as usize * 64..]
        }

        fn block16(&self, block: u32) -> &[u16] {
            &self.halves[block as usize * 128..]
        }

        fn block16s(&self, block: u32) -> &[u16] {
            self.block16(block)
        }

        fn pixel32(&self, base: u32, width: u32, x: u32, y: u32) -> u32 {
            self.words[(base as usize * 64) + (y * width + x) as usize]
        }

        fn pixel16(&self, base: u32, width: u32, x: u32, y: u32) -> u16 {
            self.halves[(base as usize * 128) + (y * width + x) as usize]
        }

        fn pixel16s(&self, base: u32, width: u32, x: u32, y: u32) -> u16 {
            self.pixel16(base, width, x, y)
        }
    }

    fn indexed_tex(load_control: u8) -> TexRegisters {
        TexRegisters {
            clut_base: 0x100,
            texture_format: PixelFormat::I8,
            clut_depth: ClutDepth::Rgba32,
            storage_mode: StorageMode::Direct,
            entry_offset: 0,
            load_control,
        }
    }

    #[test]
    fn suppressed_load_codes_never_load() {
        let mut cache = ClutCache::default();
        cache.invalidate();
        for code in [0, 6, 7] {
            assert!(
                !cache.write_test(&indexed_tex(code), &GatherRegisters::default()),
                "code {code}"
            );
        }
    }

    #[test]
    fn non_indexed_formats_never_load_or_touch_slots() {
        let mut cache = ClutCache::default();
        let mut tex = indexed_tex(2);
        tex.texture_format = PixelFormat::Ct32;
        assert!(!cache.write_test(&tex, &GatherRegisters::default()));
        // Code 2 would have recorded the base; a later code-4 test with the
        // same base must still load
        assert!(cache.write_test(&indexed_tex(4), &GatherRegisters::default()));
    }

    #[test]
    fn write_clears_dirty_until_registers_change() {
        let mem = LinearMemory::new();
        let mut cache = ClutCache::default();
        let tex = indexed_tex(1);
        let gather = GatherRegisters::default();

        assert!(cache.write_test(&tex, &gather));
        cache.write(&mem, &tex, &gather);
        assert!(!cache.write_test(&tex, &gather));

        let mut moved = tex;
        moved.clut_base = 0x140;
        assert!(cache.write_test(&moved, &gather));
    }

    #[test]
    fn conditional_reload_tracks_slot_zero() {
        let mem = LinearMemory::new();
        let mut cache = ClutCache::default();
        let tex = indexed_tex(4);
        let gather = GatherRegisters::default();

        // Slot 0 starts at 0, base is 0x100: differs, so load and record
        assert!(cache.write_test(&tex, &gather));
        cache.write(&mem, &tex, &gather);

        // Same base now matches the slot: suppressed even though content dirty
        cache.invalidate();
        assert!(!cache.write_test(&tex, &gather));
        // The matching branch must not have rewritten the slot
        assert_eq!(cache.loaded_base[0], 0x100);

        let mut moved = tex;
        moved.clut_base = 0x180;
        assert!(cache.write_test(&moved, &gather));
        assert_eq!(cache.loaded_base[0], 0x180);
    }

    #[test]
    fn invalidate_range_footprint() {
        let mut cache = ClutCache::default();
        let mem = LinearMemory::new();
        let tex = indexed_tex(1);
        cache.write(&mem, &tex, &GatherRegisters::default());

        // 32-bit palette, 8-bit index: 4 blocks at 0x100
        cache.invalidate_range(0x105, 0x110);
        assert!(!cache.write_test(&tex, &GatherRegisters::default()));
        cache.invalidate_range(0x104, 0x110);
        assert!(cache.write_test(&tex, &GatherRegisters::default()));

        // 16-bit palette and 4-bit index halve the footprint twice
        let mut small = tex;
        small.clut_depth = ClutDepth::Rgba16;
        small.texture_format = PixelFormat::I4;
        cache.write(&mem, &small, &GatherRegisters::default());
        cache.invalidate_range(0x102, 0x110);
        assert!(!cache.write_test(&small, &GatherRegisters::default()));
        cache.invalidate_range(0x101, 0x110);
        assert!(cache.write_test(&small, &GatherRegisters::default()));
    }

    #[test]
    fn invalidate_block_checks_whole_page() {
        let mut cache = ClutCache::default();
        let mem = LinearMemory::new();
        let tex = indexed_tex(1);
        cache.write(&mem, &tex, &GatherRegisters::default());

        cache.invalidate_block(0x11f);
        assert!(cache.write_test(&tex, &GatherRegisters::default()));
        cache.write(&mem, &tex, &GatherRegisters::default());

        cache.invalidate_block(0x120);
        assert!(!cache.write_test(&tex, &GatherRegisters::default()));
    }

    #[test]
    fn alpha_range_constant_for_24_bit_without_exclusion() {
        let mem = LinearMemory::new();
        let mut cache = ClutCache::default();
        let mut tex = indexed_tex(1);
        tex.clut_depth = ClutDepth::Rgb24;
        let alpha = AlphaRegisters {
            alpha0: 0x42,
            alpha1: 0x99,
            zero_transparent: false,
        };

        cache.write(&mem, &tex, &GatherRegisters::default());
        cache.read(&tex, &alpha);
        assert_eq!(cache.alpha_min_max(), (0x42, 0x42));
    }
}
