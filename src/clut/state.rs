use crate::format::FormatTable;
use crate::registers::{AlphaRegisters, ClutDepth, GatherRegisters, StorageMode, TexRegisters};

/// True when any field identifying the palette's source changed, including a
/// change in the bit depth implied by the texture format
fn identity_changed(old: &TexRegisters, new: &TexRegisters, formats: &FormatTable) -> bool {
    old.entry_offset != new.entry_offset
        || old.storage_mode != new.storage_mode
        || old.clut_depth != new.clut_depth
        || old.clut_base != new.clut_base
        || formats.info(old.texture_format).bits_per_pixel
            != formats.info(new.texture_format).bits_per_pixel
}

/// Last register snapshot that drove (or was considered for) a palette reload
pub struct WriteState {
    pub tex: TexRegisters,
    pub gather: GatherRegisters,
    pub dirty: bool,
}

impl Default for WriteState {
    fn default() -> Self {
        Self {
            tex: TexRegisters::default(),
            gather: GatherRegisters::default(),
            dirty: true,
        }
    }
}

impl WriteState {
    /// Absorb-then-report dirty check: when clean, the snapshot is refreshed to
    /// the incoming registers so later comparisons run against current state.
    pub fn is_dirty(
        &mut self,
        tex: &TexRegisters,
        gather: &GatherRegisters,
        formats: &FormatTable,
    ) -> bool {
        let mut dirty = self.dirty;

        if identity_changed(&self.tex, tex, formats) {
            dirty = true;
        } else if tex.storage_mode == StorageMode::Gather && self.gather != *gather {
            // Gather coordinates only matter in the mode that consumes them
            dirty = true;
        }

        if !dirty {
            self.tex = *tex;
            self.gather = *gather;
        }

        dirty
    }
}

/// Last register snapshot that drove (or was considered for) an expansion
pub struct ReadState {
    pub tex: TexRegisters,
    pub alpha: AlphaRegisters,
    pub dirty: bool,
    pub alpha_dirty: bool,
    pub amin: u8,
    pub amax: u8,
}

impl Default for ReadState {
    fn default() -> Self {
        Self {
            tex: TexRegisters::default(),
            alpha: AlphaRegisters::default(),
            dirty: true,
            alpha_dirty: false,
            amin: 0,
            amax: 0,
        }
    }
}

impl ReadState {
    pub fn is_dirty(
        &mut self,
        tex: &TexRegisters,
        alpha: &AlphaRegisters,
        formats: &FormatTable,
    ) -> bool {
        let mut dirty = self.dirty;

        if identity_changed(&self.tex, tex, formats) {
            dirty = true;
        } else {
            // Only the alpha fields the current depth consumes can dirty the
            // expansion: 24-bit substitutes alpha0 alone, the 16-bit depths use
            // the full alpha bundle, 32-bit carries its own alpha channel
            match tex.clut_depth {
                ClutDepth::Rgb24 => {
                    if self.alpha.zero_transparent != alpha.zero_transparent
                        || self.alpha.alpha0 != alpha.alpha0
                    {
                        dirty = true;
                    }
                }
                ClutDepth::Rgba16 | ClutDepth::Rgba16s => {
                    if self.alpha != *alpha {
                        dirty = true;
                    }
                }
                ClutDepth::Rgba32 => {}
            }
        }

        if !dirty {
            self.tex = *tex;
            self.alpha = *alpha;
        }

        dirty
    }
}
