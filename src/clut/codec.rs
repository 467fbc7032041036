use crate::format::FormatInfo;
use crate::registers::{AlphaRegisters, ClutDepth, StorageMode};

use super::store::PALETTE_ENTRIES;

/// Word position of each entry of a 16-entry group inside a 32-bit source
/// column. Empirical hardware permutation; confirmed against real content,
/// do not "clean up".
#[rustfmt::skip]
pub const COLUMN_WORDS_32: [usize; 16] = [
    0, 1, 4, 5, 8, 9, 12, 13,
    2, 3, 6, 7, 10, 11, 14, 15,
];

/// Source word base of each 16-entry group of a 256-entry 32-bit palette,
/// for groups 0..8; groups 8..16 add 0x80 (two blocks)
pub const GROUP_BASE_32: [usize; 8] = [0, 64, 16, 80, 32, 96, 48, 112];

/// Word position of each entry of a 32-entry group inside a 16-bit source
/// column pair. The first 16 entries are the whole permutation for 16-entry
/// palettes.
#[rustfmt::skip]
pub const COLUMN_WORDS_16: [usize; 32] = [
    0, 2, 8, 10, 16, 18, 24, 26,
    4, 6, 12, 14, 20, 22, 28, 30,
    1, 3, 9, 11, 17, 19, 25, 27,
    5, 7, 13, 15, 21, 23, 29, 31,
];

/// Raw table type: 512 logical split-halfword entries plus the overflow half
pub type RawTable = [u16; PALETTE_ENTRIES * 2];

/// Conversion routine selected for a palette write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCodec {
    Direct32I8,
    Direct32I4,
    Direct16I8,
    Direct16I4,
    Direct16sI8,
    Direct16sI4,
    Gather32,
    Gather16,
    Gather16s,
    /// Unmapped combination: the write is ignored (required behavior, some
    /// content issues these expecting exactly that)
    Ignored,
}

/// Every (mode, depth, index width) key resolves to a codec, unsupported ones
/// included.
pub fn select_write_codec(mode: StorageMode, depth: ClutDepth, info: FormatInfo) -> WriteCodec {
    match (mode, depth, info.palette_entries) {
        // 24-bit sources load through the 32-bit path
        (StorageMode::Direct, ClutDepth::Rgba32 | ClutDepth::Rgb24, 256) => WriteCodec::Direct32I8,
        (StorageMode::Direct, ClutDepth::Rgba32 | ClutDepth::Rgb24, 16) => WriteCodec::Direct32I4,
        (StorageMode::Direct, ClutDepth::Rgba16, 256) => WriteCodec::Direct16I8,
        (StorageMode::Direct, ClutDepth::Rgba16, 16) => WriteCodec::Direct16I4,
        (StorageMode::Direct, ClutDepth::Rgba16s, 256) => WriteCodec::Direct16sI8,
        (StorageMode::Direct, ClutDepth::Rgba16s, 16) => WriteCodec::Direct16sI4,
        (StorageMode::Gather, ClutDepth::Rgba32 | ClutDepth::Rgb24, 256 | 16) => {
            WriteCodec::Gather32
        }
        (StorageMode::Gather, ClutDepth::Rgba16, 256 | 16) => WriteCodec::Gather16,
        (StorageMode::Gather, ClutDepth::Rgba16s, 256 | 16) => WriteCodec::Gather16s,
        _ => WriteCodec::Ignored,
    }
}

/// Deswizzle one 16-entry group of 32-bit words, splitting each color into its
/// low halfword at `dst` and high halfword at `dst + 256`
fn write_group32(src: &[u32], raw: &mut RawTable, dst: usize) {
    for (k, &word) in COLUMN_WORDS_32.iter().enumerate() {
        let color = src[word];
        raw[dst + k] = color as u16;
        raw[dst + k + 256] = (color >> 16) as u16;
    }
}

/// 256-entry 32-bit direct load. `start_bank` selects the first 16-entry group
/// filled; earlier groups are skipped, not shifted.
pub fn write_direct32_i8(src: &[u32], raw: &mut RawTable, start_bank: usize) {
    for group in start_bank..16 {
        let base = GROUP_BASE_32[group & 7] | ((group & 8) << 4);
        write_group32(&src[base..base + 16], raw, group << 4);
    }
}

/// 16-entry 32-bit direct load into the bank at `dst`
pub fn write_direct32_i4(src: &[u32], raw: &mut RawTable, dst: usize) {
    write_group32(&src[..16], raw, dst);
}

/// 256-entry 16-bit direct load into consecutive entries at `dst`
pub fn write_direct16_i8(src: &[u16], raw: &mut RawTable, dst: usize) {
    for group in 0..8 {
        for (k, &word) in COLUMN_WORDS_16.iter().enumerate() {
            raw[dst + group * 32 + k] = src[group * 32 + word];
        }
    }
}

/// 16-entry 16-bit direct load into the bank at `dst`
pub fn write_direct16_i4(src: &[u16], raw: &mut RawTable, dst: usize) {
    for k in 0..16 {
        raw[dst + k] = src[COLUMN_WORDS_16[k]];
    }
}

/// Recombine split 32-bit entries into the sampler buffer, 16 entries per
/// group. The bank offset clamps to the last bank (240) instead of wrapping;
/// wrapping produces visibly wrong colors on known content.
pub fn expand32_i8(raw: &RawTable, dst: &mut [u32; 256], offset: usize) {
    for i in (0..256).step_by(16) {
        let base = (i + offset).min(240);
        for k in 0..16 {
            dst[i + k] = u32::from(raw[base + k]) | u32::from(raw[base + k + 256]) << 16;
        }
    }
}

/// Recombine one 16-entry group of split 32-bit entries
pub fn expand32_i4(raw: &RawTable, dst: &mut [u32], offset: usize) {
    for k in 0..16 {
        dst[k] = u32::from(raw[offset + k]) | u32::from(raw[offset + k + 256]) << 16;
    }
}

/// Widen packed 5-5-5 entries to 8-bit channels and synthesize alpha: bit 15
/// selects between the two configured alpha bytes, and a raw value of exactly
/// zero forces alpha 0 when exclusion is enabled
pub fn expand16(src: &[u16], dst: &mut [u32], alpha: &AlphaRegisters) {
    for (out, &c) in dst.iter_mut().zip(src) {
        let a = if alpha.zero_transparent && c == 0 {
            0
        } else if c & 0x8000 != 0 {
            alpha.alpha1
        } else {
            alpha.alpha0
        };
        *out = u32::from(c & 0x001f) << 3
            | u32::from(c & 0x03e0) << 6
            | u32::from(c & 0x7c00) << 9
            | u32::from(a) << 24;
    }
}

/// Cross product of a 16-entry palette for the dual-pixel sampling path:
/// `paired[h * 16 + l]` holds entry h in the high word and entry l in the low
pub fn expand_pairs(expanded: &[u32; 256], paired: &mut [u64; 256]) {
    for h in 0..16 {
        for l in 0..16 {
            paired[h * 16 + l] = u64::from(expanded[h]) << 32 | u64::from(expanded[l]);
        }
    }
}
