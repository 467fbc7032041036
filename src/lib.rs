pub mod clut;
mod error;
pub mod format;
pub mod memory;
pub mod registers;

pub use clut::ClutCache;
pub use error::*;
pub use format::{FormatInfo, FormatTable};
pub use memory::RasterMemory;
pub use registers::{
    AlphaRegisters, ClutDepth, GatherRegisters, PixelFormat, StorageMode, TexRegisters,
};
