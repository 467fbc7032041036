#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegisterDecodeError {
    #[error("unknown pixel format code: 0x{0:02x}")]
    UnknownPixelFormat(u8),
    #[error("unknown palette depth code: 0x{0:02x}")]
    UnknownClutDepth(u8),
    #[error("unknown storage mode code: {0}")]
    UnknownStorageMode(u8),
}
