// One error type for the whole crate.
// Every variant states *where* things went wrong.
// Only the window variants ever reach `main`; storage errors are logged and swallowed
// by the persistence adapter.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the framebuffer failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error), // Reading/writing the key-value store failed
    #[error("Storage quota exceeded: {needed} bytes requested, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError), // PNG encode/decode failed
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Saved drawing is not a PNG data URL")]
    NotADataUrl,
    #[error("Decode worker went away before finishing")]
    DecodeDisconnected,
}
