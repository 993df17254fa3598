//! Sample widgets and a scripted scene for the trellis demo driver.

/// The sample control tree and its input script.
pub mod scene;
/// A clickable color block.
pub mod swatch;
/// A draw backend that writes calls out as text.
pub mod transcript;
