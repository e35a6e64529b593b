//! Screenshot frames and their handles.
//!
//! The backend exposes a live screenshot of the agent's browser. Each poll
//! tick fetches fresh bytes, which are decoded into an RGBA
//! [`ScreenshotFrame`] and registered in a [`ScreenshotStore`]. The store
//! hands back a [`HandleId`]; the session keeps only the id in its
//! [`ScreenshotSlot`].
//!
//! Frames are large, so handles are released explicitly when superseded.
//! [`ScreenshotStore::replace`] is the only way the session swaps slots, and
//! it always releases the outgoing handle. The placeholder and empty slots
//! own nothing and are never released.
//!
//! # Example
//!
//! ```
//! use seekterm::screenshot::{ScreenshotSlot, ScreenshotStore};
//!
//! let mut store = ScreenshotStore::new();
//! let mut slot = ScreenshotSlot::Empty;
//!
//! store.replace(&mut slot, ScreenshotSlot::Placeholder);
//! store.replace(&mut slot, ScreenshotSlot::Placeholder);
//!
//! assert!(slot.is_placeholder());
//! assert_eq!(store.released_count(), 0);
//! ```

use std::collections::HashMap;

use crate::error::{SeekError, SeekResult};

/// Maximum accepted screenshot payload (20MB).
pub const MAX_SCREENSHOT_SIZE: usize = 20 * 1024 * 1024;

/// Opaque reference to a frame held by a [`ScreenshotStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    /// Returns the raw id value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What the browser view currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenshotSlot {
    /// Nothing has been fetched yet.
    #[default]
    Empty,
    /// The last fetch failed; a fixed fallback is shown.
    Placeholder,
    /// A materialized frame.
    Handle(HandleId),
}

impl ScreenshotSlot {
    /// Returns `true` if there is anything to show (a frame or the placeholder).
    #[must_use]
    pub fn is_present(self) -> bool {
        !matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Returns the frame handle, if the slot holds one.
    #[must_use]
    pub fn handle(self) -> Option<HandleId> {
        match self {
            Self::Handle(id) => Some(id),
            Self::Empty | Self::Placeholder => None,
        }
    }
}

/// Decoded RGBA pixels of one screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotFrame {
    width: u32,
    height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pixels: Vec<u8>,
}

impl ScreenshotFrame {
    /// Creates a frame from raw RGBA pixels.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decodes PNG or JPEG bytes into a frame.
    ///
    /// The format is detected from magic bytes, not trusted from headers.
    ///
    /// # Errors
    ///
    /// Returns [`SeekError::Image`] if the payload is too large, is not a
    /// PNG/JPEG, or fails to decode.
    pub fn decode(bytes: &[u8]) -> SeekResult<Self> {
        if bytes.len() > MAX_SCREENSHOT_SIZE {
            return Err(SeekError::image(format!(
                "payload of {} bytes exceeds maximum of {MAX_SCREENSHOT_SIZE} bytes",
                bytes.len()
            )));
        }

        let format = detect_format(bytes)
            .ok_or_else(|| SeekError::image("unsupported or unrecognized image format"))?;

        let rgba = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| SeekError::image(format!("failed to decode image: {e}")))?
            .to_rgba8();

        let (width, height) = rgba.dimensions();
        Ok(Self::new(width, height, rgba.into_raw()))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Detects PNG or JPEG from magic bytes.
fn detect_format(bytes: &[u8]) -> Option<image::ImageFormat> {
    // PNG: 89 50 4E 47
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some(image::ImageFormat::Png);
    }
    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(image::ImageFormat::Jpeg);
    }
    None
}

/// Owner of all materialized screenshot frames.
#[derive(Debug, Default)]
pub struct ScreenshotStore {
    next_id: u64,
    frames: HashMap<HandleId, ScreenshotFrame>,
    released: u64,
}

impl ScreenshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes` and registers the frame under a fresh handle.
    ///
    /// # Errors
    ///
    /// Returns [`SeekError::Image`] if the bytes cannot be decoded; nothing
    /// is registered in that case.
    pub fn materialize(&mut self, bytes: &[u8]) -> SeekResult<HandleId> {
        let frame = ScreenshotFrame::decode(bytes)?;
        Ok(self.insert(frame))
    }

    /// Registers an already-decoded frame.
    pub fn insert(&mut self, frame: ScreenshotFrame) -> HandleId {
        self.next_id += 1;
        let id = HandleId(self.next_id);
        self.frames.insert(id, frame);
        id
    }

    /// Releases the frame behind `id`.
    ///
    /// Returns `false` if the handle was unknown or already released.
    pub fn release(&mut self, id: HandleId) -> bool {
        if self.frames.remove(&id).is_some() {
            self.released += 1;
            tracing::trace!(handle = id.get(), "Released screenshot handle");
            true
        } else {
            false
        }
    }

    /// Swaps `slot` to `next`, releasing the outgoing handle if it held one.
    pub fn replace(&mut self, slot: &mut ScreenshotSlot, next: ScreenshotSlot) {
        let previous = std::mem::replace(slot, next);
        if let Some(id) = previous.handle() {
            if Some(id) != next.handle() {
                self.release(id);
            }
        }
    }

    #[must_use]
    pub fn frame(&self, id: HandleId) -> Option<&ScreenshotFrame> {
        self.frames.get(&id)
    }

    /// Number of frames currently held.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.frames.len()
    }

    /// Total number of successful releases since creation.
    #[must_use]
    pub fn released_count(&self) -> u64 {
        self.released
    }
}
