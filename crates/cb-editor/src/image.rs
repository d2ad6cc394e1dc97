//! Image layer state: the retained background bitmap and its lock.
//!
//! At most one image is current. Once a load succeeds the image is locked;
//! further loads are refused until the session is reset.

use cb_render::Bitmap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("an image is already loaded; save or reset before loading another")]
pub struct ImageLocked;

#[derive(Debug, Clone, Default)]
pub struct ImageLayer {
    current: Option<Bitmap>,
    locked: bool,
}

impl ImageLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock check for a new load request, applied at request time.
    /// Completion order of accepted requests does not matter.
    pub fn begin_load(&self) -> Result<(), ImageLocked> {
        if self.locked && self.current.is_some() {
            return Err(ImageLocked);
        }
        Ok(())
    }

    /// Store a successfully decoded bitmap and lock it in.
    pub fn finish_load(&mut self, bitmap: Bitmap) {
        self.current = Some(bitmap);
        self.locked = true;
    }

    pub fn current(&self) -> Option<&Bitmap> {
        self.current.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Drop the image and release the lock.
    pub fn reset(&mut self) {
        self.current = None;
        self.locked = false;
    }
}
