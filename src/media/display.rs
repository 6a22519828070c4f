// SPDX-License-Identifier: MPL-2.0
//! Revocable display handles for image snapshots.
//!
//! A renderer never owns snapshot bytes; it borrows them through a
//! [`DisplayHandle`] issued by a [`DisplaySlot`]. Each slot keeps at most one
//! live handle: acquiring a handle for another snapshot revokes the previous
//! one before the new one is created, and dropping the slot revokes whatever
//! it still holds.

use crate::media::image_buffer::{ImageBuffer, SnapshotId};
use iced_core::image;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A weak, revocable reference usable by a renderer.
///
/// Clones share the same liveness flag, so revoking through the slot is
/// observed by every copy handed out earlier.
#[derive(Clone)]
pub struct DisplayHandle {
    snapshot: SnapshotId,
    handle: image::Handle,
    live: Arc<AtomicBool>,
}

impl DisplayHandle {
    fn issue(buffer: &ImageBuffer) -> Self {
        Self {
            snapshot: buffer.id(),
            handle: image::Handle::from_bytes(buffer.shared_bytes()),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Snapshot this handle renders.
    #[must_use]
    pub fn snapshot(&self) -> SnapshotId {
        self.snapshot
    }

    /// Whether the handle is still the active one for its slot.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Renderer handle, or `None` once revoked.
    #[must_use]
    pub fn handle(&self) -> Option<&image::Handle> {
        self.is_live().then_some(&self.handle)
    }

    fn revoke(&self) {
        self.live.store(false, Ordering::Release);
    }
}

impl fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayHandle")
            .field("snapshot", &self.snapshot)
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

/// Owner of the single live handle for one logical slot (e.g. "current").
#[derive(Debug, Default)]
pub struct DisplaySlot {
    active: Option<DisplayHandle>,
}

impl DisplaySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a live handle for `buffer`.
    ///
    /// Re-acquiring the snapshot already held returns the existing handle;
    /// any other snapshot revokes the held handle first.
    pub fn acquire(&mut self, buffer: &ImageBuffer) -> DisplayHandle {
        if let Some(active) = &self.active {
            if active.snapshot == buffer.id() && active.is_live() {
                return active.clone();
            }
        }
        self.release();
        let handle = DisplayHandle::issue(buffer);
        self.active = Some(handle.clone());
        handle
    }

    /// Points the slot at `buffer`, or releases it when there is none.
    pub fn sync(&mut self, buffer: Option<&ImageBuffer>) -> Option<DisplayHandle> {
        match buffer {
            Some(buffer) => Some(self.acquire(buffer)),
            None => {
                self.release();
                None
            }
        }
    }

    /// Revokes and forgets the held handle.
    pub fn release(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.revoke();
        }
    }

    /// The held handle, if any.
    #[must_use]
    pub fn active(&self) -> Option<&DisplayHandle> {
        self.active.as_ref()
    }
}

impl Drop for DisplaySlot {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{DynamicImage, RgbaImage};

    fn buffer() -> ImageBuffer {
        ImageBuffer::from_dynamic_png(&DynamicImage::ImageRgba8(RgbaImage::new(2, 2)), "test")
            .expect("png")
    }

    #[test]
    fn acquiring_another_snapshot_revokes_previous_handle() {
        let (first, second) = (buffer(), buffer());
        let mut slot = DisplaySlot::new();

        let old = slot.acquire(&first);
        assert!(old.is_live());

        let new = slot.acquire(&second);
        assert!(!old.is_live());
        assert!(old.handle().is_none());
        assert!(new.is_live());
        assert_eq!(slot.active().map(DisplayHandle::snapshot), Some(second.id()));
    }

    #[test]
    fn handle_shares_the_snapshot_bytes() {
        let image = buffer();
        let mut slot = DisplaySlot::new();
        let handle = slot.acquire(&image);

        let Some(image::Handle::Bytes(_, bytes)) = handle.handle() else {
            panic!("expected an encoded-bytes handle");
        };
        assert_eq!(bytes.as_ptr(), image.bytes().as_ptr());
        assert_eq!(bytes.len(), image.bytes().len());
    }

    #[test]
    fn reacquiring_same_snapshot_keeps_handle_alive() {
        let image = buffer();
        let mut slot = DisplaySlot::new();

        let a = slot.acquire(&image);
        let b = slot.acquire(&image);
        assert!(a.is_live());
        assert!(b.is_live());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn sync_with_nothing_releases() {
        let image = buffer();
        let mut slot = DisplaySlot::new();
        let handle = slot.acquire(&image);

        assert!(slot.sync(None).is_none());
        assert!(!handle.is_live());
        assert!(slot.active().is_none());
    }

    #[test]
    fn dropping_slot_revokes_handle() {
        let image = buffer();
        let handle = {
            let mut slot = DisplaySlot::new();
            slot.acquire(&image)
        };
        assert!(!handle.is_live());
    }
}
