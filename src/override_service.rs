use std::fs;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use log::{debug, info};

use crate::dependencies::{Dependency, SharedFor};
use crate::host::{ImageStorage, HD_SUFFIX, THUMB_PREFIX};
use crate::protected_paths::ProtectedPaths;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("no thumbnail path mapped for image id {image_id:?}")]
    NotFound { image_id: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Replaces the host's cached representation of a thumbnail, on disk and
/// in memory, with a caller-supplied bitmap.
///
/// The disk write is the authoritative override: it must succeed before
/// anything else happens, and on success the high-definition path is
/// registered in [`ProtectedPaths`] so the host's write-interception hook
/// keeps the host from clobbering the file. The memory-cache update is
/// best-effort; if it is skipped the override is still picked up from
/// disk on the next cache miss.
pub struct ThumbnailOverrideService {
    storage: Arc<dyn ImageStorage>,
    protected: Arc<ProtectedPaths>,
}

impl ThumbnailOverrideService {
    pub fn new(storage: Arc<dyn ImageStorage>) -> Self {
        Self {
            storage,
            protected: Dependency::<ProtectedPaths>::get(),
        }
    }

    /// Like [`new`](Self::new), but with an explicit registry instead of
    /// the process-wide one.
    pub fn with_registry(storage: Arc<dyn ImageStorage>, protected: Arc<ProtectedPaths>) -> Self {
        Self { storage, protected }
    }

    /// Replaces the disk cache and memory cache of the thumbnail for
    /// `image_id` with `bitmap`.
    ///
    /// Aborts without touching anything when the id cannot be resolved or
    /// the disk write fails; either the hd file is written and its path
    /// protected, or neither happened.
    pub fn replace_thumbnail(
        &self,
        image_id: &str,
        bitmap: &DynamicImage,
    ) -> Result<(), OverrideError> {
        let path = self
            .resolve(image_id)
            .ok_or_else(|| OverrideError::NotFound {
                image_id: image_id.to_string(),
            })?;
        let hd_path = format!("{path}{HD_SUFFIX}");

        self.write_disk_override(&hd_path, bitmap)?;
        self.protected.register(hd_path.as_str());
        info!("installed thumbnail override for {image_id} at {hd_path}");

        self.write_memory_override(&path, &hd_path, bitmap);
        Ok(())
    }

    /// Maps `image_id` to the low-resolution thumbnail path via a single
    /// store lookup. `None` covers both "no mapping" and "store not
    /// initialized yet", which is normal during host startup.
    fn resolve(&self, image_id: &str) -> Option<String> {
        self.storage.load_path(image_id, THUMB_PREFIX, "", false)
    }

    /// Encodes `bitmap` as JPEG and writes it over whatever is at `path`.
    ///
    /// The encode happens fully in memory and the bytes go to a staging
    /// file that is renamed over the target, so a failure at any point
    /// leaves whatever the host already had at `path` untouched.
    fn write_disk_override(&self, path: &str, bitmap: &DynamicImage) -> Result<(), OverrideError> {
        let rgb = bitmap.to_rgb8();
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY).write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )?;

        // Stage next to the target so the rename stays on one filesystem.
        let staging = format!("{path}.tmp");
        fs::write(&staging, &encoded)?;
        if let Err(err) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        Ok(())
    }

    /// Evicts the stale low-res entry and installs `bitmap` under the hd
    /// key, then fires the host's change notification. Best-effort: a
    /// missing cache means there is nothing to override yet.
    fn write_memory_override(&self, path: &str, hd_path: &str, bitmap: &DynamicImage) {
        let Some(cache) = self.storage.bitmap_cache() else {
            debug!("bitmap cache not established, skipping memory override for {path}");
            return;
        };

        cache.remove(path);
        cache.put(hd_path, bitmap.clone());
        cache.notify_changed();
    }
}
