use std::sync::Arc;

use image::DynamicImage;

/// Prefix tag passed to [`ImageStorage::load_path`] when resolving the
/// low-resolution thumbnail variant of an image.
pub const THUMB_PREFIX: &str = "th_";

/// Suffix appended to a resolved thumbnail path to form the
/// high-definition variant written to disk.
pub const HD_SUFFIX: &str = "hd";

/// The host application's image storage, which maps opaque image ids to
/// on-disk thumbnail paths and owns the in-process bitmap cache.
///
/// The host owns this object and its synchronization; implementations are
/// expected to be callable from any thread. Both lookups return `None`
/// while the host is still starting up, which callers treat as "nothing
/// to do yet" rather than an error.
pub trait ImageStorage: Send + Sync {
    /// Looks up the on-disk path for the thumbnail variant selected by
    /// `prefix`/`suffix`. Returns `None` when the store holds no mapping
    /// for `image_id` or has not been initialized yet.
    fn load_path(&self, image_id: &str, prefix: &str, suffix: &str, refresh: bool)
        -> Option<String>;

    /// The host's in-process bitmap cache, or `None` if it has not been
    /// established yet.
    fn bitmap_cache(&self) -> Option<Arc<dyn BitmapCache>>;
}

/// The host's in-process decoded-bitmap cache keyed by thumbnail path.
///
/// All three operations are assumed internally synchronized by the host;
/// this crate never takes a lock of its own around them.
pub trait BitmapCache: Send + Sync {
    fn remove(&self, key: &str);

    fn put(&self, key: &str, bitmap: DynamicImage);

    /// Fires the host's own change notification so UI and other
    /// subscribers re-read the cache.
    fn notify_changed(&self);
}
