//! Overrides the thumbnail a host application serves for a given image by
//! swapping both its disk-cached bytes and its in-memory decoded bitmap,
//! then shields the overridden file from the host's own cache writeback.
//!
//! The host is reached through the [`host::ImageStorage`] and
//! [`host::BitmapCache`] traits. [`ThumbnailOverrideService::replace_thumbnail`]
//! runs the whole operation: resolve the id to a path, write the replacement
//! bytes to the high-definition path, register that path in the process-wide
//! [`ProtectedPaths`] set, and finally update the memory cache best-effort.
//! The host's file-write interception hook consults
//! [`ProtectedPaths::is_protected`] to veto writes to overridden files.

pub mod dependencies;
pub mod host;
pub mod override_service;
pub mod protected_paths;

pub use host::{BitmapCache, ImageStorage, HD_SUFFIX, THUMB_PREFIX};
pub use override_service::{OverrideError, ThumbnailOverrideService};
pub use protected_paths::ProtectedPaths;
