use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

/// Set of thumbnail paths whose on-disk bytes have been overridden.
///
/// The host's file-write interception hook polls [`is_protected`] on its
/// write path to veto overwrites of these files, so reads must never block
/// behind a slow writer or observe a half-updated set. Updates go through
/// copy-on-write: `register` builds a new set and swaps the `Arc` in one
/// store, and readers work off whichever immutable snapshot they grabbed.
///
/// The set only grows. Nothing in this crate removes entries; cleanup, if
/// the host ever wants it, is the host's problem.
///
/// [`is_protected`]: ProtectedPaths::is_protected
pub struct ProtectedPaths {
    paths: RwLock<Arc<HashSet<String>>>,
}

impl ProtectedPaths {
    pub fn new() -> Self {
        Self {
            paths: RwLock::new(Arc::new(HashSet::new())),
        }
    }

    /// Marks `path` as protected. Call only after the disk write for the
    /// path has fully succeeded.
    pub fn register(&self, path: impl Into<String>) {
        let mut guard = self.paths.write();
        let mut next = HashSet::clone(&guard);
        next.insert(path.into());
        *guard = Arc::new(next);
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.snapshot().contains(path)
    }

    /// The current immutable snapshot. The write lock is held only for the
    /// `Arc` clone, never across I/O.
    pub fn snapshot(&self) -> Arc<HashSet<String>> {
        Arc::clone(&self.paths.read())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl Default for ProtectedPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_register_then_is_protected() {
        let paths = ProtectedPaths::new();
        assert!(!paths.is_protected("/storage/th_abc123hd"));

        paths.register("/storage/th_abc123hd");
        assert!(paths.is_protected("/storage/th_abc123hd"));
        assert!(!paths.is_protected("/storage/th_abc123"));
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_register_is_idempotent() {
        let paths = ProtectedPaths::new();
        paths.register("/storage/th_abc123hd");
        paths.register("/storage/th_abc123hd");
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_snapshot_is_immutable() {
        let paths = ProtectedPaths::new();
        paths.register("/storage/th_one_hd");

        let before = paths.snapshot();
        paths.register("/storage/th_two_hd");

        assert_eq!(before.len(), 1);
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_concurrent_registers_lose_no_updates() {
        let paths = Arc::new(ProtectedPaths::new());
        let threads = 8;
        let per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let paths = Arc::clone(&paths);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        paths.register(format!("/storage/th_{t}_{i}hd"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(paths.len(), threads * per_thread);
        for t in 0..threads {
            for i in 0..per_thread {
                assert!(paths.is_protected(&format!("/storage/th_{t}_{i}hd")));
            }
        }
    }

    #[test]
    fn test_readers_never_observe_rollback() {
        let paths = Arc::new(ProtectedPaths::new());
        let total = 200;

        let writer = {
            let paths = Arc::clone(&paths);
            thread::spawn(move || {
                for i in 0..total {
                    paths.register(format!("/storage/th_{i}hd"));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let paths = Arc::clone(&paths);
                thread::spawn(move || {
                    let mut last_seen = 0;
                    while last_seen < total {
                        let size = paths.len();
                        assert!(size >= last_seen, "snapshot shrank: {size} < {last_seen}");
                        last_seen = size;
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(paths.len(), total);
    }
}
