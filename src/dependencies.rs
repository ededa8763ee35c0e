use std::{marker::PhantomData, sync::Arc};

use once_cell::sync::Lazy;

use crate::protected_paths::ProtectedPaths;

macro_rules! shared {
    ($name: ident, $type:ty, $init:expr) => {
        static $name: Lazy<Arc<$type>> = Lazy::new(|| Arc::new($init));

        impl SharedFor<$type> for Dependency<$type> {
            fn get() -> Arc<$type> {
                Arc::clone(&$name)
            }
        }
    };
}

/// Process-wide services, handed out as `Arc`s so call sites that cannot
/// be passed an explicit handle (the host's write-interception hook) still
/// reach the same instance. Registered types are internally synchronized.
pub trait SharedFor<T> {
    fn get() -> Arc<T>;
}

pub struct Dependency<T>(PhantomData<T>);

shared!(PROTECTED_PATHS_INSTANCE, ProtectedPaths, ProtectedPaths::new());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_paths_is_a_single_instance() {
        let a = Dependency::<ProtectedPaths>::get();
        let b = Dependency::<ProtectedPaths>::get();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
