//! Process-wide set of live plugin instances.
//!
//! Hosts may load several instances from one library. Shared teardown only
//! runs when the last of them goes away.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Addresses of live instances.
pub struct InstanceRegistry {
    instances: Mutex<BTreeSet<usize>>,
}

impl InstanceRegistry {
    pub const fn new() -> Self {
        Self {
            instances: Mutex::new(BTreeSet::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<usize>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new instance.
    pub fn register(&self, address: usize) {
        let count = {
            let mut instances = self.lock();
            instances.insert(address);
            instances.len()
        };
        log::debug!("Instance {:#x} registered ({} live)", address, count);
    }

    /// Forget an instance. Returns `true` when it was the last one.
    pub fn unregister(&self, address: usize) -> bool {
        let remaining = {
            let mut instances = self.lock();
            if !instances.remove(&address) {
                return false;
            }
            instances.len()
        };
        log::debug!("Instance {:#x} unregistered ({} live)", address, remaining);
        remaining == 0
    }

    pub fn contains(&self, address: usize) -> bool {
        self.lock().contains(&address)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry shared by every wrapper in the library.
pub static ACTIVE_INSTANCES: InstanceRegistry = InstanceRegistry::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_instance_is_reported() {
        let registry = InstanceRegistry::new();
        registry.register(0x10);
        registry.register(0x20);
        assert_eq!(registry.len(), 2);

        assert!(!registry.unregister(0x10));
        assert!(registry.contains(0x20));
        assert!(registry.unregister(0x20));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_instance_is_ignored() {
        let registry = InstanceRegistry::new();
        registry.register(1);
        assert!(!registry.unregister(2));
        assert_eq!(registry.len(), 1);
    }
}
