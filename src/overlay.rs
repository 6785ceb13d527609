//! Reference-counted background scroll lock for modal overlays.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tracing::trace;

/// Background scrolling is suppressed while any [`ScrollLockGuard`] lives.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        let holders = self.holders.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(holders, "scroll lock acquired");
        ScrollLockGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::Acquire)
    }
}

#[must_use = "the scroll lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        let holders = self.holders.fetch_sub(1, Ordering::AcqRel) - 1;
        trace!(holders, "scroll lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_guards_keep_the_lock() {
        let lock = ScrollLock::new();
        let outer = lock.acquire();
        let inner = lock.acquire();
        assert_eq!(lock.holders(), 2);

        drop(outer);
        assert!(lock.is_locked());
        drop(inner);
        assert!(!lock.is_locked());
    }

    #[test]
    fn reopening_replaces_the_previous_guard() {
        let lock = ScrollLock::new();
        let mut sheet: Option<ScrollLockGuard> = None;
        for _ in 0..10 {
            sheet = Some(lock.acquire());
            assert_eq!(lock.holders(), 1);
        }
        drop(sheet);
        assert!(!lock.is_locked());
    }
}
