//! Preview handle registry
//!
//! Models transient, revocable preview references (the object-URL pattern
//! in browser clients) as scoped resource acquisition with guaranteed
//! release. A handle stays resolvable until explicitly released; release
//! is idempotent so every exit path (success, error, clear, replacement)
//! can revoke without bookkeeping who revoked first.
//!
//! Invariant: the number of live handles equals the number of items in the
//! active session at every observation point.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Revocable reference to a renderable preview of a selected file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "preview-{}", self.0)
    }
}

/// Registry owning all live preview handles
///
/// Interior mutability keeps acquisition and release callable from the
/// analyzer's Arc-shared state without an outer lock.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, Bytes>>,
}

impl PreviewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload and return a handle valid until released.
    ///
    /// Called at most once per session item creation.
    pub fn acquire(&self, payload: Bytes) -> PreviewHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut live) = self.live.lock() {
            live.insert(id, payload);
        }
        PreviewHandle(id)
    }

    /// Revoke a handle. Releasing an already-released handle is a no-op.
    pub fn release(&self, handle: PreviewHandle) {
        if let Ok(mut live) = self.live.lock() {
            live.remove(&handle.0);
        }
    }

    /// Revoke every handle in the slice. Idempotent per handle.
    pub fn release_all(&self, handles: &[PreviewHandle]) {
        if let Ok(mut live) = self.live.lock() {
            for handle in handles {
                live.remove(&handle.0);
            }
        }
    }

    /// Resolve a handle to its payload for rendering.
    ///
    /// Returns `None` once the handle has been released.
    pub fn resolve(&self, handle: PreviewHandle) -> Option<Bytes> {
        self.live.lock().ok().and_then(|live| live.get(&handle.0).cloned())
    }

    /// Number of currently live handles.
    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_returns_resolvable_handle() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(Bytes::from_static(b"jpeg-bytes"));

        assert_eq!(registry.live_count(), 1);
        assert_eq!(
            registry.resolve(handle).unwrap(),
            Bytes::from_static(b"jpeg-bytes")
        );
    }

    #[test]
    fn release_revokes_resolution() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(Bytes::from_static(b"x"));

        registry.release(handle);

        assert_eq!(registry.live_count(), 0);
        assert!(registry.resolve(handle).is_none());
    }

    #[test]
    fn double_release_is_a_noop() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(Bytes::from_static(b"x"));

        registry.release(handle);
        registry.release(handle);

        assert_eq!(registry.live_count(), 0, "second release must not error or underflow");
    }

    #[test]
    fn release_all_clears_every_handle_listed() {
        let registry = PreviewRegistry::new();
        let handles: Vec<_> = (0..3)
            .map(|_| registry.acquire(Bytes::from_static(b"x")))
            .collect();
        let survivor = registry.acquire(Bytes::from_static(b"keep"));

        registry.release_all(&handles);

        assert_eq!(registry.live_count(), 1);
        assert!(registry.resolve(survivor).is_some());
    }

    #[test]
    fn release_all_tolerates_already_released_handles() {
        let registry = PreviewRegistry::new();
        let a = registry.acquire(Bytes::from_static(b"a"));
        let b = registry.acquire(Bytes::from_static(b"b"));

        registry.release(a);
        registry.release_all(&[a, b]);

        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn handles_are_never_reused() {
        let registry = PreviewRegistry::new();
        let first = registry.acquire(Bytes::from_static(b"a"));
        registry.release(first);
        let second = registry.acquire(Bytes::from_static(b"b"));

        assert_ne!(
            first, second,
            "a released handle's id must not come back for a new payload"
        );
        assert!(registry.resolve(first).is_none());
    }

    #[test]
    fn live_count_tracks_acquire_release_sequences() {
        let registry = PreviewRegistry::new();
        let mut handles = Vec::new();

        for _ in 0..5 {
            handles.push(registry.acquire(Bytes::from_static(b"x")));
        }
        assert_eq!(registry.live_count(), 5);

        registry.release(handles[0]);
        registry.release(handles[3]);
        assert_eq!(registry.live_count(), 3);

        registry.release_all(&handles);
        assert_eq!(registry.live_count(), 0);
    }
}
