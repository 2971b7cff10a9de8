//! Resource release accounting
//!
//! A mounted instance is released exactly once: either through the explicit
//! `dispose` entry point or, failing that, by the driver's `Drop` impl as a
//! best-effort safety net. Both paths race through the same guard, so the
//! release hook runs at most once however the instance goes out of use.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{FsError, FsResult};

/// Call-at-most-once gate for driver resource release
#[derive(Debug, Default)]
pub struct LifecycleGuard {
    released: AtomicBool,
}

impl LifecycleGuard {
    pub fn new() -> Self {
        Self {
            released: AtomicBool::new(false),
        }
    }

    /// Claim the release. Returns `true` for exactly one caller; that caller
    /// runs the release hook, every later caller sees `false`.
    pub fn begin_release(&self) -> bool {
        !self.released.swap(true, Ordering::AcqRel)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Gate for operations on a possibly-disposed instance
    pub fn ensure_live(&self) -> FsResult<()> {
        if self.is_released() {
            Err(FsError::Disposed)
        } else {
            Ok(())
        }
    }
}
