use std::sync::atomic::{AtomicU8, Ordering};

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    #[default]
    Idle = 0,
    Draining = 1,
}

impl From<u8> for DrainState {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            _ => Self::Draining,
        }
    }
}

/// Single-flight guard of the reconciler.
///
/// Entry is an atomic `Idle -> Draining` transition, so at most one drain can hold the latch.
/// The latch goes back to `Idle` when the returned [`DrainGuard`] is dropped, which also covers a
/// drain future that is cancelled halfway.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct DrainLatch(AtomicU8);

impl DrainLatch {
    pub fn state(&self) -> DrainState {
        self.0.load(Ordering::Acquire).into()
    }

    pub fn is_draining(&self) -> bool {
        self.state() == DrainState::Draining
    }

    pub fn try_acquire(&self) -> Option<DrainGuard<'_>> {
        self.0
            .compare_exchange(DrainState::Idle as u8, DrainState::Draining as u8, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard { latch: self })
    }
}

#[must_use = "the latch is released as soon as the guard is dropped"]
pub struct DrainGuard<'a> {
    latch: &'a DrainLatch,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.latch.0.store(DrainState::Idle as u8, Ordering::Release);
    }
}
