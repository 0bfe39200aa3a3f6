//! Single-entry state record shared by a view and its in-flight operations.

use parking_lot::Mutex;

use crate::core::errors::DashboardError;

/// View state that carries a busy flag.
pub trait Gated {
    fn busy_mut(&mut self) -> &mut bool;
}

/// Holds one view's state. All mutation goes through [`StateCell::update`],
/// and the lock is never held across an `.await`.
pub struct StateCell<S> {
    inner: Mutex<S>,
}

impl<S> StateCell<S> {
    pub fn new(state: S) -> Self {
        Self { inner: Mutex::new(state) }
    }

    /// The single update entry point. Everything written inside `f` becomes
    /// visible at once.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl<S: Gated> StateCell<S> {
    /// Raises the busy flag, or fails if an operation is already outstanding.
    /// The flag drops back when the returned guard is dropped.
    pub fn try_begin(
        &self,
        busy_message: impl FnOnce() -> String,
    ) -> Result<BusyGuard<'_, S>, DashboardError> {
        self.try_begin_with(busy_message, |_| ()).map(|(guard, ())| guard)
    }

    /// Like [`StateCell::try_begin`], but also runs `f` in the update that
    /// raises the flag. A rejected call leaves the state untouched.
    pub fn try_begin_with<R>(
        &self,
        busy_message: impl FnOnce() -> String,
        f: impl FnOnce(&mut S) -> R,
    ) -> Result<(BusyGuard<'_, S>, R), DashboardError> {
        let out = self.update(|state| {
            let busy = state.busy_mut();
            if *busy {
                return Err(DashboardError::PreconditionFailed(busy_message()));
            }
            *busy = true;
            Ok(f(state))
        })?;
        Ok((BusyGuard { cell: self }, out))
    }
}

/// Clears the busy flag on drop, whether the operation succeeded or not.
pub struct BusyGuard<'a, S: Gated> {
    cell: &'a StateCell<S>,
}

impl<S: Gated> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.cell.update(|state| *state.busy_mut() = false);
    }
}
