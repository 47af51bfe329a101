//! Two-step confirmation for destructive or final actions.
//!
//! A request parks the intended operation; nothing happens until the user
//! confirms. Cancelling drops it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<T> {
    pending: Option<T>,
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Confirmation<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `target`, replacing any earlier request.
    pub fn request(&mut self, target: T) {
        self.pending = Some(target);
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the parked target for execution.
    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
