//! Confirmation gate for destructive operations
//!
//! Drop table and delete ask before touching state. A `false` answer ends the
//! operation with `Cancelled` and no change.

/// Asks the operator whether an action may proceed
pub trait Confirm {
    fn ask(&mut self, action: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn ask(&mut self, action: &str) -> bool {
        self(action)
    }
}

/// Always confirms. Used for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn ask(&mut self, _action: &str) -> bool {
        true
    }
}

/// Always declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl Confirm for Decline {
    fn ask(&mut self, _action: &str) -> bool {
        false
    }
}
