//! Per-call execution context.

use dvault_types::{Address, Timestamp};

/// Who is calling and when.
///
/// `caller` is the identity whose signature the transport has already
/// verified; `now` is the clock of the enclosing transaction. Time is never
/// read from the process clock inside the engine, so tests step it freely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self { caller, now }
    }
}
