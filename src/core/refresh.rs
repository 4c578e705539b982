use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one refresh request; later requests get larger tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket(u64);

/// Latest-request-wins ordering for overlapping refreshes.
///
/// Responses may complete out of order. A response is only accepted when its
/// ticket is newer than every ticket accepted so far, so an older response
/// can never replace a newer one.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl RefreshGate {
    pub(crate) fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub(crate) fn accept(&self, ticket: Ticket) -> bool {
        self.accepted.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }
}
