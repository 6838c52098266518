//! Generation tickets for overlapping operations.
//!
//! Every operation takes a ticket for its kind when it starts. When its
//! response arrives the ticket is compared with the latest one handed out
//! for that kind; an older ticket means the response is stale.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OpKind {
    Load,
    Save,
    Execute,
    Refresh,
    Functions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: OpKind,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct Generations {
    load: AtomicU64,
    save: AtomicU64,
    execute: AtomicU64,
    refresh: AtomicU64,
    functions: AtomicU64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(
        &self,
        kind: OpKind,
    ) -> &AtomicU64 {
        match kind {
            OpKind::Load => &self.load,
            OpKind::Save => &self.save,
            OpKind::Execute => &self.execute,
            OpKind::Refresh => &self.refresh,
            OpKind::Functions => &self.functions,
        }
    }

    /// Start an operation of `kind`, making every older ticket stale.
    pub fn begin(
        &self,
        kind: OpKind,
    ) -> Ticket {
        let seq = self.counter(kind).fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            kind,
            seq,
        }
    }

    /// Make every outstanding ticket of `kind` stale without starting anything.
    pub fn invalidate(
        &self,
        kind: OpKind,
    ) {
        self.counter(kind).fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(
        &self,
        ticket: Ticket,
    ) -> bool {
        self.counter(ticket.kind).load(Ordering::SeqCst) == ticket.seq
    }
}
