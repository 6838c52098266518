use crate::{
    controller::generation::{OpKind, Ticket},
    model::RuleId,
};

/// Where the editor stands relative to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
pub enum EditorState {
    /// Editing a fresh graph that was never saved.
    Empty,
    /// Editing the working copy of a stored rule.
    Loaded(RuleId),
    /// A save request is in flight.
    Saving,
    /// An execute request is in flight.
    Executing,
}

/// Stable state plus the save and execute requests currently in flight.
#[derive(Debug, Clone, Default)]
pub(crate) struct Session {
    pub current_rule_id: Option<RuleId>,
    saving: Option<Ticket>,
    executing: Option<Ticket>,
}

impl Session {
    pub fn state(&self) -> EditorState {
        if self.saving.is_some() {
            return EditorState::Saving;
        }
        if self.executing.is_some() {
            return EditorState::Executing;
        }
        match self.current_rule_id {
            Some(id) => EditorState::Loaded(id),
            None => EditorState::Empty,
        }
    }

    fn slot(
        &mut self,
        kind: OpKind,
    ) -> Option<&mut Option<Ticket>> {
        match kind {
            OpKind::Save => Some(&mut self.saving),
            OpKind::Execute => Some(&mut self.executing),
            _ => None,
        }
    }

    /// Enter the transient state for `ticket`'s kind.
    pub fn start(
        &mut self,
        ticket: Ticket,
    ) {
        if let Some(slot) = self.slot(ticket.kind) {
            *slot = Some(ticket);
        }
    }

    /// Leave the transient state `ticket` put us in, unless a later
    /// operation of the same kind has taken over since.
    pub fn finish(
        &mut self,
        ticket: Ticket,
    ) {
        if let Some(slot) = self.slot(ticket.kind) {
            if *slot == Some(ticket) {
                *slot = None;
            }
        }
    }

    /// Drop every transient state, e.g. when the session is discarded.
    pub fn clear_transient(&mut self) {
        self.saving = None;
        self.executing = None;
    }
}
