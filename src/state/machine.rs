use super::error::{StateError, StateResult};
use super::{SessionEvent, SessionState, StateTransition};

#[derive(Debug)]
pub struct StateMachine {
    state: SessionState,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }

    pub fn can_transition(&self, event: SessionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: SessionEvent) -> Option<SessionState> {
        use SessionEvent::*;
        use SessionState::*;
        match (self.state, event) {
            (Unloaded | Loaded, BeginLoad) => Some(Loading),
            // A failed load still leaves usable defaults in place.
            (Loading, LoadSucceeded | LoadFailed) => Some(Loaded),
            (Loaded | Editing, Edit) => Some(Editing),
            (Saving, Edit) => Some(Saving),
            (Loaded | Editing, BeginSave) => Some(Saving),
            (Saving, SaveSucceeded) => Some(Loaded),
            (Saving, SaveFailed) => Some(Editing),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> StateResult<SessionState> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> StateMachine {
        let mut machine = StateMachine::new();
        machine.transition(SessionEvent::BeginLoad).unwrap();
        machine.transition(SessionEvent::LoadSucceeded).unwrap();
        machine
    }

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(SessionEvent::BeginLoad));
        assert!(!machine.can_transition(SessionEvent::Edit));
        assert!(!machine.can_transition(SessionEvent::BeginSave));

        let _ = machine
            .transition(SessionEvent::BeginLoad)
            .expect("unloaded -> loading should transition");

        assert!(machine.can_transition(SessionEvent::LoadSucceeded));
        assert!(machine.can_transition(SessionEvent::LoadFailed));
        assert!(!machine.can_transition(SessionEvent::BeginLoad));
    }

    #[test]
    fn failed_load_still_ends_loaded() {
        let mut machine = StateMachine::new();
        machine.transition(SessionEvent::BeginLoad).unwrap();
        assert_eq!(
            machine.transition(SessionEvent::LoadFailed).unwrap(),
            SessionState::Loaded
        );
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = loaded();
        machine.transition(SessionEvent::Edit).unwrap();
        machine.transition(SessionEvent::BeginSave).unwrap();
        machine.transition(SessionEvent::SaveSucceeded).unwrap();

        assert_eq!(machine.state(), SessionState::Loaded);
        assert_eq!(machine.history().len(), 5);
        assert_eq!(
            machine.history()[0],
            StateTransition::new(
                Some(SessionState::Unloaded),
                SessionEvent::BeginLoad,
                SessionState::Loading
            )
        );
        assert_eq!(
            machine.history()[2],
            StateTransition::new(
                Some(SessionState::Loaded),
                SessionEvent::Edit,
                SessionState::Editing
            )
        );
        assert_eq!(
            machine.history()[4],
            StateTransition::new(
                Some(SessionState::Saving),
                SessionEvent::SaveSucceeded,
                SessionState::Loaded
            )
        );
    }

    #[test]
    fn edits_during_save_stay_saving_and_failure_returns_to_editing() {
        let mut machine = loaded();
        machine.transition(SessionEvent::BeginSave).unwrap();
        assert_eq!(
            machine.transition(SessionEvent::Edit).unwrap(),
            SessionState::Saving
        );
        assert!(!machine.can_transition(SessionEvent::BeginSave));
        assert_eq!(
            machine.transition(SessionEvent::SaveFailed).unwrap(),
            SessionState::Editing
        );
        assert!(machine.state().is_dirty());
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(SessionEvent::SaveSucceeded)
            .expect_err("unloaded -> save succeeded should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: SessionState::Unloaded,
                event: SessionEvent::SaveSucceeded
            }
        ));
        assert_eq!(machine.state(), SessionState::Unloaded);
        assert!(machine.history().is_empty());
    }
}
