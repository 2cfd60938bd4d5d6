use std::collections::VecDeque;

use super::error::{StateError, StateResult};
use super::{EditorMode, ModeEvent, ModeTransition};

const HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
pub struct ModeMachine {
    mode: EditorMode,
    transition_history: VecDeque<ModeTransition>,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self {
            mode: EditorMode::default(),
            transition_history: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is(&self, mode: EditorMode) -> bool {
        self.mode == mode
    }

    pub fn can_transition(&self, event: ModeEvent) -> bool {
        self.next_mode(event).is_some()
    }

    pub fn next_mode(&self, event: ModeEvent) -> Option<EditorMode> {
        match (self.mode, event) {
            (EditorMode::Normal, ModeEvent::Enter(target)) if target.is_tool() => Some(target),
            (current, ModeEvent::Exit) if current.is_tool() => Some(EditorMode::Normal),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: ModeEvent) -> StateResult<EditorMode> {
        tracing::debug!(from = %self.mode, event = ?event, "request mode transition");
        let next = self.next_mode(event).ok_or_else(|| {
            let from = self.mode;
            tracing::warn!(from = %from, event = ?event, "invalid mode transition requested");
            StateError::InvalidModeTransition { from, event }
        })?;

        if self.transition_history.len() == HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
        self.transition_history
            .push_back(ModeTransition::new(self.mode, event, next));
        self.mode = next;

        Ok(self.mode)
    }

    /// Most recent transitions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ModeTransition> {
        self.transition_history.iter()
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModeMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EditorMode::{}", self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_are_entered_only_from_normal() {
        let mut machine = ModeMachine::new();
        assert!(machine.can_transition(ModeEvent::Enter(EditorMode::Crop)));
        assert!(!machine.can_transition(ModeEvent::Enter(EditorMode::Normal)));
        assert!(!machine.can_transition(ModeEvent::Exit));

        machine
            .transition(ModeEvent::Enter(EditorMode::Text))
            .expect("normal -> text should transition");

        assert!(machine.can_transition(ModeEvent::Exit));
        assert!(!machine.can_transition(ModeEvent::Enter(EditorMode::Crop)));
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = ModeMachine::new();
        machine
            .transition(ModeEvent::Enter(EditorMode::Crop))
            .expect("enter crop");
        machine.transition(ModeEvent::Exit).expect("exit crop");
        machine
            .transition(ModeEvent::Enter(EditorMode::FreeDrawing))
            .expect("enter free drawing");

        assert!(machine.is(EditorMode::FreeDrawing));
        let history: Vec<_> = machine.history().copied().collect();
        assert_eq!(
            history,
            vec![
                ModeTransition::new(
                    EditorMode::Normal,
                    ModeEvent::Enter(EditorMode::Crop),
                    EditorMode::Crop
                ),
                ModeTransition::new(EditorMode::Crop, ModeEvent::Exit, EditorMode::Normal),
                ModeTransition::new(
                    EditorMode::Normal,
                    ModeEvent::Enter(EditorMode::FreeDrawing),
                    EditorMode::FreeDrawing
                ),
            ]
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut machine = ModeMachine::new();
        for _ in 0..HISTORY_LIMIT {
            machine
                .transition(ModeEvent::Enter(EditorMode::Crop))
                .expect("enter");
            machine.transition(ModeEvent::Exit).expect("exit");
        }
        assert_eq!(machine.history().count(), HISTORY_LIMIT);
        assert_eq!(
            machine.history().last().map(|transition| transition.to),
            Some(EditorMode::Normal)
        );
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = ModeMachine::new();

        let err = machine
            .transition(ModeEvent::Exit)
            .expect_err("normal -> exit should fail");
        assert_eq!(
            err,
            StateError::InvalidModeTransition {
                from: EditorMode::Normal,
                event: ModeEvent::Exit
            }
        );
        assert_eq!(machine.mode(), EditorMode::Normal);
        assert_eq!(machine.history().count(), 0);
    }
}
