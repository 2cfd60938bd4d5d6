use super::event::ModeEvent;
use super::model::EditorMode;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid mode transition: from {from} using event {event:?}")]
    InvalidModeTransition { from: EditorMode, event: ModeEvent },
}
