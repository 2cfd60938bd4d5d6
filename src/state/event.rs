use super::model::EditorMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    /// Enter a tool mode; only valid from `Normal`.
    Enter(EditorMode),
    /// Leave the current tool mode for `Normal`.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: EditorMode,
    pub event: ModeEvent,
    pub to: EditorMode,
}

impl ModeTransition {
    pub const fn new(from: EditorMode, event: ModeEvent, to: EditorMode) -> Self {
        Self { from, event, to }
    }
}
