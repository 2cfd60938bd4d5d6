//! Reified, reversible units of document mutation.
//!
//! A [`Command`] pairs a [`CommandAction`] (execute plus a mandatory undo) with
//! optional callbacks that observe the result of whichever direction last ran.
//! Callbacks are attached with consuming builders before the command is handed
//! to the [`Invoker`](crate::invoker::Invoker), after which nothing can reach it.

mod factory;
mod operations;

use std::fmt;

use thiserror::Error;

use crate::components::{ComponentError, LoadedImage};
use crate::document::{Document, FlipSetting, ObjectId};
use crate::invoker::{ComponentRegistry, RegistryError};

pub use factory::{create, CommandRequest, FlipType, RotationType};
pub use operations::{AddObject, ClearObjects, Flip, LoadImage, RemoveObject, Rotate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    LoadImage,
    ClearObjects,
    AddObject,
    RemoveObject,
    Flip,
    Rotate,
    /// Host-defined command built around its own [`CommandAction`].
    Custom(&'static str),
}

impl CommandKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoadImage => "loadImage",
            Self::ClearObjects => "clearObjects",
            Self::AddObject => "addObject",
            Self::RemoveObject => "removeObject",
            Self::Flip => "flip",
            Self::Rotate => "rotate",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result payload of an execute or undo action.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Unit,
    /// `None` signals that no image is loaded afterwards.
    Image(Option<LoadedImage>),
    Flip { setting: FlipSetting, angle: f64 },
    Angle(f64),
    Object(ObjectId),
    Objects(Vec<ObjectId>),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Component(#[from] ComponentError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),
    #[error("cannot undo {0}: it has not been executed")]
    NotExecuted(CommandKind),
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// What an action may touch while it runs.
pub struct CommandContext<'a> {
    pub document: &'a mut Document,
    pub components: &'a mut ComponentRegistry,
}

impl<'a> CommandContext<'a> {
    pub fn new(document: &'a mut Document, components: &'a mut ComponentRegistry) -> Self {
        Self {
            document,
            components,
        }
    }
}

pub trait CommandAction: fmt::Debug {
    fn execute(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput>;

    /// Restores the observable state from before the last `execute`.
    fn undo(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput>;
}

pub type CommandCallback = Box<dyn FnMut(&CommandOutput)>;

pub struct Command {
    kind: CommandKind,
    action: Box<dyn CommandAction>,
    execute_callback: Option<CommandCallback>,
    undo_callback: Option<CommandCallback>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind)
            .field("action", &self.action)
            .field("execute_callback", &self.execute_callback.is_some())
            .field("undo_callback", &self.undo_callback.is_some())
            .finish()
    }
}

impl Command {
    pub fn new(kind: CommandKind, action: impl CommandAction + 'static) -> Self {
        Self {
            kind,
            action: Box::new(action),
            execute_callback: None,
            undo_callback: None,
        }
    }

    /// Called with the result of execute, and of every redo.
    pub fn with_execute_callback(mut self, callback: impl FnMut(&CommandOutput) + 'static) -> Self {
        self.execute_callback = Some(Box::new(callback));
        self
    }

    pub fn with_undo_callback(mut self, callback: impl FnMut(&CommandOutput) + 'static) -> Self {
        self.undo_callback = Some(Box::new(callback));
        self
    }

    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    pub(crate) fn execute(
        &mut self,
        context: &mut CommandContext<'_>,
    ) -> CommandResult<CommandOutput> {
        self.action.execute(context)
    }

    pub(crate) fn undo(
        &mut self,
        context: &mut CommandContext<'_>,
    ) -> CommandResult<CommandOutput> {
        self.action.undo(context)
    }

    pub(crate) fn notify_executed(&mut self, output: &CommandOutput) {
        if let Some(callback) = self.execute_callback.as_mut() {
            callback(output);
        }
    }

    pub(crate) fn notify_undone(&mut self, output: &CommandOutput) {
        if let Some(callback) = self.undo_callback.as_mut() {
            callback(output);
        }
    }
}
