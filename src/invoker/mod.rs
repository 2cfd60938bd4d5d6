//! Sole execution path for document mutations: runs commands, keeps the
//! linear undo/redo history and reports stack transitions.

mod registry;

use std::rc::Rc;

use thiserror::Error;

use crate::command::{Command, CommandContext, CommandError, CommandKind, CommandOutput};
use crate::components::ComponentName;
use crate::document::Document;
use crate::notification::{EventHub, Notification};

pub use registry::{Component, ComponentRegistry, RegistryError, RegistryResult};

#[derive(Debug, Error)]
pub enum InvokerError {
    #[error("command {kind} failed: {source}")]
    Command {
        kind: CommandKind,
        #[source]
        source: CommandError,
    },
}

pub type InvokerResult<T> = std::result::Result<T, InvokerError>;

#[derive(Debug)]
pub struct Invoker {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    components: ComponentRegistry,
    events: Rc<EventHub>,
}

impl Invoker {
    pub fn new(components: ComponentRegistry, events: Rc<EventHub>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            components,
            events,
        }
    }

    /// Executes `command` and makes it the newest history entry.
    ///
    /// A failing command is dropped and leaves both stacks untouched.
    pub fn invoke(
        &mut self,
        document: &mut Document,
        mut command: Command,
    ) -> InvokerResult<CommandOutput> {
        let output = command
            .execute(&mut CommandContext::new(document, &mut self.components))
            .map_err(|source| InvokerError::Command {
                kind: command.kind(),
                source,
            })?;
        tracing::debug!(command = %command.kind(), "command executed");
        self.push_undo(command);
        if let Some(command) = self.undo_stack.last_mut() {
            command.notify_executed(&output);
        }
        Ok(output)
    }

    /// Pushes an already applied command without running it.
    pub fn record(&mut self, command: Command) {
        tracing::debug!(command = %command.kind(), "command recorded");
        self.push_undo(command);
    }

    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, document: &mut Document) -> InvokerResult<Option<CommandOutput>> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(None);
        };
        let mut context = CommandContext::new(document, &mut self.components);
        let output = match command.undo(&mut context) {
            Ok(output) => output,
            Err(source) => {
                let kind = command.kind();
                self.undo_stack.push(command);
                return Err(InvokerError::Command { kind, source });
            }
        };
        tracing::debug!(command = %command.kind(), "command undone");

        self.redo_stack.push(command);
        self.events.emit(Notification::PushRedoStack);
        if self.undo_stack.is_empty() {
            self.events.emit(Notification::EmptyUndoStack);
        }
        if let Some(command) = self.redo_stack.last_mut() {
            command.notify_undone(&output);
        }
        Ok(Some(output))
    }

    /// Replays the most recently undone command through its execute callback.
    pub fn redo(&mut self, document: &mut Document) -> InvokerResult<Option<CommandOutput>> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(None);
        };
        let mut context = CommandContext::new(document, &mut self.components);
        let output = match command.execute(&mut context) {
            Ok(output) => output,
            Err(source) => {
                let kind = command.kind();
                self.redo_stack.push(command);
                return Err(InvokerError::Command { kind, source });
            }
        };
        tracing::debug!(command = %command.kind(), "command redone");

        self.undo_stack.push(command);
        self.events.emit(Notification::PushUndoStack);
        if self.redo_stack.is_empty() {
            self.events.emit(Notification::EmptyRedoStack);
        }
        if let Some(command) = self.undo_stack.last_mut() {
            command.notify_executed(&output);
        }
        Ok(Some(output))
    }

    pub fn clear_undo_stack(&mut self) {
        if self.undo_stack.is_empty() {
            return;
        }
        self.undo_stack.clear();
        self.events.emit(Notification::EmptyUndoStack);
    }

    pub fn clear_redo_stack(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        self.redo_stack.clear();
        self.events.emit(Notification::EmptyRedoStack);
    }

    pub fn is_empty_undo_stack(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn is_empty_redo_stack(&self) -> bool {
        self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn get_component(&self, name: ComponentName) -> RegistryResult<&Component> {
        self.components.get(name)
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    fn push_undo(&mut self, command: Command) {
        self.undo_stack.push(command);
        self.clear_redo_stack();
        self.events.emit(Notification::PushUndoStack);
    }
}
