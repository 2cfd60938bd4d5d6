//! Public editing surface composing the invoker, the mode machine and the
//! per-tool collaborators.
//!
//! Every mutating call first forces the editor back to [`EditorMode::Normal`]
//! and then routes a [`Command`] through the [`Invoker`]. Objects created by
//! collaborators outside that path are picked up afterwards and recorded as
//! add-object history entries.

mod modes;
mod operations;
mod tracking;

use std::rc::Rc;

use crate::command::{Command, CommandOutput};
use crate::config::{load_editor_config, EditorConfig};
use crate::document::Document;
use crate::error::EditorResult;
use crate::invoker::{ComponentRegistry, Invoker};
use crate::notification::{EventHub, Notification, SubscriptionId};
use crate::state::{EditorMode, ModeMachine};

use tracking::Recording;

#[derive(Debug)]
pub struct Editor {
    document: Document,
    invoker: Invoker,
    mode: ModeMachine,
    events: Rc<EventHub>,
    config: EditorConfig,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let components = ComponentRegistry::with_defaults(&config);
        Self::with_components(config, components)
    }

    /// Builds an editor from the user's `config.json`, or defaults.
    pub fn from_env() -> Self {
        Self::new(load_editor_config())
    }

    pub fn with_components(config: EditorConfig, components: ComponentRegistry) -> Self {
        let events = Rc::new(EventHub::new());
        Self {
            document: Document::new(),
            invoker: Invoker::new(components, Rc::clone(&events)),
            mode: ModeMachine::new(),
            events,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    pub fn current_state(&self) -> EditorMode {
        self.mode.mode()
    }

    pub fn events(&self) -> Rc<EventHub> {
        Rc::clone(&self.events)
    }

    pub fn subscribe(&self, listener: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn on(
        &self,
        name: &'static str,
        listener: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.events.on(name, listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.events.unsubscribe(id);
    }

    /// Leaves any tool mode, then invokes `command`.
    pub fn execute(&mut self, command: Command) -> EditorResult<CommandOutput> {
        self.end_all()?;
        let result = self.invoker.invoke(&mut self.document, command);
        self.absorb_changes(Recording::Skip);
        Ok(result?)
    }

    pub fn undo(&mut self) -> EditorResult<Option<CommandOutput>> {
        self.end_all()?;
        let result = self.invoker.undo(&mut self.document);
        self.absorb_changes(Recording::Skip);
        Ok(result?)
    }

    pub fn redo(&mut self) -> EditorResult<Option<CommandOutput>> {
        self.end_all()?;
        let result = self.invoker.redo(&mut self.document);
        self.absorb_changes(Recording::Skip);
        Ok(result?)
    }

    pub fn clear_undo_stack(&mut self) {
        self.invoker.clear_undo_stack();
    }

    pub fn clear_redo_stack(&mut self) {
        self.invoker.clear_redo_stack();
    }

    pub fn is_empty_undo_stack(&self) -> bool {
        self.invoker.is_empty_undo_stack()
    }

    pub fn is_empty_redo_stack(&self) -> bool {
        self.invoker.is_empty_redo_stack()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
