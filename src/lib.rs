//! Command-driven image editing core: a document of graphic objects over a
//! raster, a linear undo/redo history and exclusive tool modes.

pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod invoker;
pub mod logging;
pub mod notification;
pub mod state;

pub use command::{Command, CommandKind, CommandOutput, CommandRequest};
pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use notification::{EventHub, Notification};
pub use state::EditorMode;

/// Initialises logging and builds an editor from the user's config.
pub fn init() -> Editor {
    logging::init();
    let editor = Editor::from_env();
    tracing::info!(mode = %editor.current_state(), "image editor ready");
    editor
}
