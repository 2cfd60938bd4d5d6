use crate::command::CommandError;
use crate::components::ComponentError;
use crate::invoker::{InvokerError, RegistryError};
use crate::state::StateError;
use thiserror::Error;

pub type EditorResult<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Invoker(#[from] InvokerError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Component(#[from] ComponentError),
}
