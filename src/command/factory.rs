use crate::components::ImageSource;
use crate::document::{GraphicObject, ObjectId};

use super::{AddObject, ClearObjects, Command, CommandKind, Flip, LoadImage, RemoveObject, Rotate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipType {
    X,
    Y,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationType {
    /// Adds a delta to the current angle.
    Rotate(f64),
    SetAngle(f64),
}

/// One entry of the editing operation catalog with its bound arguments.
#[derive(Debug, Clone)]
pub enum CommandRequest {
    LoadImage { name: String, source: ImageSource },
    ClearObjects,
    AddObject(GraphicObject),
    RemoveObject(ObjectId),
    Flip(FlipType),
    Rotate(RotationType),
}

impl CommandRequest {
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::LoadImage { .. } => CommandKind::LoadImage,
            Self::ClearObjects => CommandKind::ClearObjects,
            Self::AddObject(_) => CommandKind::AddObject,
            Self::RemoveObject(_) => CommandKind::RemoveObject,
            Self::Flip(_) => CommandKind::Flip,
            Self::Rotate(_) => CommandKind::Rotate,
        }
    }
}

/// Builds the command for `request`, without callbacks.
pub fn create(request: CommandRequest) -> Command {
    let kind = request.kind();
    match request {
        CommandRequest::LoadImage { name, source } => {
            Command::new(kind, LoadImage::new(name, source))
        }
        CommandRequest::ClearObjects => Command::new(kind, ClearObjects::new()),
        CommandRequest::AddObject(object) => Command::new(kind, AddObject::new(object)),
        CommandRequest::RemoveObject(id) => Command::new(kind, RemoveObject::new(id)),
        CommandRequest::Flip(flip_type) => Command::new(kind, Flip::new(flip_type)),
        CommandRequest::Rotate(rotation) => Command::new(kind, Rotate::new(rotation)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_command_carries_request_kind() {
        let requests = [
            CommandRequest::ClearObjects,
            CommandRequest::RemoveObject(ObjectId::new(1)),
            CommandRequest::Flip(FlipType::Reset),
            CommandRequest::Rotate(RotationType::SetAngle(45.0)),
            CommandRequest::LoadImage {
                name: "a".to_string(),
                source: ImageSource::Url("a.png".to_string()),
            },
        ];
        for request in requests {
            let expected = request.kind();
            assert_eq!(create(request).kind(), expected);
        }
    }
}
