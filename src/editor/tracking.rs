use std::rc::Rc;

use crate::command::{create, CommandOutput, CommandRequest};
use crate::document::{DocumentChange, GraphicObject, ObjectId};
use crate::notification::{EventHub, ImageLoaded, Notification};

use super::Editor;

/// Whether unmanaged objects seen in a change batch become history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Recording {
    /// The batch came from a command; its objects are already history.
    Skip,
    /// The batch came from a collaborator; record non-text additions.
    Record,
}

impl Editor {
    pub(super) fn absorb_changes(&mut self, recording: Recording) {
        for change in self.document.drain_changes() {
            match change {
                DocumentChange::ObjectAdded(id) => {
                    self.events.emit(Notification::AddObject(id));
                    self.track(id, recording);
                }
                DocumentChange::ObjectRemoved(id) => {
                    self.events.emit(Notification::RemoveObject(id));
                }
            }
        }
    }

    fn track(&mut self, id: ObjectId, recording: Recording) {
        if self.document.is_managed(id) {
            return;
        }
        let Some(object) = self.document.object(id) else {
            return;
        };
        match recording {
            Recording::Skip => {
                self.document.mark_managed(id);
            }
            Recording::Record if !object.is_text() => {
                let object = object.clone();
                self.record_addition(object);
            }
            Recording::Record => {}
        }
    }

    /// Records every non-empty text that is not yet part of the history.
    pub(super) fn commit_texts(&mut self) {
        let pending: Vec<GraphicObject> = self
            .document
            .objects()
            .iter()
            .filter(|object| {
                object.is_text() && !object.is_empty_text() && !self.document.is_managed(object.id)
            })
            .cloned()
            .collect();
        for object in pending {
            self.record_addition(object);
        }
    }

    fn record_addition(&mut self, object: GraphicObject) {
        tracing::debug!(id = %object.id, kind = object.kind.label(), "recording implicit add");
        self.document.mark_managed(object.id);
        self.invoker
            .record(create(CommandRequest::AddObject(object)));
    }
}

pub(super) fn image_notifier(events: &Rc<EventHub>) -> impl FnMut(&CommandOutput) + 'static {
    let events = Rc::clone(events);
    move |output| {
        if let CommandOutput::Image(loaded) = output {
            events.emit(match loaded {
                Some(loaded) => Notification::LoadImage(ImageLoaded::from(loaded)),
                None => Notification::ClearImage,
            });
        }
    }
}

pub(super) fn flip_notifier(events: &Rc<EventHub>) -> impl FnMut(&CommandOutput) + 'static {
    let events = Rc::clone(events);
    move |output| {
        if let CommandOutput::Flip { setting, angle } = output {
            events.emit(Notification::FlipImage {
                setting: *setting,
                angle: *angle,
            });
        }
    }
}

pub(super) fn rotate_notifier(events: &Rc<EventHub>) -> impl FnMut(&CommandOutput) + 'static {
    let events = Rc::clone(events);
    move |output| {
        if let CommandOutput::Angle(angle) = output {
            events.emit(Notification::RotateImage(*angle));
        }
    }
}
