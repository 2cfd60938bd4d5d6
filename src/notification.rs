//! Outbound notifications and the hub that delivers them to host listeners.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::components::TextStyle;
use crate::document::{FlipSetting, ObjectId};
use crate::geometry::Point;

/// Payload of [`Notification::LoadImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLoaded {
    pub original_width: u32,
    pub original_height: u32,
    pub current_width: u32,
    pub current_height: u32,
}

/// Payload of [`Notification::ActivateText`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextActivation {
    pub is_new: bool,
    pub text: String,
    pub styles: TextStyle,
    pub origin_position: Point,
    pub client_position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Notification {
    PushUndoStack,
    PushRedoStack,
    EmptyUndoStack,
    EmptyRedoStack,
    AddObject(ObjectId),
    RemoveObject(ObjectId),
    LoadImage(ImageLoaded),
    ClearImage,
    ClearObjects,
    StartCropping,
    EndCropping,
    FlipImage { setting: FlipSetting, angle: f64 },
    RotateImage(f64),
    StartFreeDrawing,
    EndFreeDrawing,
    ActivateText(TextActivation),
}

impl Notification {
    /// Logical event name as seen by hosts.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PushUndoStack => "pushUndoStack",
            Self::PushRedoStack => "pushRedoStack",
            Self::EmptyUndoStack => "emptyUndoStack",
            Self::EmptyRedoStack => "emptyRedoStack",
            Self::AddObject(_) => "addObject",
            Self::RemoveObject(_) => "removeObject",
            Self::LoadImage(_) => "loadImage",
            Self::ClearImage => "clearImage",
            Self::ClearObjects => "clearObjects",
            Self::StartCropping => "startCropping",
            Self::EndCropping => "endCropping",
            Self::FlipImage { .. } => "flipImage",
            Self::RotateImage(_) => "rotateImage",
            Self::StartFreeDrawing => "startFreeDrawing",
            Self::EndFreeDrawing => "endFreeDrawing",
            Self::ActivateText(_) => "activateText",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Notification)>;

struct Subscription {
    id: SubscriptionId,
    filter: Option<&'static str>,
    listener: Listener,
}

/// Single-threaded publish/subscribe hub.
///
/// Listeners may subscribe, unsubscribe or emit while a notification is being
/// delivered. Subscription changes take effect from the next notification and
/// nested emits are queued behind the one in flight.
#[derive(Default)]
pub struct EventHub {
    subscriptions: RefCell<Vec<Subscription>>,
    cancelled: RefCell<Vec<SubscriptionId>>,
    queue: RefCell<VecDeque<Notification>>,
    delivering: Cell<bool>,
    next_id: Cell<u64>,
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .subscriptions
            .try_borrow()
            .map(|subscriptions| subscriptions.len())
            .unwrap_or_default();
        f.debug_struct("EventHub")
            .field("subscriptions", &format!("<{count} listeners>"))
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every notification.
    pub fn subscribe(&self, listener: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        self.push_subscription(None, Box::new(listener))
    }

    /// Receive only notifications whose logical name equals `name`.
    pub fn on(
        &self,
        name: &'static str,
        listener: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.push_subscription(Some(name), Box::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        if self.delivering.get() {
            self.cancelled.borrow_mut().push(id);
        }
        self.subscriptions
            .borrow_mut()
            .retain(|subscription| subscription.id != id);
    }

    pub fn emit(&self, notification: Notification) {
        self.queue.borrow_mut().push_back(notification);
        if self.delivering.replace(true) {
            return;
        }

        loop {
            let Some(notification) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            tracing::trace!(event = notification.name(), "emit notification");
            let mut delivering = self.subscriptions.take();
            for subscription in &mut delivering {
                if subscription
                    .filter
                    .map_or(true, |name| name == notification.name())
                {
                    (subscription.listener)(&notification);
                }
            }
            self.reattach(delivering);
        }

        self.delivering.set(false);
    }

    fn reattach(&self, delivered: Vec<Subscription>) {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let added = std::mem::replace(&mut *subscriptions, delivered);
        subscriptions.extend(added);
        let cancelled = std::mem::take(&mut *self.cancelled.borrow_mut());
        if !cancelled.is_empty() {
            subscriptions.retain(|subscription| !cancelled.contains(&subscription.id));
        }
    }

    fn push_subscription(
        &self,
        filter: Option<&'static str>,
        listener: Listener,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0.saturating_add(1));
        let subscription = Subscription {
            id,
            filter,
            listener,
        };
        // While delivering, the live list is detached and this lands in the
        // placeholder that `reattach` merges back.
        self.subscriptions.borrow_mut().push(subscription);
        id
    }
}
