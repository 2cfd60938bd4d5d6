use std::fmt;

use serde::Serialize;

use crate::components::{BrushSettings, TextStyle};
use crate::geometry::{Color, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Free-drawn stroke. Points are relative to the owning object's position.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub points: Vec<Point>,
    pub brush: BrushSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconShape {
    pub icon_type: String,
    pub path: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Path(PathShape),
    Text(TextShape),
    Icon(IconShape),
}

impl ObjectKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::Text(_) => "text",
            Self::Icon(_) => "icon",
        }
    }
}

/// A graphical object layered over the main image.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicObject {
    pub id: ObjectId,
    pub position: Point,
    pub angle: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    pub kind: ObjectKind,
}

impl GraphicObject {
    pub fn new(id: ObjectId, position: Point, kind: ObjectKind) -> Self {
        Self {
            id,
            position,
            angle: 0.0,
            flip_x: false,
            flip_y: false,
            kind,
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub const fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Text(_))
    }

    pub fn is_empty_text(&self) -> bool {
        self.as_text().is_some_and(|text| text.text.is_empty())
    }

    pub fn as_text(&self) -> Option<&TextShape> {
        match &self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextShape> {
        match &mut self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_icon_mut(&mut self) -> Option<&mut IconShape> {
        match &mut self.kind {
            ObjectKind::Icon(icon) => Some(icon),
            _ => None,
        }
    }

    pub(crate) fn orbit(&mut self, pivot: Point, delta_degrees: f64) {
        self.position = self.position.rotated_around(pivot, delta_degrees);
        self.angle += delta_degrees;
    }

    pub(crate) fn mirror_x(&mut self, axis_x: f64) {
        self.position = self.position.mirrored_x(axis_x);
        self.angle = -self.angle;
        self.flip_x = !self.flip_x;
    }

    pub(crate) fn mirror_y(&mut self, axis_y: f64) {
        self.position = self.position.mirrored_y(axis_y);
        self.angle = -self.angle;
        self.flip_y = !self.flip_y;
    }
}
