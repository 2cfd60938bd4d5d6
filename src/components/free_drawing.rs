use serde::{Deserialize, Serialize};

use crate::document::{Document, GraphicObject, ObjectId, ObjectKind, PathShape};
use crate::geometry::{Color, Point};

use super::{ComponentError, ComponentName, ComponentResult, FreeDrawingComponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub width: u8,
    pub color: Color,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            width: 12,
            color: Color::BLACK,
        }
    }
}

impl BrushSettings {
    pub fn new(width: u8, color: Color) -> Self {
        let mut brush = Self { width, color };
        brush.set_width(width);
        brush
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: u8) {
        self.width = width.max(1);
    }
}

#[derive(Debug, Default)]
pub struct FreeDrawing {
    active: bool,
    brush: BrushSettings,
}

impl FreeDrawing {
    pub fn new(brush: BrushSettings) -> Self {
        Self {
            active: false,
            brush,
        }
    }
}

impl FreeDrawingComponent for FreeDrawing {
    fn is_active(&self) -> bool {
        self.active
    }

    fn start(
        &mut self,
        document: &mut Document,
        brush: Option<BrushSettings>,
    ) -> ComponentResult<()> {
        if let Some(brush) = brush {
            self.set_brush(brush);
        }
        document.discard_active_object();
        let interaction = document.interaction_mut();
        interaction.drawing_mode = true;
        interaction.selection = false;
        self.active = true;
        Ok(())
    }

    fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = BrushSettings::new(brush.width, brush.color);
    }

    fn brush(&self) -> BrushSettings {
        self.brush
    }

    fn draw(
        &mut self,
        document: &mut Document,
        points: &[Point],
    ) -> ComponentResult<Option<ObjectId>> {
        if !self.active {
            return Err(ComponentError::Inactive(ComponentName::FreeDrawing));
        }
        let Some(&anchor) = points.first() else {
            return Ok(None);
        };
        let relative = points
            .iter()
            .map(|point| Point::new(point.x - anchor.x, point.y - anchor.y))
            .collect();
        let id = document.allocate_id();
        document.add_object(GraphicObject::new(
            id,
            anchor,
            ObjectKind::Path(PathShape {
                points: relative,
                brush: self.brush,
            }),
        ));
        Ok(Some(id))
    }

    fn end(&mut self, document: &mut Document) -> ComponentResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        document.reset_interaction();
        Ok(())
    }
}
