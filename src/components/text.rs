use serde::{Deserialize, Serialize};

use crate::document::{Cursor, Document, GraphicObject, ObjectId, ObjectKind, TextShape};
use crate::geometry::{Color, Point};

use super::{default_placement, ComponentError, ComponentResult, TextComponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub fill: Color,
    pub font_family: String,
    pub font_size: u16,
    pub font_weight: u16,
    pub italic: bool,
    pub underline: bool,
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            font_family: "Sans".to_string(),
            font_size: 16,
            font_weight: 500,
            italic: false,
            underline: false,
            text_align: TextAlign::Left,
        }
    }
}

impl TextStyle {
    pub fn apply(&mut self, patch: &TextStylePatch) {
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
        if let Some(family) = &patch.font_family {
            self.font_family.clone_from(family);
        }
        if let Some(size) = patch.font_size {
            self.font_size = clamp_text_size(size);
        }
        if let Some(weight) = patch.font_weight {
            self.font_weight = clamp_text_weight(weight);
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(underline) = patch.underline {
            self.underline = underline;
        }
        if let Some(align) = patch.text_align {
            self.text_align = align;
        }
    }
}

/// Partial style update; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStylePatch {
    pub fill: Option<Color>,
    pub font_family: Option<String>,
    pub font_size: Option<u16>,
    pub font_weight: Option<u16>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub text_align: Option<TextAlign>,
}

const fn clamp_text_size(size: u16) -> u16 {
    if size == 0 {
        1
    } else {
        size
    }
}

const fn clamp_text_weight(weight: u16) -> u16 {
    if weight < 100 {
        100
    } else if weight > 1000 {
        1000
    } else {
        weight
    }
}

#[derive(Debug, Default)]
pub struct TextTool {
    active: bool,
    default_style: TextStyle,
    pending_origin: Option<Point>,
}

impl TextTool {
    pub fn new(default_style: TextStyle) -> Self {
        Self {
            active: false,
            default_style,
            pending_origin: None,
        }
    }

    pub fn default_style(&self) -> &TextStyle {
        &self.default_style
    }
}

impl TextComponent for TextTool {
    fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self, document: &mut Document) -> ComponentResult<()> {
        document.discard_active_object();
        let interaction = document.interaction_mut();
        interaction.selection = false;
        interaction.cursor = Cursor::Text;
        self.active = true;
        Ok(())
    }

    fn end(&mut self, document: &mut Document) -> ComponentResult<Vec<ObjectId>> {
        if !self.active {
            return Ok(Vec::new());
        }
        self.active = false;
        self.pending_origin = None;

        let swept: Vec<ObjectId> = document
            .objects()
            .iter()
            .filter(|object| object.is_empty_text() && !document.is_managed(object.id))
            .map(|object| object.id)
            .collect();
        for id in &swept {
            document.remove_object(*id);
        }
        document.discard_active_object();
        document.reset_interaction();
        Ok(swept)
    }

    fn pointer_down(&mut self, origin: Point) -> TextStyle {
        self.pending_origin = Some(origin);
        self.default_style.clone()
    }

    fn add(
        &mut self,
        document: &mut Document,
        text: &str,
        style: Option<&TextStylePatch>,
    ) -> ComponentResult<ObjectId> {
        let mut resolved = self.default_style.clone();
        if let Some(patch) = style {
            resolved.apply(patch);
        }
        let position = self
            .pending_origin
            .take()
            .unwrap_or_else(|| default_placement(document));
        let id = document.allocate_id();
        document.add_object(GraphicObject::new(
            id,
            position,
            ObjectKind::Text(TextShape {
                text: text.to_string(),
                style: resolved,
            }),
        ));
        document.set_active_object(id);
        Ok(id)
    }

    fn change(
        &mut self,
        document: &mut Document,
        target: ObjectId,
        text: &str,
    ) -> ComponentResult<()> {
        let object = document
            .object_mut(target)
            .ok_or(ComponentError::ObjectNotFound(target))?;
        let shape = object.as_text_mut().ok_or(ComponentError::NotText(target))?;
        shape.text = text.to_string();
        document.request_render();
        Ok(())
    }

    fn set_style(
        &mut self,
        document: &mut Document,
        target: ObjectId,
        style: &TextStylePatch,
    ) -> ComponentResult<()> {
        let object = document
            .object_mut(target)
            .ok_or(ComponentError::ObjectNotFound(target))?;
        let shape = object.as_text_mut().ok_or(ComponentError::NotText(target))?;
        shape.style.apply(style);
        document.request_render();
        Ok(())
    }
}
