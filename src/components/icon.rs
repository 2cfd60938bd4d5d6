use std::collections::HashMap;

use crate::document::{Document, GraphicObject, IconShape, ObjectId, ObjectKind};
use crate::geometry::Color;

use super::{default_placement, ComponentError, ComponentResult, IconComponent};

pub const DEFAULT_ICON_COLOR: Color = Color::new(0, 0, 0);

const BUILTIN_ICONS: [(&str, &str); 2] = [
    ("arrow", "M 0 90 H 105 V 120 L 160 60 L 105 0 V 30 H 0 Z"),
    (
        "cancel",
        "M 0 30 L 30 60 L 0 90 L 30 120 L 60 90 L 90 120 L 120 90 L 90 60 L 120 30 L 90 0 L 60 30 L 30 0 Z",
    ),
];

#[derive(Debug)]
pub struct IconTool {
    paths: HashMap<String, String>,
    color: Color,
}

impl Default for IconTool {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_COLOR)
    }
}

impl IconTool {
    pub fn new(color: Color) -> Self {
        let paths = BUILTIN_ICONS
            .iter()
            .map(|(name, path)| ((*name).to_string(), (*path).to_string()))
            .collect();
        Self { paths, color }
    }

    pub fn has_icon(&self, icon_type: &str) -> bool {
        self.paths.contains_key(icon_type)
    }
}

impl IconComponent for IconTool {
    fn register_paths(&mut self, paths: HashMap<String, String>) {
        tracing::debug!(count = paths.len(), "registering icon paths");
        self.paths.extend(paths);
    }

    fn add(
        &mut self,
        document: &mut Document,
        icon_type: &str,
        angle: f64,
    ) -> ComponentResult<ObjectId> {
        let path = self
            .paths
            .get(icon_type)
            .ok_or_else(|| ComponentError::UnknownIcon(icon_type.to_string()))?
            .clone();
        let position = default_placement(document);
        let id = document.allocate_id();
        let icon = GraphicObject::new(
            id,
            position,
            ObjectKind::Icon(IconShape {
                icon_type: icon_type.to_string(),
                path,
                color: self.color,
            }),
        )
        .with_angle(angle);
        document.add_object(icon);
        Ok(id)
    }

    fn set_color(&mut self, document: &mut Document, color: Color, target: Option<ObjectId>) {
        self.color = color;
        let recoloured = target
            .and_then(|id| document.object_mut(id))
            .and_then(GraphicObject::as_icon_mut)
            .map(|icon| icon.color = color)
            .is_some();
        if recoloured {
            document.request_render();
        }
    }

    fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_icons_are_registered() {
        let tool = IconTool::default();
        assert!(tool.has_icon("arrow"));
        assert!(tool.has_icon("cancel"));
        assert!(!tool.has_icon("heart"));
    }

    #[test]
    fn add_rejects_unknown_icon() {
        let mut document = Document::new();
        let mut tool = IconTool::default();
        assert!(matches!(
            tool.add(&mut document, "heart", 0.0),
            Err(ComponentError::UnknownIcon(name)) if name == "heart"
        ));
        assert!(document.objects().is_empty());
    }

    #[test]
    fn registered_icon_can_be_added_and_recoloured() {
        let mut document = Document::new();
        let mut tool = IconTool::default();
        tool.register_paths(HashMap::from([("heart".to_string(), "M 0 0 Z".to_string())]));

        let id = tool.add(&mut document, "heart", 45.0).expect("add");
        assert_eq!(document.object(id).map(|object| object.angle), Some(45.0));

        let red = Color::new(255, 0, 0);
        tool.set_color(&mut document, red, Some(id));
        assert_eq!(tool.color(), red);
        let ObjectKind::Icon(icon) = &document.object(id).expect("icon").kind else {
            panic!("expected an icon");
        };
        assert_eq!(icon.color, red);
    }
}
