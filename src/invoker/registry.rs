use std::collections::HashMap;

use thiserror::Error;

use crate::components::{
    ComponentName, CropComponent, Cropper, FreeDrawing, FreeDrawingComponent, IconComponent,
    IconTool, MainImage, MainImageComponent, TextComponent, TextTool,
};
use crate::config::EditorConfig;

/// A registered collaborator, tagged by the subsystem it implements.
#[derive(Debug)]
pub enum Component {
    MainImage(Box<dyn MainImageComponent>),
    Cropper(Box<dyn CropComponent>),
    FreeDrawing(Box<dyn FreeDrawingComponent>),
    Text(Box<dyn TextComponent>),
    Icon(Box<dyn IconComponent>),
}

impl Component {
    pub const fn name(&self) -> ComponentName {
        match self {
            Self::MainImage(_) => ComponentName::MainImage,
            Self::Cropper(_) => ComponentName::Cropper,
            Self::FreeDrawing(_) => ComponentName::FreeDrawing,
            Self::Text(_) => ComponentName::Text,
            Self::Icon(_) => ComponentName::Icon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("component {0} is not registered")]
    UnknownComponent(ComponentName),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Fixed name-to-collaborator table, populated once at construction.
#[derive(Debug)]
pub struct ComponentRegistry {
    components: HashMap<ComponentName, Component>,
}

macro_rules! accessors {
    ($($get:ident, $get_mut:ident, $variant:ident => $trait:ident;)*) => {
        $(
            pub fn $get(&self) -> RegistryResult<&dyn $trait> {
                match self.get(ComponentName::$variant)? {
                    Component::$variant(component) => Ok(&**component),
                    _ => Err(RegistryError::UnknownComponent(ComponentName::$variant)),
                }
            }

            pub fn $get_mut(&mut self) -> RegistryResult<&mut dyn $trait> {
                match self.components.get_mut(&ComponentName::$variant) {
                    Some(Component::$variant(component)) => Ok(&mut **component),
                    _ => Err(RegistryError::UnknownComponent(ComponentName::$variant)),
                }
            }
        )*
    };
}

impl ComponentRegistry {
    /// Later entries replace earlier ones with the same name.
    pub fn new(components: impl IntoIterator<Item = Component>) -> Self {
        let components = components
            .into_iter()
            .map(|component| (component.name(), component))
            .collect();
        Self { components }
    }

    /// Registers every built-in collaborator configured from `config`.
    pub fn with_defaults(config: &EditorConfig) -> Self {
        Self::new([
            Component::MainImage(Box::new(MainImage::new(config.max_display))),
            Component::Cropper(Box::new(Cropper::new())),
            Component::FreeDrawing(Box::new(FreeDrawing::new(config.brush))),
            Component::Text(Box::new(TextTool::new(config.text_style.clone()))),
            Component::Icon(Box::new(IconTool::new(config.icon_color))),
        ])
    }

    pub fn contains(&self, name: ComponentName) -> bool {
        self.components.contains_key(&name)
    }

    pub fn get(&self, name: ComponentName) -> RegistryResult<&Component> {
        self.components
            .get(&name)
            .ok_or(RegistryError::UnknownComponent(name))
    }

    accessors! {
        main_image, main_image_mut, MainImage => MainImageComponent;
        cropper, cropper_mut, Cropper => CropComponent;
        free_drawing, free_drawing_mut, FreeDrawing => FreeDrawingComponent;
        text, text_mut, Text => TextComponent;
        icon, icon_mut, Icon => IconComponent;
    }
}
