//! Per-tool collaborators the editor drives through narrow start/end/configure
//! interfaces, and the built-in implementations registered by default.

mod crop;
mod data_url;
mod free_drawing;
mod icon;
mod main_image;
mod text;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use image::DynamicImage;
use serde::Deserialize;
use thiserror::Error;

use crate::document::{Document, ObjectId};
use crate::geometry::{Color, Dimensions, Point};
use crate::notification::ImageLoaded;

pub use crop::{CropPreset, CropZone, CroppedImage, Cropper};
pub use data_url::{decode_data_url, encode_data_url};
pub use free_drawing::{BrushSettings, FreeDrawing};
pub use icon::{IconTool, DEFAULT_ICON_COLOR};
pub use main_image::{MainImage, SurfaceElement};
pub use text::{TextAlign, TextStyle, TextStylePatch, TextTool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentName {
    MainImage,
    Cropper,
    FreeDrawing,
    Text,
    Icon,
}

impl ComponentName {
    pub const ALL: [ComponentName; 5] = [
        Self::MainImage,
        Self::Cropper,
        Self::FreeDrawing,
        Self::Text,
        Self::Icon,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::MainImage => "main image",
            Self::Cropper => "cropper",
            Self::FreeDrawing => "free drawing",
            Self::Text => "text",
            Self::Icon => "icon",
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("{0} is not active")]
    Inactive(ComponentName),
    #[error("no image is loaded")]
    NoImage,
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),
    #[error("object {0} is not a text object")]
    NotText(ObjectId),
    #[error("unknown icon type {0:?}")]
    UnknownIcon(String),
    #[error("unsupported image source {0:?}")]
    UnsupportedSource(String),
    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
}

pub type ComponentResult<T> = std::result::Result<T, ComponentError>;

/// Where an image to load comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// `data:` URL, `file://` URL or plain filesystem path.
    Url(String),
    File(PathBuf),
    /// An already decoded raster, e.g. one remembered for undo.
    Raster(Rc<DynamicImage>),
}

/// Result of a successful main image load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub name: String,
    pub original: Dimensions,
    pub current: Dimensions,
}

impl From<&LoadedImage> for ImageLoaded {
    fn from(loaded: &LoadedImage) -> Self {
        Self {
            original_width: loaded.original.width,
            original_height: loaded.original.height,
            current_width: loaded.current.width,
            current_height: loaded.current.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub const fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Owner of the main raster and of the host element that displays it.
pub trait MainImageComponent: fmt::Debug {
    fn set_surface_element(&mut self, element: SurfaceElement);
    fn surface_element(&self) -> Option<&SurfaceElement>;
    fn set_max_display_dimensions(&mut self, dimensions: Dimensions);
    fn max_display_dimensions(&self) -> Dimensions;

    /// Loads `source` as the main image. A source that cannot be read or
    /// decoded leaves the document without an image and yields `None`.
    fn load(
        &mut self,
        document: &mut Document,
        name: &str,
        source: ImageSource,
    ) -> Option<LoadedImage>;
    fn clear(&mut self, document: &mut Document);

    /// Recomputes the displayed size after the raster or its angle changed.
    fn adjust_surface(&mut self, document: &Document) -> Dimensions;

    fn to_data_url(&self, document: &Document, format: ExportFormat) -> ComponentResult<String>;

    fn image_name<'d>(&self, document: &'d Document) -> Option<&'d str> {
        document.image_name()
    }
}

pub trait CropComponent: fmt::Debug {
    fn is_active(&self) -> bool;
    fn start(&mut self, document: &mut Document) -> ComponentResult<()>;
    fn set_preset(&mut self, preset: CropPreset);
    fn set_zone(&mut self, document: &Document, zone: CropZone) -> ComponentResult<CropZone>;
    /// Ends cropping. With `apply` and a valid zone, returns the cropped image.
    /// Calling it while inactive is a no-op.
    fn end(
        &mut self,
        document: &mut Document,
        apply: bool,
    ) -> ComponentResult<Option<CroppedImage>>;
}

pub trait FreeDrawingComponent: fmt::Debug {
    fn is_active(&self) -> bool;
    fn start(
        &mut self,
        document: &mut Document,
        brush: Option<BrushSettings>,
    ) -> ComponentResult<()>;
    fn set_brush(&mut self, brush: BrushSettings);
    fn brush(&self) -> BrushSettings;
    /// Adds a stroke through `points`; returns `None` for an empty stroke.
    fn draw(
        &mut self,
        document: &mut Document,
        points: &[Point],
    ) -> ComponentResult<Option<ObjectId>>;
    fn end(&mut self, document: &mut Document) -> ComponentResult<()>;
}

pub trait TextComponent: fmt::Debug {
    fn is_active(&self) -> bool;
    fn start(&mut self, document: &mut Document) -> ComponentResult<()>;
    /// Ends text mode, returning the ids of the empty uncommitted texts it swept.
    fn end(&mut self, document: &mut Document) -> ComponentResult<Vec<ObjectId>>;
    /// Remembers where the next text goes and returns the styles it will get.
    fn pointer_down(&mut self, origin: Point) -> TextStyle;
    fn add(
        &mut self,
        document: &mut Document,
        text: &str,
        style: Option<&TextStylePatch>,
    ) -> ComponentResult<ObjectId>;
    fn change(
        &mut self,
        document: &mut Document,
        target: ObjectId,
        text: &str,
    ) -> ComponentResult<()>;
    fn set_style(
        &mut self,
        document: &mut Document,
        target: ObjectId,
        style: &TextStylePatch,
    ) -> ComponentResult<()>;
}

pub trait IconComponent: fmt::Debug {
    fn register_paths(&mut self, paths: HashMap<String, String>);
    fn add(
        &mut self,
        document: &mut Document,
        icon_type: &str,
        angle: f64,
    ) -> ComponentResult<ObjectId>;
    /// Sets the colour for new icons and recolours `target` if it is an icon.
    fn set_color(&mut self, document: &mut Document, color: Color, target: Option<ObjectId>);
    fn color(&self) -> Color;
}

/// Where new objects land when the host gave no position.
fn default_placement(document: &Document) -> Point {
    document
        .image_dimensions()
        .map(|dimensions| dimensions.center())
        .unwrap_or_default()
}
