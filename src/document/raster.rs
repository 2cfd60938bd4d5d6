use std::fmt;
use std::rc::Rc;

use image::{DynamicImage, GenericImageView};
use serde::Serialize;

use crate::geometry::Dimensions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipSetting {
    pub flip_x: bool,
    pub flip_y: bool,
}

impl FlipSetting {
    pub const fn new(flip_x: bool, flip_y: bool) -> Self {
        Self { flip_x, flip_y }
    }
}

/// Orientation of the main image on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageTransform {
    pub flip: FlipSetting,
    pub angle: f64,
}

impl ImageTransform {
    /// Whole quarter turns in `0..4`, or `None` for any other angle.
    pub fn quarter_turns(self) -> Option<u8> {
        let quarters = self.angle / 90.0;
        if quarters.fract() != 0.0 {
            return None;
        }
        Some((quarters as i64).rem_euclid(4) as u8)
    }

    /// Pixel size of a `dimensions` raster after [`ImageHandle::oriented`].
    pub fn oriented_dimensions(self, dimensions: Dimensions) -> Dimensions {
        match self.quarter_turns() {
            Some(1 | 3) => Dimensions::new(dimensions.height, dimensions.width),
            _ => dimensions,
        }
    }
}

/// Keeps the sign of the input: `-85` stays `-85`, `370` becomes `10`.
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle % 360.0;
    if normalized == 0.0 {
        0.0
    } else {
        normalized
    }
}

/// A decoded raster shared between the document and the commands that
/// remember it for undo.
#[derive(Clone)]
pub struct ImageHandle {
    name: String,
    raster: Rc<DynamicImage>,
}

impl ImageHandle {
    pub fn new(name: impl Into<String>, raster: DynamicImage) -> Self {
        Self {
            name: name.into(),
            raster: Rc::new(raster),
        }
    }

    pub fn from_shared(name: impl Into<String>, raster: Rc<DynamicImage>) -> Self {
        Self {
            name: name.into(),
            raster,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raster(&self) -> &DynamicImage {
        &self.raster
    }

    pub fn shared_raster(&self) -> Rc<DynamicImage> {
        Rc::clone(&self.raster)
    }

    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = self.raster.dimensions();
        Dimensions::new(width, height)
    }

    /// The raster as shown: flips first, then any whole quarter turn. Other
    /// angles keep the flipped pixels unrotated.
    pub fn oriented(&self, transform: ImageTransform) -> DynamicImage {
        let mut oriented = (*self.raster).clone();
        if transform.flip.flip_x {
            oriented = oriented.fliph();
        }
        if transform.flip.flip_y {
            oriented = oriented.flipv();
        }
        match transform.quarter_turns() {
            Some(1) => oriented.rotate90(),
            Some(2) => oriented.rotate180(),
            Some(3) => oriented.rotate270(),
            Some(_) => oriented,
            None => {
                tracing::debug!(angle = transform.angle, "keeping unrotated pixels");
                oriented
            }
        }
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.raster, &other.raster)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions())
            .finish()
    }
}
