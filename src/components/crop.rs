use std::fmt;

use serde::Deserialize;

use crate::document::{Cursor, Document};

use super::{
    encode_data_url, ComponentError, ComponentName, ComponentResult, CropComponent, ExportFormat,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CropPreset {
    #[default]
    Free,
    #[serde(rename = "16:9")]
    Ratio16x9,
    #[serde(rename = "1:1")]
    Ratio1x1,
    #[serde(rename = "9:16")]
    Ratio9x16,
    Original,
}

impl CropPreset {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Ratio16x9 => "16:9",
            Self::Ratio1x1 => "1:1",
            Self::Ratio9x16 => "9:16",
            Self::Original => "Original",
        }
    }

    pub const fn ratio(self) -> Option<(u32, u32)> {
        match self {
            Self::Ratio16x9 => Some((16, 9)),
            Self::Ratio1x1 => Some((1, 1)),
            Self::Ratio9x16 => Some((9, 16)),
            Self::Free | Self::Original => None,
        }
    }

    /// Effective aspect ratio; `Original` follows the image, `Free` has none.
    pub fn resolve_ratio(self, image_width: u32, image_height: u32) -> Option<(u32, u32)> {
        self.ratio().or_else(|| {
            (self == Self::Original).then(|| (image_width.max(1), image_height.max(1)))
        })
    }
}

impl fmt::Display for CropPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Crop rectangle in pixels of the image as displayed, after flips and
/// quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropZone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropZone {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn clamped(self, image_width: u32, image_height: u32) -> Self {
        let x = self.x.min(image_width);
        let y = self.y.min(image_height);
        Self {
            x,
            y,
            width: self.width.min(image_width - x),
            height: self.height.min(image_height - y),
        }
    }
}

/// Cropped raster returned when a crop is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    pub url: String,
    pub image_name: String,
}

#[derive(Debug, Default)]
pub struct Cropper {
    active: bool,
    zone: Option<CropZone>,
    preset: CropPreset,
}

impl Cropper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CropComponent for Cropper {
    fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self, document: &mut Document) -> ComponentResult<()> {
        if self.active {
            return Ok(());
        }
        document.discard_active_object();
        let interaction = document.interaction_mut();
        interaction.selection = false;
        interaction.objects_evented = false;
        interaction.cursor = Cursor::Crosshair;
        self.zone = None;
        self.active = true;
        Ok(())
    }

    fn set_preset(&mut self, preset: CropPreset) {
        self.preset = preset;
    }

    fn set_zone(&mut self, document: &Document, zone: CropZone) -> ComponentResult<CropZone> {
        if !self.active {
            return Err(ComponentError::Inactive(ComponentName::Cropper));
        }
        let bounds = document
            .oriented_image_dimensions()
            .ok_or(ComponentError::NoImage)?;
        let mut zone = zone.clamped(bounds.width, bounds.height);
        if let Some((ratio_x, ratio_y)) = self.preset.resolve_ratio(bounds.width, bounds.height) {
            (zone.width, zone.height) =
                adjust_ratio_to_fit(zone.width, zone.height, ratio_x, ratio_y);
        }
        self.zone = Some(zone);
        Ok(zone)
    }

    fn end(
        &mut self,
        document: &mut Document,
        apply: bool,
    ) -> ComponentResult<Option<CroppedImage>> {
        if !self.active {
            return Ok(None);
        }
        self.active = false;
        document.reset_interaction();
        let zone = self.zone.take();
        if !apply {
            return Ok(None);
        }
        let Some(zone) = zone.filter(CropZone::is_valid) else {
            tracing::debug!("crop applied without a usable zone");
            return Ok(None);
        };
        let image = document.image().ok_or(ComponentError::NoImage)?;
        let cropped = image
            .oriented(document.transform())
            .crop_imm(zone.x, zone.y, zone.width, zone.height);
        Ok(Some(CroppedImage {
            url: encode_data_url(&cropped, ExportFormat::Png)?,
            image_name: image.name().to_string(),
        }))
    }
}

/// Largest `width x height`-bounded size with the requested aspect ratio.
fn adjust_ratio_to_fit(width: u32, height: u32, ratio_x: u32, ratio_y: u32) -> (u32, u32) {
    let target_w = scale_ratio_dimension(height, ratio_x, ratio_y);
    let target_h = scale_ratio_dimension(width, ratio_y, ratio_x);

    if target_w <= width {
        (target_w, height)
    } else {
        (width, target_h)
    }
}

fn scale_ratio_dimension(base: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        0
    } else {
        let scaled = (u64::from(base) * u64::from(numerator)) / u64::from(denominator);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::decode_data_url;
    use crate::document::ImageHandle;
    use image::{DynamicImage, GenericImageView};

    fn document_with_image(width: u32, height: u32) -> Document {
        let mut document = Document::new();
        document.set_image(Some(ImageHandle::new(
            "sample",
            DynamicImage::new_rgba8(width, height),
        )));
        document
    }

    #[test]
    fn resolve_ratio_follows_preset() {
        assert_eq!(CropPreset::Ratio16x9.resolve_ratio(800, 600), Some((16, 9)));
        assert_eq!(CropPreset::Original.resolve_ratio(1920, 1080), Some((1920, 1080)));
        assert_eq!(CropPreset::Original.resolve_ratio(0, 0), Some((1, 1)));
        assert_eq!(CropPreset::Free.resolve_ratio(800, 600), None);
    }

    #[test]
    fn zone_requires_active_cropper() {
        let document = document_with_image(10, 10);
        let mut cropper = Cropper::new();
        assert!(matches!(
            cropper.set_zone(&document, CropZone::new(0, 0, 5, 5)),
            Err(ComponentError::Inactive(ComponentName::Cropper))
        ));
    }

    #[test]
    fn zone_is_clamped_to_image_and_preset_ratio() {
        let mut document = document_with_image(100, 50);
        let mut cropper = Cropper::new();
        cropper.start(&mut document).expect("start");
        assert_eq!(
            cropper
                .set_zone(&document, CropZone::new(90, 40, 30, 30))
                .expect("zone"),
            CropZone::new(90, 40, 10, 10)
        );

        cropper.set_preset(CropPreset::Ratio1x1);
        assert_eq!(
            cropper
                .set_zone(&document, CropZone::new(0, 0, 40, 20))
                .expect("zone"),
            CropZone::new(0, 0, 20, 20)
        );
    }

    #[test]
    fn start_disables_selection_and_end_restores_it() {
        let mut document = document_with_image(10, 10);
        let mut cropper = Cropper::new();
        cropper.start(&mut document).expect("start");
        assert!(!document.interaction().selection);
        assert_eq!(document.interaction().cursor, Cursor::Crosshair);

        assert_eq!(cropper.end(&mut document, false).expect("end"), None);
        assert!(!cropper.is_active());
        assert!(document.interaction().selection);
    }

    #[test]
    fn apply_returns_cropped_png() {
        let mut document = document_with_image(40, 30);
        let mut cropper = Cropper::new();
        cropper.start(&mut document).expect("start");
        cropper
            .set_zone(&document, CropZone::new(5, 5, 12, 8))
            .expect("zone");

        let cropped = cropper
            .end(&mut document, true)
            .expect("end")
            .expect("cropped image");
        assert_eq!(cropped.image_name, "sample");
        let bytes = decode_data_url(&cropped.url).expect("data url");
        let decoded = image::load_from_memory(&bytes).expect("png");
        assert_eq!(decoded.dimensions(), (12, 8));
    }

    #[test]
    fn zone_is_taken_from_the_displayed_orientation() {
        let mut raster = image::RgbaImage::new(4, 2);
        for (x, _, pixel) in raster.enumerate_pixels_mut() {
            *pixel = if x < 2 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            };
        }
        let mut document = Document::new();
        document.set_image(Some(ImageHandle::new(
            "halves",
            DynamicImage::ImageRgba8(raster),
        )));
        document.apply_flip(crate::document::FlipSetting::new(true, false));
        document.set_angle(90.0);

        let mut cropper = Cropper::new();
        cropper.start(&mut document).expect("start");
        assert_eq!(
            cropper
                .set_zone(&document, CropZone::new(0, 0, 10, 10))
                .expect("zone"),
            CropZone::new(0, 0, 2, 4)
        );
        cropper
            .set_zone(&document, CropZone::new(0, 0, 2, 1))
            .expect("zone");

        let cropped = cropper
            .end(&mut document, true)
            .expect("end")
            .expect("cropped image");
        let decoded =
            image::load_from_memory(&decode_data_url(&cropped.url).expect("payload")).expect("png");
        assert_eq!(decoded.dimensions(), (2, 1));
        // mirrored then turned: the blue half is on top
        assert_eq!(decoded.get_pixel(0, 0), image::Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn apply_without_zone_yields_nothing() {
        let mut document = document_with_image(40, 30);
        let mut cropper = Cropper::new();
        cropper.start(&mut document).expect("start");
        assert_eq!(cropper.end(&mut document, true).expect("end"), None);
        assert_eq!(cropper.end(&mut document, true).expect("inactive end"), None);
    }
}
