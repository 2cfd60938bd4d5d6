use std::path::Path;
use std::rc::Rc;

use image::DynamicImage;

use crate::document::{Document, ImageHandle};
use crate::geometry::Dimensions;

use super::{
    decode_data_url, encode_data_url, ComponentError, ComponentResult, ExportFormat, ImageSource,
    LoadedImage, MainImageComponent,
};

/// Host element the main image is drawn into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceElement {
    pub id: String,
    pub display: Dimensions,
}

impl SurfaceElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: Dimensions::default(),
        }
    }
}

#[derive(Debug)]
pub struct MainImage {
    element: Option<SurfaceElement>,
    max_display: Dimensions,
}

impl MainImage {
    pub fn new(max_display: Dimensions) -> Self {
        Self {
            element: None,
            max_display,
        }
    }
}

impl MainImageComponent for MainImage {
    fn set_surface_element(&mut self, element: SurfaceElement) {
        self.element = Some(element);
    }

    fn surface_element(&self) -> Option<&SurfaceElement> {
        self.element.as_ref()
    }

    fn set_max_display_dimensions(&mut self, dimensions: Dimensions) {
        self.max_display = dimensions;
    }

    fn max_display_dimensions(&self) -> Dimensions {
        self.max_display
    }

    fn load(
        &mut self,
        document: &mut Document,
        name: &str,
        source: ImageSource,
    ) -> Option<LoadedImage> {
        match decode_source(source) {
            Ok(raster) => {
                let image = ImageHandle::from_shared(name, raster);
                let original = image.dimensions();
                document.set_image(Some(image));
                let current = self.adjust_surface(document);
                tracing::debug!(name, ?original, ?current, "main image loaded");
                Some(LoadedImage {
                    name: name.to_string(),
                    original,
                    current,
                })
            }
            Err(err) => {
                tracing::warn!(name, error = %err, "failed to load image; clearing main image");
                self.clear(document);
                None
            }
        }
    }

    fn clear(&mut self, document: &mut Document) {
        document.set_image(None);
        self.adjust_surface(document);
    }

    fn adjust_surface(&mut self, document: &Document) -> Dimensions {
        let display = document.surface_dimensions().fit_within(self.max_display);
        if let Some(element) = self.element.as_mut() {
            element.display = display;
        }
        display
    }

    fn to_data_url(&self, document: &Document, format: ExportFormat) -> ComponentResult<String> {
        let image = document.image().ok_or(ComponentError::NoImage)?;
        encode_data_url(&image.oriented(document.transform()), format)
    }
}

fn decode_source(source: ImageSource) -> ComponentResult<Rc<DynamicImage>> {
    let raster = match source {
        ImageSource::Raster(raster) => return Ok(raster),
        ImageSource::File(path) => image::open(path)?,
        ImageSource::Url(url) => decode_url(&url)?,
    };
    Ok(Rc::new(raster))
}

fn decode_url(url: &str) -> ComponentResult<DynamicImage> {
    if url.starts_with("data:") {
        let bytes = decode_data_url(url)?;
        return Ok(image::load_from_memory(&bytes)?);
    }
    if let Some(path) = url.strip_prefix("file://") {
        return Ok(image::open(Path::new(path))?);
    }
    if url.contains("://") {
        return Err(ComponentError::UnsupportedSource(url.to_string()));
    }
    Ok(image::open(Path::new(url))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FlipSetting;
    use image::GenericImageView;
    use tempfile::tempdir;

    fn png_data_url(width: u32, height: u32) -> String {
        encode_data_url(&DynamicImage::new_rgba8(width, height), ExportFormat::Png)
            .expect("encodes")
    }

    #[test]
    fn load_from_data_url_fits_display() {
        let mut document = Document::new();
        let mut main = MainImage::new(Dimensions::new(100, 100));
        main.set_surface_element(SurfaceElement::new("canvas"));

        let loaded = main
            .load(&mut document, "photo", ImageSource::Url(png_data_url(400, 200)))
            .expect("loaded");
        assert_eq!(loaded.original, Dimensions::new(400, 200));
        assert_eq!(loaded.current, Dimensions::new(100, 50));
        assert_eq!(
            main.surface_element().map(|element| element.display),
            Some(Dimensions::new(100, 50))
        );
        assert_eq!(main.image_name(&document), Some("photo"));
    }

    #[test]
    fn load_from_file_path_and_file_url() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("pixel.png");
        DynamicImage::new_rgba8(3, 2).save(&path).expect("write png");

        let mut document = Document::new();
        let mut main = MainImage::new(Dimensions::new(1000, 800));
        let plain = main.load(
            &mut document,
            "plain",
            ImageSource::Url(path.display().to_string()),
        );
        assert_eq!(plain.map(|loaded| loaded.original), Some(Dimensions::new(3, 2)));

        let url = format!("file://{}", path.display());
        assert!(main.load(&mut document, "url", ImageSource::Url(url)).is_some());
        assert!(main
            .load(&mut document, "file", ImageSource::File(path))
            .is_some());
    }

    #[test]
    fn failed_load_clears_image() {
        let mut document = Document::new();
        let mut main = MainImage::new(Dimensions::new(100, 100));
        main.load(&mut document, "ok", ImageSource::Url(png_data_url(10, 10)))
            .expect("loaded");

        let failed = main.load(
            &mut document,
            "remote",
            ImageSource::Url("https://example.com/a.png".to_string()),
        );
        assert!(failed.is_none());
        assert!(document.image().is_none());
    }

    #[test]
    fn export_applies_quarter_turns() {
        let mut document = Document::new();
        let mut main = MainImage::new(Dimensions::new(100, 100));
        main.load(&mut document, "img", ImageSource::Url(png_data_url(6, 4)))
            .expect("loaded");
        document.apply_flip(FlipSetting::new(true, false));
        document.set_angle(90.0);

        let url = main
            .to_data_url(&document, ExportFormat::Png)
            .expect("export");
        let decoded = image::load_from_memory(&decode_data_url(&url).expect("payload"))
            .expect("png");
        assert_eq!(decoded.dimensions(), (4, 6));
    }

    #[test]
    fn export_without_image_fails() {
        let document = Document::new();
        let main = MainImage::new(Dimensions::new(100, 100));
        assert!(matches!(
            main.to_data_url(&document, ExportFormat::Png),
            Err(ComponentError::NoImage)
        ));
    }
}
