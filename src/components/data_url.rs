use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;

use super::{ComponentError, ComponentResult, ExportFormat};

/// Decodes the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> ComponentResult<Vec<u8>> {
    let invalid = |reason: &str| ComponentError::InvalidDataUrl(reason.to_string());
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| invalid("missing data: scheme"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid("missing payload separator"))?;
    if !meta.ends_with(";base64") {
        return Err(invalid("only base64 payloads are supported"));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|err| ComponentError::InvalidDataUrl(err.to_string()))
}

pub fn encode_data_url(raster: &DynamicImage, format: ExportFormat) -> ComponentResult<String> {
    let mut bytes = Cursor::new(Vec::new());
    match format {
        ExportFormat::Png => raster.write_to(&mut bytes, format.image_format())?,
        // JPEG has no alpha channel.
        ExportFormat::Jpeg => DynamicImage::ImageRgb8(raster.to_rgb8())
            .write_to(&mut bytes, format.image_format())?,
    }
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        STANDARD.encode(bytes.into_inner())
    ))
}
