use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

pub const DEFAULT_MODULE_SIZE: u32 = 10;

#[derive(Debug)]
pub enum EncodeError {
    /// Input exceeds the capacity of the largest QR version.
    DataTooLong,
    Qr(QrError),
    Image(image::ImageError),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::DataTooLong => write!(f, "data too long to fit in a QR code"),
            EncodeError::Qr(err) => write!(f, "QR encoding failed: {err}"),
            EncodeError::Image(err) => write!(f, "PNG encoding failed: {err}"),
        }
    }
}

impl From<QrError> for EncodeError {
    fn from(err: QrError) -> Self {
        match err {
            QrError::DataTooLong => EncodeError::DataTooLong,
            other => EncodeError::Qr(other),
        }
    }
}

/// Renders strings as black-on-white QR code PNGs.
///
/// Output is deterministic: the same input and module size always produce
/// byte-identical PNGs.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    module_size: u32,
}

impl QrEncoder {
    pub fn new(module_size: u32) -> Self {
        Self {
            module_size: module_size.max(1),
        }
    }

    pub fn module_size(&self) -> u32 {
        self.module_size
    }

    pub fn encode(&self, data: &str) -> Result<Vec<u8>, EncodeError> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)?;

        let img = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        let mut png_bytes = Vec::new();
        let mut cursor = Cursor::new(&mut png_bytes);
        DynamicImage::ImageLuma8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(EncodeError::Image)?;

        Ok(png_bytes)
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_SIZE)
    }
}

/// Asserts that `png` is the QR symbol for `data`: samples the centre of every
/// module and compares it against a fresh encoding of `data`.
#[cfg(test)]
pub(crate) fn assert_encodes(png: &[u8], data: &str, module_size: u32) {
    use qrcode::Color;

    const QUIET_ZONE: u32 = 4;

    let img = image::load_from_memory_with_format(png, ImageFormat::Png)
        .expect("valid png")
        .to_luma8();
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M).unwrap();
    let width = code.width() as u32;

    assert_eq!(img.width(), (width + 2 * QUIET_ZONE) * module_size);
    assert_eq!(img.height(), img.width());

    for (i, color) in code.to_colors().into_iter().enumerate() {
        let (mx, my) = (i as u32 % width, i as u32 / width);
        let px = (mx + QUIET_ZONE) * module_size + module_size / 2;
        let py = (my + QUIET_ZONE) * module_size + module_size / 2;
        let dark = img.get_pixel(px, py).0[0] < 128;
        assert_eq!(dark, color == Color::Dark, "module ({mx}, {my}) differs");
    }
}
