use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, ImageFormat, RgbImage};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"))
}

/// Save interleaved RGB bytes as PNG (`.png`) or JPEG (anything else).
pub fn save_rgb<P: AsRef<Path>>(
    rgb_bytes: Vec<u8>,
    width: u32,
    height: u32,
    path: P,
    quality: u8,
) -> Result<()> {
    let path = path.as_ref();

    let img_buffer: RgbImage = ImageBuffer::from_raw(width, height, rgb_bytes)
        .context("Failed to create image buffer from rendered data")?;

    if is_png(path) {
        img_buffer
            .save_with_format(path, ImageFormat::Png)
            .context("Failed to save PNG")?;
        return Ok(());
    }

    let mut output = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;

    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100));

    img_buffer
        .write_with_encoder(encoder)
        .context("Failed to encode JPEG")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, 255 - v, 128]
            })
            .collect()
    }

    #[test]
    fn test_save_jpeg() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plot.jpg");
        save_rgb(gradient(32, 16), 32, 16, &path, 90).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_save_png_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plot.PNG");
        save_rgb(gradient(8, 8), 8, 8, &path, 0).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let err = save_rgb(vec![0; 10], 8, 8, tmp.path().join("x.jpg"), 90).unwrap_err();
        assert!(err.to_string().contains("Failed to create image buffer"));
    }
}
