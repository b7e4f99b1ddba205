//! Photo re-encoding for upload.
//!
//! Whatever the origin (capture command or library file), the photo is
//! decoded, bounded to a maximum long edge, and re-encoded as JPEG at the
//! configured quality so the upload payload stays small without starving
//! the model of detail.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

use crate::domain::{CapturedImage, DomainError};

/// Photos larger than this on their long edge are downscaled before upload.
const MAX_LONG_EDGE: u32 = 1600;

/// Decode `path` and produce a `CapturedImage` with a JPEG payload at the
/// given quality (1-100).
///
/// The decoder is chosen by sniffing the file content, not the extension:
/// capture tools are free to write PNG frames to the `.jpg` path we hand
/// them.
pub fn encode_for_upload(path: &Path, quality: u8) -> Result<CapturedImage, DomainError> {
    let img = image::ImageReader::open(path)
        .map_err(|e| DomainError::ImageSource(format!("open {}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| DomainError::ImageSource(format!("sniff {}: {e}", path.display())))?
        .decode()
        .map_err(|e| DomainError::ImageSource(format!("decode {}: {e}", path.display())))?;

    let img = if img.width().max(img.height()) > MAX_LONG_EDGE {
        img.thumbnail(MAX_LONG_EDGE, MAX_LONG_EDGE)
    } else {
        img
    };
    // JPEG has no alpha channel.
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut jpeg = Vec::new();
    let mut cursor = Cursor::new(&mut jpeg);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| DomainError::ImageSource(format!("encode {}: {e}", path.display())))?;

    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        bytes = jpeg.len(),
        quality,
        "photo encoded for upload"
    );

    Ok(CapturedImage::new(path, jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn write_fixture(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(width, height, image::Rgba([180, 90, 40, 255]));
        img.save(&path).expect("write fixture image");
        path
    }

    #[test]
    fn produces_jpeg_payload_with_origin_handle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "room.png", 64, 48);

        let captured = encode_for_upload(&path, 80).expect("encode");
        assert_eq!(captured.origin, path);
        // JPEG SOI marker.
        assert_eq!(&captured.jpeg[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn quality_setting_changes_payload_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "room.png", 320, 240);

        let low = encode_for_upload(&path, 10).expect("encode low");
        let high = encode_for_upload(&path, 95).expect("encode high");
        assert!(high.jpeg.len() > low.jpeg.len());
    }

    #[test]
    fn oversized_photos_are_downscaled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "wide.png", 3200, 400);

        let captured = encode_for_upload(&path, 80).expect("encode");
        let decoded = image::load_from_memory(&captured.jpeg).expect("decode payload");
        assert!(decoded.width() <= MAX_LONG_EDGE);
        assert!(decoded.height() <= MAX_LONG_EDGE);
    }

    #[test]
    fn decoder_follows_content_not_extension() {
        // Capture tools may write PNG frames to the .jpg path they are given.
        let dir = tempfile::tempdir().expect("tempdir");
        let png = write_fixture(dir.path(), "frame.png", 48, 48);
        let mislabeled = dir.path().join("shot.jpg");
        std::fs::copy(&png, &mislabeled).expect("copy fixture");

        let captured = encode_for_upload(&mislabeled, 80).expect("encode mislabeled png");
        assert_eq!(&captured.jpeg[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn missing_file_is_an_image_source_error() {
        let err = encode_for_upload(Path::new("/nonexistent/room.png"), 80).unwrap_err();
        assert!(matches!(err, DomainError::ImageSource(_)));
    }
}
