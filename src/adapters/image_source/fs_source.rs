//! Filesystem image source. Implements ImageSourcePort.
//!
//! Two origins, one output shape:
//! - `capture` runs an external capture command (webcam tool, phone bridge)
//!   that writes a photo to a temp path we hand it.
//! - `pick_from_library` offers an inquire select over a photo directory;
//!   dismissing the prompt is a cancellation, not an error.

use std::path::{Path, PathBuf};

use chrono::Utc;
use inquire::{InquireError, Select};
use tracing::{debug, info};

use crate::adapters::image_source::encode::encode_for_upload;
use crate::domain::{CapturedImage, DomainError, PickOutcome};
use crate::ports::ImageSourcePort;

/// Placeholder in the capture command replaced by the output path.
const OUT_PLACEHOLDER: &str = "{out}";

/// File extensions offered by the library picker.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

/// Filesystem-backed image source.
pub struct FsImageSource {
    library_dir: PathBuf,
    capture_cmd: Option<String>,
    quality: u8,
}

impl FsImageSource {
    pub fn new(library_dir: impl Into<PathBuf>, capture_cmd: Option<String>, quality: u8) -> Self {
        Self {
            library_dir: library_dir.into(),
            capture_cmd,
            quality,
        }
    }

    /// Command line for one capture: `{out}` replaced by `out`, or the path
    /// appended when the placeholder is absent.
    fn capture_command_line(cmd: &str, out: &Path) -> String {
        let out = out.display().to_string();
        if cmd.contains(OUT_PLACEHOLDER) {
            cmd.replace(OUT_PLACEHOLDER, &out)
        } else {
            format!("{cmd} {out}")
        }
    }

    /// Image files in the library directory, sorted by name.
    fn list_images(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| DomainError::ImageSource(format!("read {}: {e}", dir.display())))?;

        let mut images: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| {
                        let ext = ext.to_ascii_lowercase();
                        IMAGE_EXTENSIONS.contains(&ext.as_str())
                    })
                    .unwrap_or(false)
            })
            .collect();
        images.sort();
        Ok(images)
    }
}

#[async_trait::async_trait]
impl ImageSourcePort for FsImageSource {
    async fn capture(&self) -> Result<CapturedImage, DomainError> {
        let cmd = self.capture_cmd.as_deref().ok_or_else(|| {
            DomainError::ImageSource(
                "no capture command configured (set ROOMLENS_CAPTURE_CMD)".to_string(),
            )
        })?;

        let out = std::env::temp_dir().join(format!(
            "roomlens_capture_{}.jpg",
            Utc::now().format("%Y%m%d%H%M%S%3f")
        ));
        let command_line = Self::capture_command_line(cmd, &out);
        debug!(%command_line, "running capture command");

        let status = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command_line)
            .status()
            .await
            .map_err(|e| DomainError::ImageSource(format!("spawn capture command: {e}")))?;

        if !status.success() {
            return Err(DomainError::ImageSource(format!(
                "capture command exited with {status}"
            )));
        }
        if !out.exists() {
            return Err(DomainError::ImageSource(format!(
                "capture command produced no file at {}",
                out.display()
            )));
        }

        let captured = encode_for_upload(&out, self.quality);
        let _ = std::fs::remove_file(&out);
        let captured = captured?;
        info!(photo = %captured.display_name(), "photo captured");
        Ok(captured)
    }

    async fn pick_from_library(&self) -> Result<PickOutcome, DomainError> {
        let images = Self::list_images(&self.library_dir)?;
        if images.is_empty() {
            return Err(DomainError::ImageSource(format!(
                "no images found in {}",
                self.library_dir.display()
            )));
        }

        let options: Vec<String> = images
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect();

        let chosen = match Select::new("Pick a room photo", options.clone()).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                info!("library picker dismissed");
                return Ok(PickOutcome::Cancelled);
            }
            Err(e) => return Err(DomainError::Ui(format!("library picker: {e}"))),
        };

        // Position maps the display name back to the full path.
        let index = options
            .iter()
            .position(|o| *o == chosen)
            .unwrap_or_default();
        let path = &images[index];
        Ok(PickOutcome::Picked(encode_for_upload(path, self.quality)?))
    }
}
