//! Report service. Writes a parsed critique to disk as Markdown.
//!
//! Offered from the Result state so a critique survives the session reset.

use std::path::PathBuf;

use chrono::Utc;
use tokio::fs;
use tracing::info;

use crate::domain::{CapturedImage, DomainError, LineKind, Section};

/// Saves critiques as timestamped Markdown files under `reports_dir`.
pub struct ReportService {
    reports_dir: PathBuf,
}

impl ReportService {
    pub fn new(reports_dir: PathBuf) -> Self {
        Self { reports_dir }
    }

    /// Render and persist one critique. Returns the written path.
    pub async fn save_critique(
        &self,
        image: &CapturedImage,
        sections: &[Section],
    ) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(|e| DomainError::Report(format!("create reports dir: {e}")))?;

        let stem = image
            .origin
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let timestamp = Utc::now();
        let filename = format!("critique_{}_{}.md", stem, timestamp.format("%Y%m%d-%H%M%S"));
        let path = self.reports_dir.join(&filename);

        let mut md = String::new();
        md.push_str(&format!("# Room Critique: {}\n\n", image.display_name()));
        md.push_str(&format!(
            "**Photo:** {} | **Generated:** {}\n\n---\n\n",
            image.origin.display(),
            timestamp.format("%Y-%m-%d %H:%M UTC")
        ));

        for section in sections {
            md.push_str(&format!("## {}\n\n", section.heading));
            for line in &section.body {
                match line.kind {
                    LineKind::SubPoint => md.push_str(&format!("- {}\n", line.text)),
                    LineKind::Plain => md.push_str(&format!("{}\n\n", line.text)),
                }
            }
            md.push('\n');
        }

        fs::write(&path, md)
            .await
            .map_err(|e| DomainError::Report(format!("write report: {e}")))?;

        info!(path = %path.display(), sections = sections.len(), "critique report written");
        Ok(path)
    }
}
