//! Implements InputPort. Inquire-based interactive loop.
//!
//! Thin I/O wrapper over the session: renders whatever state the session
//! holds and feeds trigger events (capture, pick, reset, save) back in.
//! All control flow decisions live in SessionService.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::style::Stylize;
use indicatif::ProgressBar;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{InquireError, Select};

use crate::domain::{
    CaptureOrigin, CapturedImage, DomainError, LineKind, Section, SessionState,
};
use crate::ports::InputPort;
use crate::usecases::{ReportService, SessionService};

/// Normalized glyph rendered in place of raw bullet markers.
const BULLET_GLYPH: char = '•';

const CHOICE_CAPTURE: &str = "Analyze a new photo (camera)";
const CHOICE_PICK: &str = "Choose a photo from the library";
const CHOICE_SAVE: &str = "Save critique as Markdown";
const CHOICE_RESET: &str = "Start over";
const CHOICE_QUIT: &str = "Quit";

/// Applies the warm render theme to all subsequent inquire prompts.
pub fn apply_theme() {
    let cfg = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightRed))
        .with_highlighted_option_prefix(Styled::new("▸").with_fg(Color::LightYellow));
    inquire::set_global_render_config(cfg);
}

/// TUI adapter. Inquire prompts, crossterm styled output.
pub struct TuiInputPort {
    session: Arc<SessionService>,
    reports: Arc<ReportService>,
}

impl TuiInputPort {
    pub fn new(session: Arc<SessionService>, reports: Arc<ReportService>) -> Self {
        Self { session, reports }
    }

    /// Run a camera cycle behind a spinner. The library cycle shows its own
    /// interactive picker, so it runs without one.
    async fn run_camera_cycle(&self) -> SessionState {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Capturing and analyzing…");
        spinner.enable_steady_tick(Duration::from_millis(80));
        let state = self.session.run_cycle(CaptureOrigin::Camera).await;
        spinner.finish_and_clear();
        state
    }

    async fn save_current_critique(&self, image: &CapturedImage, sections: &[Section]) {
        match self.reports.save_critique(image, sections).await {
            Ok(path) => println!("{} {}", "Saved:".green().bold(), path.display()),
            Err(e) => render_failure(&e),
        }
    }

    fn prompt(&self, options: Vec<&'static str>) -> Result<&'static str, DomainError> {
        match Select::new("What next?", options).prompt() {
            Ok(choice) => Ok(choice),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(CHOICE_QUIT)
            }
            Err(e) => Err(DomainError::Ui(e.to_string())),
        }
    }
}

fn render_sections(image: &CapturedImage, sections: &[Section]) {
    println!();
    println!(
        "{}",
        format!("Critique of {}", image.display_name()).bold().underlined()
    );
    println!("{}", format!("Photo: {}", image.origin.display()).dim());
    for section in sections {
        println!();
        println!("{}", section.heading.clone().cyan().bold());
        for line in &section.body {
            match line.kind {
                LineKind::Plain => println!("  {}", line.text),
                LineKind::SubPoint => {
                    println!("    {} {}", BULLET_GLYPH.to_string().yellow(), line.text)
                }
            }
        }
    }
    println!();
}

/// Single dismissible notice naming the failure category.
fn render_failure(error: &DomainError) {
    println!();
    println!(
        "{} {}",
        format!("[{} failure]", error.category()).red().bold(),
        error
    );
    println!();
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let state = self.session.state().await;
            let choice = match &state {
                SessionState::Idle | SessionState::Capturing | SessionState::Analyzing { .. } => {
                    self.prompt(vec![CHOICE_CAPTURE, CHOICE_PICK, CHOICE_QUIT])?
                }
                SessionState::Result { image, sections } => {
                    render_sections(image, sections);
                    self.prompt(vec![CHOICE_SAVE, CHOICE_RESET, CHOICE_QUIT])?
                }
                SessionState::Failed { error, .. } => {
                    render_failure(error);
                    self.prompt(vec![CHOICE_RESET, CHOICE_QUIT])?
                }
            };

            match choice {
                CHOICE_CAPTURE => {
                    self.run_camera_cycle().await;
                }
                CHOICE_PICK => {
                    self.session.run_cycle(CaptureOrigin::Library).await;
                }
                CHOICE_SAVE => {
                    if let SessionState::Result { image, sections } = &state {
                        self.save_current_critique(image, sections).await;
                    }
                }
                CHOICE_RESET => {
                    self.session.reset().await;
                }
                _ => return Ok(()),
            }
        }
    }
}
