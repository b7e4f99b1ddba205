pub mod banner;
pub mod tui;

pub use tui::TuiInputPort;

/// Prints the welcome banner and applies the warm theme for all subsequent
/// inquire prompts. Call once at startup (after tracing init).
pub fn init_ui() {
    banner::print_welcome();
    tui::apply_theme();
}
