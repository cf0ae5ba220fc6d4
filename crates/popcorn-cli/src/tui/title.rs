use crossterm::execute;
use crossterm::terminal::SetTitle;
use popcorn_core::TitleSink;
use std::io;
use tracing::warn;

/// Sets the terminal window title.
#[derive(Debug, Default)]
pub struct TerminalTitle;

impl TitleSink for TerminalTitle {
    fn set_title(&self, title: &str) {
        if let Err(e) = execute!(io::stdout(), SetTitle(title)) {
            warn!(error = %e, "Failed to set terminal title");
        }
    }
}
