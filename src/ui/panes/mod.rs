//! TUI pane rendering modules
//!
//! Each pane module exports a primary `render_*` function that draws from
//! borrowed state and keeps only its scroll offset between frames.
//!
//! # Pane Modules
//!
//! - [`program`]: instructions of the running process with the program counter marked
//! - [`processes`]: running process, blocked queue, and ready queue by priority
//! - [`output`]: manager output (traces, diagnostics, reports)
//! - [`status`]: status bar with clock, turnaround, and keybindings

pub mod output;
pub mod processes;
pub mod program;
pub mod status;

// Re-export render functions for convenience
pub use output::render_output_pane;
pub use processes::render_processes_pane;
pub use program::render_program_pane;
pub use status::render_status_bar;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

/// Border style shared by all panes
fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp a scroll offset so the last page stays full
fn clamp_scroll(scroll_offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }
}
