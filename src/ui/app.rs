//! Main TUI application state and logic

use crate::commander::Command;
use crate::manager::{Flow, ProcessManager};
use crate::snapshot::{LineKind, OutputSink, Transcript};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Output lines kept for the output pane; older lines are dropped
pub const OUTPUT_HISTORY_LIMIT: usize = 2000;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Processes,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (program -> processes -> output)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Processes,
            FocusedPane::Processes => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Program,
        }
    }
}

/// The main application state
pub struct App {
    /// The simulated kernel driven by key presses
    pub manager: ProcessManager,

    /// Recent manager output, bounded by `OUTPUT_HISTORY_LIMIT`
    pub transcript: Transcript,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub program_scroll: usize,
    pub processes_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(manager: ProcessManager) -> Self {
        App {
            manager,
            transcript: Transcript::with_limit(OUTPUT_HISTORY_LIMIT),
            focused_pane: FocusedPane::Program,
            program_scroll: 0,
            processes_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 3 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[0]);

        // Right column: Processes (top) | Output (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        let snapshot = self.manager.snapshot();

        super::panes::render_program_pane(
            frame,
            columns[0],
            self.manager.running_program(),
            snapshot.running.as_ref(),
            snapshot.registers,
            self.focused_pane == FocusedPane::Program,
            &mut self.program_scroll,
        );

        super::panes::render_processes_pane(
            frame,
            right_rows[0],
            &snapshot,
            self.focused_pane == FocusedPane::Processes,
            &mut self.processes_scroll,
        );

        super::panes::render_output_pane(
            frame,
            right_rows[1],
            &self.transcript,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            &snapshot,
            self.manager.is_terminated(),
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.manager.is_terminated() {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(c) => match Command::from_char(c.to_ascii_uppercase()) {
                Ok(command) => self.run_command(command),
                Err(err) => self.status_message = err.to_string(),
            },
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Program => &mut self.program_scroll,
            FocusedPane::Processes => &mut self.processes_scroll,
            FocusedPane::Output => &mut self.output_scroll,
        }
    }

    /// Dispatch a command and summarize its effect in the status bar
    pub fn run_command(&mut self, command: Command) {
        let mut output = Transcript::new();
        let flow = self.manager.dispatch(command, &mut output);

        let diagnostic = output
            .lines
            .iter()
            .find(|line| line.kind == LineKind::Diagnostic)
            .map(|line| line.text.clone());
        self.transcript.emit_all(output.lines);

        // Auto-scroll output to bottom
        self.output_scroll = usize::MAX;

        self.status_message = match (flow, diagnostic) {
            (Flow::Exit, _) => format!(
                "{} (press any key to exit)",
                self.manager.accounting().summary()
            ),
            (_, Some(text)) => text,
            (_, None) => match command {
                Command::Quantum => format!("Quantum at time {}", self.manager.timestamp()),
                Command::Unblock => "Unblocked".to_string(),
                Command::Print => "State printed to output".to_string(),
                Command::Terminate => "Terminated".to_string(),
            },
        };
    }
}
