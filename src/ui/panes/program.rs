//! Program pane rendering
//!
//! Lists the running process's instructions with line numbers, marking the
//! instruction the next Quantum will execute. When the counter has run past
//! the last instruction a synthetic end marker is shown instead.

use super::{border_style, clamp_scroll};
use crate::program::Instruction;
use crate::snapshot::{CpuRegisters, ProcessView};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the program pane
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    program: Option<&[Instruction]>,
    running: Option<&ProcessView>,
    registers: Option<CpuRegisters>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = match running {
        Some(view) => format!(" Program (process {}) ", view.pid),
        None => " Program ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let (Some(program), Some(view)) = (program, running) else {
        let paragraph = Paragraph::new("(CPU idle)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let pc = registers.map_or(view.program_counter, |r| r.program_counter);
    let mut lines: Vec<Line> = program
        .iter()
        .enumerate()
        .map(|(index, instruction)| instruction_line(index, instruction, index == pc))
        .collect();

    if pc >= program.len() {
        lines.push(Line::from(Span::styled(
            format!("▶ {:>3}  (end of program)", pc),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .bg(DEFAULT_THEME.current_line_bg),
        )));
    }

    // Keep the current instruction on screen
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let current_row = pc.min(lines.len().saturating_sub(1));
    if current_row < *scroll_offset {
        *scroll_offset = current_row;
    } else if current_row >= *scroll_offset + visible_height {
        *scroll_offset = current_row + 1 - visible_height;
    }
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn instruction_line(index: usize, instruction: &Instruction, is_current: bool) -> Line<'static> {
    let marker = if is_current { "▶" } else { " " };
    let mut spans = vec![
        Span::styled(
            format!("{} {:>3}  ", marker, index),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            instruction.opcode().to_string(),
            Style::default()
                .fg(DEFAULT_THEME.opcode)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    match instruction {
        Instruction::Replace(name) => spans.push(Span::styled(
            format!(" {}", name),
            Style::default().fg(DEFAULT_THEME.secondary),
        )),
        other => {
            if let Some(arg) = other.int_arg() {
                spans.push(Span::styled(
                    format!(" {}", arg),
                    Style::default().fg(DEFAULT_THEME.number),
                ));
            }
        }
    }

    let line = Line::from(spans);
    if is_current {
        line.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
    } else {
        line
    }
}
