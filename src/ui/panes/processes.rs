//! Process queues pane rendering

use super::{border_style, clamp_scroll};
use crate::snapshot::{ProcessView, SystemSnapshot};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render running, blocked, and ready processes from a snapshot
pub fn render_processes_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SystemSnapshot,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Processes ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let mut lines = vec![header("Running", DEFAULT_THEME.success)];
    match &snapshot.running {
        Some(view) => {
            // Show the registers in use rather than the last saved copy
            let mut live = view.clone();
            if let Some(registers) = snapshot.registers {
                live.program_counter = registers.program_counter;
                live.value = registers.value;
            }
            lines.push(process_line(&live, true));
        }
        None => lines.push(none_line()),
    }

    lines.push(Line::default());
    lines.push(header("Blocked", DEFAULT_THEME.blocked));
    if snapshot.blocked.is_empty() {
        lines.push(none_line());
    } else {
        lines.extend(snapshot.blocked.iter().map(|view| process_line(view, true)));
    }

    lines.push(Line::default());
    lines.push(header("Ready", DEFAULT_THEME.primary));
    if snapshot.ready.is_empty() {
        lines.push(none_line());
    } else {
        for group in &snapshot.ready {
            lines.push(Line::from(Span::styled(
                format!(" priority {}", group.priority),
                Style::default().fg(DEFAULT_THEME.secondary),
            )));
            lines.extend(group.processes.iter().map(|view| process_line(view, false)));
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn header(title: &str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn none_line() -> Line<'static> {
    Line::from(Span::styled(
        "  None",
        Style::default().fg(DEFAULT_THEME.comment),
    ))
}

fn process_line(view: &ProcessView, with_priority: bool) -> Line<'static> {
    let label = Style::default().fg(DEFAULT_THEME.comment);
    let number = Style::default().fg(DEFAULT_THEME.number);
    let parent = view.parent.map_or("-".to_string(), |p| p.to_string());

    let mut spans = vec![
        Span::styled(format!("  pid {:<3}", view.pid), Style::default().fg(DEFAULT_THEME.fg)),
        Span::styled(" parent ", label),
        Span::styled(format!("{:<3}", parent), number),
    ];
    if with_priority {
        spans.push(Span::styled(" pri ", label));
        spans.push(Span::styled(view.priority.to_string(), number));
    }
    spans.extend([
        Span::styled(" value ", label),
        Span::styled(format!("{:<6}", view.value), number),
        Span::styled(" pc ", label),
        Span::styled(format!("{}/{}", view.program_counter, view.program_len), number),
        Span::styled(" start ", label),
        Span::styled(view.start_time.to_string(), number),
        Span::styled(" used ", label),
        Span::styled(view.time_used.to_string(), number),
    ]);

    Line::from(spans)
}
