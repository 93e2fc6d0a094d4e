use ratatui::style::Color;

/// Colours for the simulator panes: process states get their own hues so
/// the running, blocked, and ready sections read apart at a glance
pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Ready queue, clock badge
    pub secondary: Color, // Priority headers, program names
    pub comment: Color,
    pub success: Color, // Running process
    pub error: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub opcode: Color,
    pub blocked: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(220, 223, 228),
    primary: Color::Rgb(86, 182, 194),    // Teal
    secondary: Color::Rgb(198, 160, 246), // Lavender
    comment: Color::Rgb(118, 124, 138),
    success: Color::Rgb(120, 200, 120),
    error: Color::Rgb(232, 96, 96),
    number: Color::Rgb(229, 192, 123),
    border_focused: Color::Rgb(86, 182, 194),
    border_normal: Color::Rgb(70, 76, 88),
    current_line_bg: Color::Rgb(38, 44, 56),
    opcode: Color::Rgb(97, 175, 239),
    blocked: Color::Rgb(224, 140, 70), // Amber, waiting on U
};
