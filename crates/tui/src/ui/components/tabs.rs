use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Screen, ui::theme::Theme};

/// Tab bar of the logged-in screens. Screens outside the bar (such as
/// account creation) highlight nothing.
pub fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: Screen, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];

    for (i, screen) in Screen::TABS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let label = screen.label();
        if *screen == active {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
