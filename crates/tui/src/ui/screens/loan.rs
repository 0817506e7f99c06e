use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{components::form, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let loan = &state.loan;
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut lines = Vec::new();
    match (&loan.instructions, loan.loading) {
        (Some(text), _) => lines.extend(text.lines().map(|line| Line::from(line.to_string()))),
        (None, true) => lines.push(Line::from(Span::styled(
            "loading...",
            Style::default().fg(theme.text_muted),
        ))),
        (None, false) => {}
    }
    if let Some(status) = loan.status {
        lines.push(Line::from(""));
        let (text, color) = if status.has_active_loan {
            ("You have an active loan.", theme.error)
        } else {
            ("No active loan: you can apply.", theme.positive)
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
    }
    let block = Block::default().borders(Borders::ALL).title("Instructions");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        layout[0],
    );

    let card = form::centered_box(layout[1].width, form::form_height(&loan.form), layout[1]);
    form::render_form(frame, card, "apply", &loan.form, theme);
}
