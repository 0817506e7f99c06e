use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.text_muted));
    let lines = match state.session.current() {
        Some(session) => vec![
            Line::from(vec![label("Name     "), Span::raw(session.username.clone())]),
            Line::from(vec![label("Email    "), Span::raw(session.email.clone())]),
            Line::from(vec![label("User id  "), Span::raw(session.user_id.to_string())]),
            Line::from(vec![
                label("Default  "),
                Span::raw(session.account_number.clone().unwrap_or_else(|| "-".to_string())),
            ]),
            Line::from(vec![
                label("Accounts "),
                Span::raw(state.accounts.items.len().to_string()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to log out.",
                Style::default().fg(theme.accent),
            )),
        ],
        None => vec![Line::from("Not logged in.")],
    };

    let block = Block::default().borders(Borders::ALL).title("Profile");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
