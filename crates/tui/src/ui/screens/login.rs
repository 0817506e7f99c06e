use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
};

use crate::{
    app::{AppState, Screen},
    ui::{components::form, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (title, form_state) = match state.screen {
        Screen::Signup => ("sign up", &state.signup),
        _ => ("login", &state.login),
    };

    let width = area.width.min(44);
    let card = form::centered_box(width, form::form_height(form_state), area);
    form::render_form(frame, card, title, form_state, theme);

    let server_area = Rect {
        x: area.x,
        y: card.y.saturating_sub(2),
        width: area.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("Mobile banking  {}", state.base_url),
            Style::default().fg(theme.text_muted),
        ))
        .alignment(Alignment::Center),
        server_area,
    );
}
