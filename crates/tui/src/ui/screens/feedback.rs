use ratatui::{Frame, layout::Rect};

use crate::{
    app::AppState,
    ui::{components::form, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let width = area.width.min(60);
    let card = form::centered_box(width, form::form_height(&state.feedback), area);
    form::render_form(frame, card, "feedback", &state.feedback, theme);
}
