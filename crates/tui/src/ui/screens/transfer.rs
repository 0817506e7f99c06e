use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, TransferMode},
    ui::{components::form, theme::Theme},
};

const MODES: [(TransferMode, &str); 4] = [
    (TransferMode::SelfTransfer, "s"),
    (TransferMode::ToOthers, "o"),
    (TransferMode::BillPayment, "b"),
    (TransferMode::Upi, "u"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let mut spans = vec![Span::raw(" ")];
    for (mode, key) in MODES {
        let style = if mode == state.transfer.mode {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        spans.push(Span::styled(format!("{} ({key})", mode.label()), style));
        spans.push(Span::raw("   "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), layout[0]);

    let transfer_form = &state.transfer.form;
    let title = if transfer_form.pending {
        format!("{} - sending", state.transfer.mode.label())
    } else {
        state.transfer.mode.label().to_string()
    };
    let width = layout[1].width.min(56);
    let card = form::centered_box(width, form::form_height(transfer_form), layout[1]);
    form::render_form(frame, card, &title, transfer_form, theme);
}
