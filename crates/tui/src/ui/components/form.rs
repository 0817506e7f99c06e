use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::form::{FieldKind, FormState},
    ui::{components::toast, theme::Theme},
};

/// Calculates a centered rect of at most `width` x `height`.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Height needed by [`render_form`] for `form`.
pub fn form_height(form: &FormState) -> u16 {
    form.fields.len() as u16 * 2 + 2
}

/// Renders the fields as label/value rows inside a rounded box, with the
/// form message centered under it.
pub fn render_form(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    form: &FormState,
    theme: &Theme,
) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            form.fields
                .iter()
                .map(|_| Constraint::Length(2))
                .collect::<Vec<_>>(),
        )
        .split(inner);

    for (index, (field, row)) in form.fields.iter().zip(rows.iter()).enumerate() {
        let focused = index == form.focus;
        let cursor = match field.kind {
            FieldKind::Choice { .. } => "",
            _ if focused => "│",
            _ => "",
        };
        let value_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };
        let lines = vec![
            Line::from(Span::styled(
                field.label.as_str(),
                Style::default().fg(theme.text_muted),
            )),
            Line::from(Span::styled(format!("{}{cursor}", field.display()), value_style)),
        ];
        frame.render_widget(Paragraph::new(lines), *row);
    }

    if let Some(message) = &form.message {
        let message_area = Rect {
            x: area.x,
            y: area.y.saturating_add(area.height),
            width: area.width,
            height: 1,
        }
        .intersection(frame.area());
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.message.as_str(),
                toast::style_for(message.level, theme),
            ))
            .alignment(Alignment::Center),
            message_area,
        );
    }
}

/// A form centered in `area`.
pub fn render_centered(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    form: &FormState,
    theme: &Theme,
) {
    let width = area.width.min(48);
    let card = centered_box(width, form_height(form), area);
    render_form(frame, card, title, form, theme);
}
