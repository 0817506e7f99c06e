pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        area,
    );

    match state.screen {
        Screen::Login | Screen::Signup => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            screens::login::render(frame, layout[0], state, &theme);
            render_bottom_bar(frame, layout[1], state, &theme);
        }
        _ => render_shell(frame, area, state, &theme),
    }
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_tabs(frame, layout[1], state.screen, theme);

    let content = layout[2];
    match state.screen {
        Screen::Accounts => screens::accounts::render(frame, content, state, theme),
        Screen::AddAccount => components::form::render_centered(
            frame,
            content,
            "add account",
            &state.add_account,
            theme,
        ),
        Screen::Transfer => screens::transfer::render(frame, content, state, theme),
        Screen::History => screens::history::render(frame, content, state, theme),
        Screen::Loan => screens::loan::render(frame, content, state, theme),
        Screen::Profile => screens::profile::render(frame, content, state, theme),
        Screen::Feedback => screens::feedback::render(frame, content, state, theme),
        Screen::Login | Screen::Signup => {}
    }

    render_bottom_bar(frame, layout[3], state, theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .session
        .current()
        .map(|session| session.username.as_str())
        .unwrap_or("-");
    let account = state.default_account_number().unwrap_or("-");

    let line = Line::from(vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Default account", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {account}  ")),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.base_url)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints = components::hints::for_screen(state.screen, state.transfer.mode);
    let bar = Paragraph::new(Line::from(components::hints::hints_to_spans(&hints, theme)));
    frame.render_widget(bar, area);
}
