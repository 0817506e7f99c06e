use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use engine::Amount;

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    render_header(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
    render_receive(frame, layout[2], state, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let accounts = &state.accounts;
    let total: Amount = accounts
        .items
        .iter()
        .map(|account| Amount::from_major(account.balance))
        .sum();

    let mut line = vec![
        Span::styled("Accounts", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}   ", accounts.items.len())),
        Span::styled("Total", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {total}")),
    ];
    if accounts.loading {
        line.push(Span::styled("   loading...", Style::default().fg(theme.text_muted)));
    }
    if let Some(err) = &accounts.error {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default().borders(Borders::ALL).title("Accounts");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let default_number = state.default_account_number();
    let items = state
        .accounts
        .items
        .iter()
        .map(|account| {
            let marker = if Some(account.account_number.as_str()) == default_number {
                "*"
            } else {
                " "
            };
            let code = account.bank_code.as_deref().unwrap_or("-");
            let balance = Amount::from_major(account.balance);
            ListItem::new(Line::from(format!(
                "{marker} {:<18} {:<8} {:<16} {balance:>14}",
                account.bank_name, code, account.account_number
            )))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(state.accounts.selected));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_receive(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let text = match &state.accounts.receive_link {
        Some(link) => Line::from(Span::styled(link.as_str(), Style::default().fg(theme.text))),
        None => Line::from(Span::styled(
            "Press x to get a UPI link for the selected account.",
            Style::default().fg(theme.text_muted),
        )),
    };
    let block = Block::default().borders(Borders::ALL).title("Receive");
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
