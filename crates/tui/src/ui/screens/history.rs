use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::transaction::TransactionHistoryEntry;
use engine::Amount;

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let history = &state.history;
    let mut line = vec![
        Span::styled("Transactions", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", history.items.len())),
    ];
    if history.loading {
        line.push(Span::styled("   loading...", Style::default().fg(theme.text_muted)));
    }
    if let Some(err) = &history.error {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default().borders(Borders::ALL).title("History");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    if state.history.items.is_empty() && !state.history.loading {
        let block = Block::default().borders(Borders::ALL);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No transactions yet.",
                Style::default().fg(theme.text_muted),
            ))
            .block(block),
            area,
        );
        return;
    }

    let items = state
        .history
        .items
        .iter()
        .map(|entry| ListItem::new(Line::from(row(entry, state))))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(state.history.selected));
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

fn row(entry: &TransactionHistoryEntry, state: &AppState) -> String {
    let date = entry
        .created_at
        .map(|at| at.format("%d %b %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let kind = entry.transaction_type.as_deref().unwrap_or("-");
    let amount = Amount::from_major(entry.amount);
    let from = account_ref(entry.from_account_id, state);
    let to = match (&entry.upi_id, entry.to_account_id) {
        (Some(upi), _) => upi.clone(),
        (None, id) => account_ref(id, state),
    };
    let status = entry.status.as_deref().unwrap_or("");
    format!("{date}  {kind:<18} {amount:>12}  {from} -> {to}  {status}")
}

/// Own accounts are shown by number, others by backend id.
fn account_ref(id: Option<i64>, state: &AppState) -> String {
    match id {
        Some(id) => state
            .accounts
            .by_id(id)
            .map(|account| account.account_number.clone())
            .unwrap_or_else(|| format!("#{id}")),
        None => "-".to_string(),
    }
}
