use ratatui::{style::Style, text::Span};

use crate::{
    app::{Screen, TransferMode},
    ui::theme::Theme,
};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

const FORM: [KeyHint; 4] = [
    hint("Tab", "next"),
    hint("←/→", "choose"),
    hint("Enter", "submit"),
    hint("Esc", "back"),
];

const NAV: [KeyHint; 6] = [
    hint("s/o/b/u", "pay"),
    hint("h", "history"),
    hint("l", "loan"),
    hint("f", "feedback"),
    hint("p", "profile"),
    hint("q", "quit"),
];

/// Hints for the current screen.
pub fn for_screen(screen: Screen, mode: TransferMode) -> Vec<KeyHint> {
    match screen {
        Screen::Login => vec![
            hint("Tab", "next"),
            hint("Enter", "log in"),
            hint("Ctrl+N", "sign up"),
            hint("Ctrl+C", "quit"),
        ],
        Screen::Signup => vec![
            hint("Tab", "next"),
            hint("Enter", "create"),
            hint("Esc", "login"),
        ],
        Screen::Accounts => {
            let mut hints = vec![
                hint("↑/↓", "select"),
                hint("a", "add"),
                hint("d", "default"),
                hint("x", "receive"),
                hint("r", "refresh"),
            ];
            hints.extend(NAV);
            hints
        }
        Screen::History => {
            let mut hints = vec![hint("↑/↓", "select"), hint("r", "refresh")];
            hints.extend(NAV);
            hints
        }
        Screen::Profile => {
            let mut hints = vec![hint("Enter", "log out")];
            hints.extend(NAV);
            hints
        }
        Screen::Feedback => vec![
            hint("Tab", "next"),
            hint("←/→", "stars"),
            hint("Enter", "send"),
            hint("Esc", "back"),
        ],
        Screen::Transfer if mode == TransferMode::ToOthers || mode == TransferMode::Upi => vec![
            hint("Tab", "next"),
            hint("←/→", "source"),
            hint("Enter", "pay"),
            hint("Esc", "back"),
        ],
        Screen::AddAccount | Screen::Loan | Screen::Transfer => FORM.to_vec(),
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}
