use crate::app::{ToastLevel, ToastState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Name,
    Email,
    Password,
    BankName,
    BankCode,
    AccountNumber,
    From,
    To,
    ToAccountNumber,
    BillType,
    BillReference,
    UpiId,
    Amount,
    Account,
    FeedbackText,
    Rating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    /// Cycled with left/right. `None` until the user picks something.
    Choice {
        options: Vec<String>,
        selected: Option<usize>,
    },
}

#[derive(Debug, Clone)]
pub struct Field {
    pub id: FieldId,
    pub label: String,
    pub value: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(id: FieldId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            value: String::new(),
            kind: FieldKind::Text,
        }
    }

    pub fn secret(id: FieldId, label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(id, label)
        }
    }

    pub fn choice(
        id: FieldId,
        label: impl Into<String>,
        options: Vec<String>,
        selected: Option<usize>,
    ) -> Self {
        let selected = selected.filter(|index| *index < options.len());
        Self {
            kind: FieldKind::Choice { options, selected },
            ..Self::text(id, label)
        }
    }

    /// What the field shows: masked for secrets, the selected option for
    /// choices.
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Text => self.value.clone(),
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Choice { options, selected } => selected
                .and_then(|index| options.get(index))
                .map(|option| format!("< {option} >"))
                .unwrap_or_else(|| "< select >".to_string()),
        }
    }
}

/// Fields of one screen plus its submission state.
///
/// `pending` is set while a request is in flight; a second submit is ignored
/// until the reply has been applied.
#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<Field>,
    pub focus: usize,
    pub pending: bool,
    pub message: Option<ToastState>,
}

impl FormState {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            focus: 0,
            pending: false,
            message: None,
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    pub fn value(&self, id: FieldId) -> &str {
        self.field(id).map(|field| field.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>) {
        if let Some(field) = self.field_mut(id) {
            field.value = value.into();
        }
    }

    pub fn selected(&self, id: FieldId) -> Option<usize> {
        match self.field(id).map(|field| &field.kind) {
            Some(FieldKind::Choice { selected, .. }) => *selected,
            _ => None,
        }
    }

    pub fn select(&mut self, id: FieldId, index: Option<usize>) {
        if let Some(Field {
            kind: FieldKind::Choice { options, selected },
            ..
        }) = self.field_mut(id)
        {
            *selected = index.filter(|index| *index < options.len());
        }
    }

    /// Replaces the options of a choice, keeping the selection when it is
    /// still in range.
    pub fn set_options(&mut self, id: FieldId, new_options: Vec<String>) {
        if let Some(Field {
            kind: FieldKind::Choice { options, selected },
            ..
        }) = self.field_mut(id)
        {
            *selected = selected.filter(|index| *index < new_options.len());
            *options = new_options;
        }
    }

    pub fn set_label(&mut self, id: FieldId, label: impl Into<String>) {
        if let Some(field) = self.field_mut(id) {
            field.label = label.into();
        }
    }

    pub fn focused(&self) -> Option<FieldId> {
        self.fields.get(self.focus).map(|field| field.id)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn input(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !matches!(field.kind, FieldKind::Choice { .. }) {
                field.value.push(ch);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Moves the focused choice by `step`. Returns the field that changed.
    pub fn cycle(&mut self, step: isize) -> Option<FieldId> {
        let field = self.fields.get_mut(self.focus)?;
        let FieldKind::Choice { options, selected } = &mut field.kind else {
            return None;
        };
        if options.is_empty() {
            return None;
        }
        let len = options.len() as isize;
        let next = match *selected {
            Some(index) => (index as isize + step).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        *selected = Some(next as usize);
        Some(field.id)
    }

    /// Marks the form as submitting. Returns false if it already is.
    pub fn begin_submit(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        self.message = Some(ToastState::new("Working...", ToastLevel::Info));
        true
    }

    pub fn finish(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.pending = false;
        self.message = Some(ToastState::new(message, level));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.message = Some(ToastState::new(message, ToastLevel::Error));
    }

    pub fn clear_secrets(&mut self) {
        for field in &mut self.fields {
            if field.kind == FieldKind::Secret {
                field.value.clear();
            }
        }
    }
}
