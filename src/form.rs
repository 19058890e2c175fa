#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub required: bool,
    pub value: String,
    /// Cursor position in characters, not bytes.
    pub cursor: usize,
}

impl FormField {
    pub fn new(label: &'static str, hint: &'static str) -> Self {
        FormField {
            label,
            hint,
            required: false,
            value: String::new(),
            cursor: 0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn byte_offset(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// A popup form: a column of single-line text fields with one focused.
#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
}

impl Form {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Form {
            title: title.into(),
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.focused_mut() {
            let at = field.byte_offset();
            field.value.insert(at, c);
            field.cursor += 1;
        }
        self.error = None;
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.focused_mut() {
            if field.cursor > 0 {
                field.cursor -= 1;
                let at = field.byte_offset();
                field.value.remove(at);
            }
        }
        self.error = None;
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.cursor = field.cursor.saturating_sub(1);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(field) = self.focused_mut() {
            if field.cursor < field.char_len() {
                field.cursor += 1;
            }
        }
    }

    pub fn move_to_start_of_line(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.cursor = 0;
        }
    }

    pub fn move_to_end_of_line(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.cursor = field.char_len();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = if self.focus == 0 { self.fields.len() - 1 } else { self.focus - 1 };
        }
    }

    /// Trimmed value of the field labelled `label`, empty if there is none.
    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map_or("", |field| field.value.trim())
    }

    pub fn set_value(&mut self, label: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.label == label) {
            field.value = value.to_string();
            field.cursor = field.char_len();
        }
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.required && field.is_blank())
            .map(|field| field.label)
            .collect()
    }

    /// Submission stays disabled while a required field is blank.
    pub fn can_submit(&self) -> bool {
        self.missing_required().is_empty()
    }
}
