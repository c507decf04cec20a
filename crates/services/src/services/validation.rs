//! Field rules checked right before a form is submitted.
//!
//! Checks run in declaration order and the first failing field is the one
//! reported, so callers list fields in the order they want errors surfaced.
//!
//! `blank: true` marks a field that must not be empty. Anything else is
//! optional: an empty optional field skips its length and size rules.

use super::api_client::Attachment;

/// The current value of one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Size in bytes of a picked file.
    File(u64),
    Empty,
}

impl FieldValue {
    /// Empty strings (after trimming), zero and missing files count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Number(n) => *n == 0.0,
            FieldValue::File(_) => false,
            FieldValue::Empty => true,
        }
    }

    fn length(&self) -> usize {
        match self {
            FieldValue::Text(text) => text.trim().chars().count(),
            FieldValue::Number(n) => n.to_string().chars().count(),
            FieldValue::File(_) | FieldValue::Empty => 0,
        }
    }

    fn size(&self) -> u64 {
        match self {
            FieldValue::Text(text) => text.len() as u64,
            FieldValue::File(size) => *size,
            FieldValue::Number(_) | FieldValue::Empty => 0,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<&Attachment> for FieldValue {
    fn from(file: &Attachment) -> Self {
        FieldValue::File(file.size())
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Empty, Into::into)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    pub blank: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Bytes.
    pub max_size: Option<u64>,
}

impl Rules {
    pub fn required() -> Self {
        Self {
            blank: true,
            ..Default::default()
        }
    }

    pub fn optional() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldCheck {
    /// Key in the form draft.
    pub name: String,
    pub value: FieldValue,
    pub rules: Rules,
    /// Label used in messages.
    pub field: String,
}

impl FieldCheck {
    pub fn new(
        name: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
        rules: Rules,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            rules,
            field: field.into(),
        }
    }

    /// Message for the first rule this field breaks, or an empty string.
    pub fn check(&self) -> String {
        let label = &self.field;
        let rules = &self.rules;

        if self.value.is_empty() {
            return if rules.blank {
                format!("{label} is required")
            } else {
                String::new()
            };
        }

        let length = self.value.length();
        if let Some(min) = rules.min_length
            && length < min
        {
            return format!("{label} must be at least {min} characters");
        }
        if let Some(max) = rules.max_length
            && length > max
        {
            return format!("{label} must not exceed {max} characters");
        }
        if let Some(max) = rules.max_size
            && self.value.size() > max
        {
            return format!("{label} must not be larger than {}", human_size(max));
        }

        String::new()
    }
}

/// Field name to message, in check order. An empty message means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: Vec<(String, String)>,
}

impl ValidationReport {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, message)| message.as_str())
    }

    /// The error shown to the user: the first non-empty message.
    pub fn first_error(&self) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(_, message)| !message.is_empty())
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn is_valid(&self) -> bool {
        self.first_error().is_none()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

pub fn validate(checks: &[FieldCheck]) -> ValidationReport {
    ValidationReport {
        entries: checks
            .iter()
            .map(|check| (check.name.clone(), check.check()))
            .collect(),
    }
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}
