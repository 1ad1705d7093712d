//! Signup form state: one map from input name to its current value.
//!
//! Nothing is validated and nothing is sent anywhere; submitting only logs the values.

use std::collections::BTreeMap;

use serde::Serialize;

/// Current value of one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Password,
    Checkbox,
}

/// One input of the form: its `name`, kind and placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: InputKind,
    pub placeholder: &'static str,
}

pub const FIELDS: [FieldSpec; 8] = [
    FieldSpec { name: "name", kind: InputKind::Text, placeholder: "Name" },
    FieldSpec { name: "email", kind: InputKind::Email, placeholder: "Email" },
    FieldSpec { name: "jobTitle", kind: InputKind::Text, placeholder: "Job Title" },
    FieldSpec { name: "investment", kind: InputKind::Text, placeholder: "Investment" },
    FieldSpec { name: "income", kind: InputKind::Text, placeholder: "Income" },
    FieldSpec { name: "password", kind: InputKind::Password, placeholder: "Password" },
    FieldSpec { name: "confirmPassword", kind: InputKind::Password, placeholder: "Confirm Password" },
    FieldSpec { name: "remember", kind: InputKind::Checkbox, placeholder: "Remember me" },
];

/// A keystroke or toggle on one input.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    pub name: &'a str,
    pub kind: InputKind,
    pub value: &'a str,
    pub checked: bool,
}

impl<'a> ChangeEvent<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            kind: InputKind::Text,
            value,
            checked: false,
        }
    }

    pub fn checkbox(name: &'a str, checked: bool) -> Self {
        Self {
            name,
            kind: InputKind::Checkbox,
            value: "",
            checked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    values: BTreeMap<String, FieldValue>,
}

impl Default for SignupForm {
    fn default() -> Self {
        let values = FIELDS
            .iter()
            .map(|f| {
                let v = match f.kind {
                    InputKind::Checkbox => FieldValue::Flag(false),
                    _ => FieldValue::Text(String::new()),
                };
                (f.name.to_string(), v)
            })
            .collect();
        Self { values }
    }
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the event's value under its input name: `checked` for checkboxes, the text
    /// otherwise. Names outside [`FIELDS`] are stored too.
    pub fn handle_change(&mut self, event: ChangeEvent<'_>) {
        let value = match event.kind {
            InputKind::Checkbox => FieldValue::Flag(event.checked),
            _ => FieldValue::Text(event.value.to_string()),
        };
        self.values.insert(event.name.to_string(), value);
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            FieldValue::Flag(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Logs the current values with passwords masked and returns what was logged.
    pub fn submit(&self) -> serde_json::Value {
        let masked: BTreeMap<&str, FieldValue> = self
            .values
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    FieldValue::Text(s) if is_secret(k) && !s.is_empty() => FieldValue::Text("***".into()),
                    other => other.clone(),
                };
                (k.as_str(), v)
            })
            .collect();
        let payload = serde_json::to_value(&masked).unwrap_or(serde_json::Value::Null);
        tracing::info!(form = %payload, "form submitted");
        payload
    }
}

fn is_secret(name: &str) -> bool {
    FIELDS
        .iter()
        .any(|f| f.name == name && f.kind == InputKind::Password)
}
