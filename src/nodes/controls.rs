//! Node controls (widgets) that hold editable and persisted values

use serde::{Deserialize, Serialize};

use crate::constants::layout;

/// Index of a control within its node's control list
pub type ControlId = usize;

/// Kind of control, determines how the host draws it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlKind {
    /// Single-line or multiline text field
    Text,
    /// Numeric field
    Number,
    /// Drop-down selector with fixed choices
    Combo { values: Vec<String> },
    /// Push button, carries no value
    Button,
}

/// Value stored in a control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ControlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ControlValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ControlValue::Int(i) => Some(*i),
            ControlValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Text content, empty for non-text values
    pub fn to_text(&self) -> String {
        match self {
            ControlValue::String(s) => s.clone(),
            ControlValue::None => String::new(),
            ControlValue::Bool(b) => b.to_string(),
            ControlValue::Int(i) => i.to_string(),
            ControlValue::Float(f) => f.to_string(),
        }
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        ControlValue::String(value.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(value: String) -> Self {
        ControlValue::String(value)
    }
}

impl From<i64> for ControlValue {
    fn from(value: i64) -> Self {
        ControlValue::Int(value)
    }
}

/// A control attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub name: String,
    pub kind: ControlKind,
    pub value: ControlValue,
    /// Not drawn and not interactive
    #[serde(default)]
    pub hidden: bool,
    /// Overrides the height the control occupies in the node layout
    #[serde(default)]
    pub fixed_height: Option<f32>,
    /// Whether the value is written into saved workflows and job payloads
    #[serde(default = "default_serialize")]
    pub serialize: bool,
}

fn default_serialize() -> bool {
    true
}

impl Control {
    pub fn new(name: impl Into<String>, kind: ControlKind, value: ControlValue) -> Self {
        let serialize = !matches!(kind, ControlKind::Button);
        Self {
            name: name.into(),
            kind,
            value,
            hidden: false,
            fixed_height: None,
            serialize,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Text, ControlValue::String(value.into()))
    }

    pub fn number(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, ControlKind::Number, ControlValue::Int(value))
    }

    /// Combo box with the first choice selected
    pub fn combo(name: impl Into<String>, values: Vec<String>) -> Self {
        let initial = values
            .first()
            .map(|v| ControlValue::String(v.clone()))
            .unwrap_or(ControlValue::None);
        Self::new(name, ControlKind::Combo { values }, initial)
    }

    pub fn button(name: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Button, ControlValue::None)
    }

    /// Hide the control and collapse it out of the layout while keeping it serialized
    pub fn conceal(&mut self) {
        self.hidden = true;
        self.fixed_height = Some(0.0);
        self.serialize = true;
    }

    /// Height this control takes in the node layout
    pub fn layout_height(&self) -> f32 {
        match self.fixed_height {
            Some(height) => height,
            None if self.hidden => 0.0,
            None => layout::CONTROL_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_selects_first_value() {
        let combo = Control::combo("pick", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(combo.value, ControlValue::String("a".to_string()));
    }

    #[test]
    fn test_conceal_collapses_height() {
        let mut text = Control::text("tags", "");
        assert_eq!(text.layout_height(), layout::CONTROL_HEIGHT);
        text.conceal();
        assert!(text.hidden);
        assert!(text.serialize);
        assert_eq!(text.layout_height(), 0.0);
    }

    #[test]
    fn test_buttons_are_not_serialized() {
        assert!(!Control::button("Add Output").serialize);
        assert!(Control::number("start", 0).serialize);
    }

    #[test]
    fn test_untagged_value_json() {
        let json = serde_json::to_string(&ControlValue::Int(3)).unwrap();
        assert_eq!(json, "3");
        let back: ControlValue = serde_json::from_str("\"prompt,seed\"").unwrap();
        assert_eq!(back.as_str(), Some("prompt,seed"));
    }
}
