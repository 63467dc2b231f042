//! Persisted output record and its hidden control
//!
//! Output display names look like `seed (INT)`. The record is the comma-joined
//! list of tag names (`prompt,seed`), in output order, kept in a hidden but
//! serialized text control so it survives save and reload.

use log::debug;

use crate::constants::tag_sync::RECORD_CONTROL;
use crate::nodes::controls::{Control, ControlId, ControlKind, ControlValue};
use crate::nodes::host::NodeHost;
use crate::nodes::DataType;

use super::catalog::TagCatalog;

/// `"<tag> (<TYPE>)"`
pub fn display_name(tag: &str, data_type: DataType) -> String {
    format!("{} ({})", tag, data_type.name())
}

/// Display name of `tag` using its catalog type
pub fn display_name_for(catalog: &TagCatalog, tag: &str) -> String {
    display_name(tag, catalog.type_of(tag))
}

/// Tag part of a display name: everything before the last `" (...)"` group
pub fn tag_name_of(display: &str) -> &str {
    display
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once(" ("))
        .map(|(tag, _)| tag)
        .unwrap_or(display)
}

/// Split a display name into tag and a known value type
pub fn parse_display_name(display: &str) -> Option<(&str, DataType)> {
    let (tag, type_name) = display.strip_suffix(')')?.rsplit_once(" (")?;
    DataType::from_name(type_name).map(|data_type| (tag, data_type))
}

/// Whether an output looks like a host-generated default rather than a tag output
///
/// This is a heuristic, not a host guarantee: the editor creates a node's schema
/// outputs with bare names (`prompt`), while every output this module creates
/// carries a `" (<TYPE>)"` suffix. It is the only thing that tells a brand-new
/// node's defaults apart from outputs restored from a saved graph.
pub fn is_placeholder_output(display: &str) -> bool {
    parse_display_name(display).is_none()
}

/// Comma-join tag names
pub fn encode<'a>(tags: impl IntoIterator<Item = &'a str>) -> String {
    tags.into_iter().collect::<Vec<_>>().join(",")
}

/// Split a record into tag names, trimming whitespace and skipping empty entries
pub fn decode(record: &str) -> Vec<&str> {
    record
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Record derived from the live output list
pub fn project(node: &dyn NodeHost) -> String {
    encode(node.outputs().iter().map(|port| tag_name_of(&port.name)))
}

/// Locate the hidden record control on a node
pub fn locate(node: &dyn NodeHost) -> Option<ControlId> {
    node.find_control(RECORD_CONTROL)
}

/// Locate the record control, creating it when missing, and make sure it is hidden
pub fn locate_or_create(node: &mut dyn NodeHost) -> ControlId {
    let id = match locate(node) {
        Some(id) => id,
        None => {
            debug!("Creating missing '{}' control", RECORD_CONTROL);
            node.add_control(Control::text(RECORD_CONTROL, ""))
        }
    };
    if let Some(control) = node.control_mut(id) {
        control.kind = ControlKind::Text;
        control.conceal();
    }
    id
}

/// Current record, empty when the control does not exist
pub fn read(node: &dyn NodeHost) -> String {
    locate(node)
        .and_then(|id| node.controls().get(id))
        .map(|control| control.value.to_text())
        .unwrap_or_default()
}

/// Store a record; a node without the control is left untouched
pub fn write(node: &mut dyn NodeHost, record: &str) -> bool {
    let Some(id) = locate(node) else {
        debug!("No '{}' control to write record to", RECORD_CONTROL);
        return false;
    };
    match node.control_mut(id) {
        Some(control) => {
            control.value = ControlValue::String(record.to_string());
            true
        }
        None => false,
    }
}
