//! Output reconciliation
//!
//! Keeps a node's live outputs and its persisted record in agreement. Every
//! public function leaves `record == project(outputs)` behind it.
//!
//! Existing outputs are never reordered: other nodes link to outputs by slot,
//! so reconciliation only removes outputs that should not be there and appends
//! the missing ones at the end.

use log::{debug, info};
use std::collections::HashSet;

use crate::error::{Result, TagSyncError};
use crate::nodes::host::NodeHost;

use super::catalog::TagCatalog;
use super::record;

/// Port changes made by one synchronization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Recompute the record from the outputs
pub fn update_record(node: &mut dyn NodeHost) {
    let projected = record::project(node);
    record::write(node, &projected);
}

/// Append the output for `tag`, rejecting duplicates; returns the new slot
pub fn add_tag(node: &mut dyn NodeHost, catalog: &TagCatalog, tag: &str) -> Result<usize> {
    let data_type = catalog.type_of(tag);
    let name = record::display_name(tag, data_type);
    if node.find_output_slot(&name).is_some() {
        return Err(TagSyncError::DuplicateOutput(name));
    }

    node.add_output(&name, data_type);
    update_record(node);

    let size = node.compute_size();
    if node.size().y < size.y {
        node.set_size(size);
    }
    node.set_dirty();
    info!("Added output {}", name);
    Ok(node.outputs().len() - 1)
}

/// Remove the output for `tag`
pub fn remove_tag(node: &mut dyn NodeHost, catalog: &TagCatalog, tag: &str) -> Result<()> {
    let name = record::display_name_for(catalog, tag);
    let index = node
        .find_output_slot(&name)
        .ok_or_else(|| TagSyncError::OutputNotFound(name.clone()))?;
    remove_at(node, index);
    info!("Removed output {}", name);
    Ok(())
}

/// Remove the last output, whatever its tag; returns its display name
pub fn remove_last_tag(node: &mut dyn NodeHost) -> Result<String> {
    let last = node
        .outputs()
        .last()
        .map(|port| port.name.clone())
        .ok_or_else(|| TagSyncError::OutputNotFound("last output".to_string()))?;
    let index = node.outputs().len() - 1;
    remove_at(node, index);
    info!("Removed output {}", last);
    Ok(last)
}

fn remove_at(node: &mut dyn NodeHost, index: usize) {
    node.remove_output(index);
    update_record(node);
    let size = node.compute_size();
    node.set_size(size);
    node.set_dirty();
}

/// Whether every output is a host default (and there is at least one)
pub fn has_only_placeholders(node: &dyn NodeHost) -> bool {
    let outputs = node.outputs();
    !outputs.is_empty() && outputs.iter().all(|port| record::is_placeholder_output(&port.name))
}

/// Drop every output, seed `baseline`, and store the matching record
pub fn seed_fresh(node: &mut dyn NodeHost, catalog: &TagCatalog, baseline: &str) -> SyncReport {
    let mut report = SyncReport::default();
    for index in (0..node.outputs().len()).rev() {
        report.removed.push(node.outputs()[index].name.clone());
        node.remove_output(index);
    }
    let data_type = catalog.type_of(baseline);
    let name = record::display_name(baseline, data_type);
    node.add_output(&name, data_type);
    report.added.push(name);

    update_record(node);
    let size = node.compute_size();
    node.set_size(size);
    node.set_dirty();
    report
}

/// Drop the host placeholders, keeping typed outputs added before initialization
///
/// Seeds `baseline` when nothing is left.
pub fn clear_placeholders(node: &mut dyn NodeHost, catalog: &TagCatalog, baseline: &str) -> SyncReport {
    let mut report = SyncReport::default();
    for index in (0..node.outputs().len()).rev() {
        let name = &node.outputs()[index].name;
        if record::is_placeholder_output(name) {
            report.removed.push(name.clone());
            node.remove_output(index);
        }
    }
    if node.outputs().is_empty() {
        let data_type = catalog.type_of(baseline);
        let name = record::display_name(baseline, data_type);
        node.add_output(&name, data_type);
        report.added.push(name);
    }

    update_record(node);
    let size = node.compute_size();
    node.set_size(size);
    node.set_dirty();
    report
}

/// Make the outputs match the record
///
/// Outputs that are all host placeholders are cleared first; if the record is
/// empty as well the node is seeded with `baseline`. Outputs already named in
/// the record keep their slot order, missing ones are appended in record order.
pub fn synchronize_from_record(node: &mut dyn NodeHost, catalog: &TagCatalog, baseline: &str) -> SyncReport {
    let current = record::read(node);

    if has_only_placeholders(node) {
        debug!("Outputs are host placeholders, treating node as fresh");
        if record::decode(&current).is_empty() {
            return seed_fresh(node, catalog, baseline);
        }
    }

    let desired: Vec<String> = record::decode(&current)
        .into_iter()
        .map(|tag| record::display_name_for(catalog, tag))
        .collect();
    let wanted: HashSet<&str> = desired.iter().map(String::as_str).collect();

    let mut report = SyncReport::default();

    // Reverse order keeps the remaining indices valid while removing
    for index in (0..node.outputs().len()).rev() {
        let name = &node.outputs()[index].name;
        if !wanted.contains(name.as_str()) {
            report.removed.push(name.clone());
            node.remove_output(index);
        }
    }

    for (name, tag) in desired.iter().zip(record::decode(&current)) {
        if node.find_output_slot(name).is_none() {
            node.add_output(name, catalog.type_of(tag));
            report.added.push(name.clone());
        }
    }

    update_record(node);
    let size = node.compute_size();
    node.set_size(size);
    node.set_dirty();

    if !report.is_noop() {
        debug!("Synchronized outputs: -{:?} +{:?}", report.removed, report.added);
    }
    report
}
