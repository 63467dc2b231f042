//! Deferred initialization of synchronizer nodes
//!
//! The editor builds a node's control list a frame after the creation hooks
//! ran, so the record control may not exist yet when a node is created or
//! configured. Initialization waits for the controls-ready signal, or polls a
//! bounded number of times when the signal is disabled.
//!
//! Every step re-reads the node from the graph: a node removed while a step is
//! pending turns that step into a no-op, and several queued steps all work
//! against the current outputs.

use log::{debug, warn};

use crate::constants::tag_sync::RECORD_CONTROL;
use crate::editor::event_loop::EventLoop;
use crate::editor::Editor;
use crate::error::TagSyncError;
use crate::nodes::host::NodeHost;
use crate::nodes::NodeId;

use super::catalog::TagCatalog;
use super::reconcile::{self, SyncReport};
use super::record;

/// Which lifecycle event started the initialization
///
/// Nodes rebuilt from a saved workflow only get the `Configure` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Node was just created
    Create,
    /// Node was restored from a saved workflow
    Configure,
}

/// Queue initialization of a newly created node for the next frame
pub fn schedule_initialize(events: &mut EventLoop, node_id: NodeId) {
    schedule(events, node_id, Stage::Create);
}

/// Queue reconciliation of a restored node for the next frame
pub fn schedule_refresh(events: &mut EventLoop, node_id: NodeId) {
    schedule(events, node_id, Stage::Configure);
}

fn schedule(events: &mut EventLoop, node_id: NodeId, stage: Stage) {
    events.request_animation_frame(Box::new(move |editor: &mut Editor| {
        attempt(editor, node_id, stage, 0);
    }));
}

fn has_record_control(editor: &Editor, node_id: NodeId) -> Option<bool> {
    editor.node(node_id).map(|node| record::locate(node).is_some())
}

/// One check for the record control
pub fn attempt(editor: &mut Editor, node_id: NodeId, stage: Stage, retries: u32) {
    let Some(present) = has_record_control(editor, node_id) else {
        debug!("Node {} is gone, dropping {:?} initialization", node_id, stage);
        return;
    };
    if present {
        initialize_ready(editor, node_id, stage);
        return;
    }

    if editor.config().use_ready_signal {
        editor.when_controls_ready(
            node_id,
            Box::new(move |editor: &mut Editor| {
                match has_record_control(editor, node_id) {
                    Some(true) => {
                        initialize_ready(editor, node_id, stage);
                    }
                    Some(false) => give_up(editor, node_id, stage, retries),
                    None => {}
                }
            }),
        );
        return;
    }

    let max_retries = editor.config().max_retries;
    if retries < max_retries {
        let delay = editor.config().retry_delay();
        editor.events_mut().set_timeout(
            delay,
            Box::new(move |editor: &mut Editor| attempt(editor, node_id, stage, retries + 1)),
        );
    } else {
        give_up(editor, node_id, stage, retries);
    }
}

/// Record control never showed up
fn give_up(editor: &mut Editor, node_id: NodeId, stage: Stage, attempts: u32) {
    match stage {
        Stage::Create => {
            debug!("Record control missing on node {}, creating it", node_id);
            if let Some(mut host) = editor.graph_mut().node_host(node_id) {
                record::locate_or_create(&mut host);
            }
            initialize_ready(editor, node_id, stage);
        }
        Stage::Configure => {
            let error = TagSyncError::ResourceNotReady {
                node_id,
                control: RECORD_CONTROL.to_string(),
                attempts,
            };
            warn!("{}; node left unsynchronized", error);
        }
    }
}

/// Record control exists: reconcile outputs against it
pub fn initialize_ready(editor: &mut Editor, node_id: NodeId, stage: Stage) -> Option<SyncReport> {
    let baseline = editor.config().baseline_tag.clone();
    let catalog = TagCatalog::builtin();
    let mut host = editor.graph_mut().node_host(node_id)?;
    record::locate_or_create(&mut host);

    let current = record::read(&host);
    let report = if !record::decode(&current).is_empty() {
        reconcile::synchronize_from_record(&mut host, catalog, &baseline)
    } else {
        match stage {
            Stage::Create => reconcile::clear_placeholders(&mut host, catalog, &baseline),
            // Saved without a record: adopt the saved outputs as they are
            Stage::Configure if !host.outputs().is_empty() && !reconcile::has_only_placeholders(&host) => {
                reconcile::update_record(&mut host);
                SyncReport::default()
            }
            Stage::Configure => reconcile::seed_fresh(&mut host, catalog, &baseline),
        }
    };
    debug!("Initialized node {} ({:?}): {:?}", node_id, stage, report);
    Some(report)
}
