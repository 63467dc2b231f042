//! Headless editor driver
//!
//! [`Editor`] plays the part of the host application: it owns the graph, the
//! node registry with every node type's lifecycle chain, the cooperative event
//! loop and the job submission bus. All mutation happens on the caller's
//! thread; deferred work runs when frames are pumped.

pub mod event_loop;
pub mod file_manager;
pub mod submission;

use egui::Pos2;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::error::{Result, TagSyncError};
use crate::nodes::controls::{ControlKind, ControlValue};
use crate::nodes::hooks::{HookContext, LifecycleChain};
use crate::nodes::{Node, NodeGraph, NodeId, NodeRegistry, PortId};

use event_loop::{EventLoop, Task};
use file_manager::{FileManager, SaveData};
use submission::SubmissionBus;

/// One node's entry in a submitted job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobNode {
    pub class_type: String,
    pub inputs: BTreeMap<String, ControlValue>,
    /// Input name -> (source node, source output slot)
    pub links: BTreeMap<String, (NodeId, PortId)>,
}

/// A single job handed to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub nodes: BTreeMap<NodeId, JobNode>,
}

pub struct Editor {
    graph: NodeGraph,
    registry: NodeRegistry,
    events: EventLoop,
    submissions: SubmissionBus,
    config: EditorConfig,
    files: FileManager,
    ready_waiters: HashMap<NodeId, Vec<Task>>,
    ready_nodes: HashSet<NodeId>,
    restoring: bool,
    notices: Vec<String>,
}

impl Editor {
    /// Editor with every built-in node type registered
    pub fn new(config: EditorConfig) -> Self {
        Self::with_registry(config, NodeRegistry::with_builtin_nodes())
    }

    pub fn with_registry(config: EditorConfig, registry: NodeRegistry) -> Self {
        Self {
            graph: NodeGraph::new(),
            registry,
            events: EventLoop::new(config.frame_interval_ms),
            submissions: SubmissionBus::new(),
            config,
            files: FileManager::new(),
            ready_waiters: HashMap::new(),
            ready_nodes: HashSet::new(),
            restoring: false,
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.graph.nodes.get(&node_id)
    }

    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    pub fn events(&self) -> &EventLoop {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLoop {
        &mut self.events
    }

    pub fn submissions(&self) -> &SubmissionBus {
        &self.submissions
    }

    pub fn files(&self) -> &FileManager {
        &self.files
    }

    /// Messages shown to the user (duplicate / missing output and the like)
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    // ----------------- Node lifecycle -----------------

    /// Create a node of a registered type and run its creation hooks
    pub fn add_node(&mut self, node_type: &str, position: Pos2) -> Result<NodeId> {
        let node = self
            .registry
            .create_node(node_type, position)
            .ok_or_else(|| TagSyncError::UnknownNodeType(node_type.to_string()))?;
        let node_id = self.graph.add_node(node);
        self.install(node_id);
        self.files.mark_modified();
        info!("Created {} node {}", node_type, node_id);
        Ok(node_id)
    }

    /// Creation hooks now, schema controls on the next frame
    fn install(&mut self, node_id: NodeId) {
        let Some(node_type) = self.node(node_id).map(|node| node.node_type.clone()) else {
            return;
        };
        let errors = self
            .with_chain(&node_type, |chain, ctx| chain.created(ctx, node_id))
            .unwrap_or_default();
        self.report(errors);

        self.events.request_animation_frame(Box::new(move |editor: &mut Editor| {
            editor.build_schema_controls(node_id);
        }));
    }

    fn build_schema_controls(&mut self, node_id: NodeId) {
        let Some(node_type) = self.node(node_id).map(|node| node.node_type.clone()) else {
            debug!("Node {} removed before its controls were built", node_id);
            return;
        };
        if let (Some(metadata), Some(node)) = (
            self.registry.get_node_metadata(&node_type),
            self.graph.nodes.get_mut(&node_id),
        ) {
            for control in metadata.controls {
                if node.find_control(&control.name).is_none() {
                    node.add_control(control);
                }
            }
            let size = node.compute_size();
            if node.size.y < size.y {
                node.set_size(size);
            }
        }
        self.notify_controls_ready(node_id);
    }

    /// Whether the node's schema controls have been built
    pub fn controls_ready(&self, node_id: NodeId) -> bool {
        self.ready_nodes.contains(&node_id)
    }

    /// Run `task` once the node's schema controls exist; runs it right away if they already do
    pub fn when_controls_ready(&mut self, node_id: NodeId, task: Task) {
        if self.controls_ready(node_id) {
            task(self);
            return;
        }
        self.ready_waiters.entry(node_id).or_default().push(task);
    }

    /// Resolve every waiter registered for `node_id`
    pub fn notify_controls_ready(&mut self, node_id: NodeId) {
        self.ready_nodes.insert(node_id);
        if let Some(waiters) = self.ready_waiters.remove(&node_id) {
            debug!("Controls ready for node {} ({} waiters)", node_id, waiters.len());
            for task in waiters {
                task(self);
            }
        }
    }

    /// Remove a node, its links, its submission listeners and pending waiters
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node> {
        let node_type = self
            .node(node_id)
            .map(|node| node.node_type.clone())
            .ok_or(TagSyncError::NodeNotFound(node_id))?;

        let errors = self
            .with_chain(&node_type, |chain, ctx| chain.removed(ctx, node_id))
            .unwrap_or_default();
        self.report(errors);

        let dropped = self.submissions.unsubscribe_owner(node_id);
        if dropped > 0 {
            debug!("Dropped {} submission listeners of node {}", dropped, node_id);
        }
        self.ready_waiters.remove(&node_id);
        self.ready_nodes.remove(&node_id);
        self.files.mark_modified();

        self.graph
            .remove_node(node_id)
            .ok_or(TagSyncError::NodeNotFound(node_id))
    }

    // ----------------- Control interaction -----------------

    pub fn press_button(&mut self, node_id: NodeId, control: &str) -> Result<()> {
        let node = self.node(node_id).ok_or(TagSyncError::NodeNotFound(node_id))?;
        let is_button = node
            .control(control)
            .is_some_and(|c| matches!(c.kind, ControlKind::Button));
        if !is_button {
            warn!("Node {} has no button named '{}'", node_id, control);
            return Ok(());
        }
        let node_type = node.node_type.clone();

        let errors = self
            .with_chain(&node_type, |chain, ctx| chain.control_action(ctx, node_id, control))
            .unwrap_or_default();
        self.report(errors);
        self.files.mark_modified();
        Ok(())
    }

    pub fn set_control_value(&mut self, node_id: NodeId, control: &str, value: ControlValue) -> Result<()> {
        let node = self
            .graph
            .nodes
            .get_mut(&node_id)
            .ok_or(TagSyncError::NodeNotFound(node_id))?;
        let Some(target) = node.control_mut(control) else {
            warn!("Node {} has no control named '{}'", node_id, control);
            return Ok(());
        };
        target.value = value;
        node.dirty = true;
        let node_type = node.node_type.clone();

        let errors = self
            .with_chain(&node_type, |chain, ctx| chain.control_changed(ctx, node_id, control))
            .unwrap_or_default();
        self.report(errors);
        self.files.mark_modified();
        Ok(())
    }

    // ----------------- Workflows -----------------

    /// Replace the current graph with a saved one
    ///
    /// Each node is created fresh (creation hooks run in restoring mode), then gets its saved
    /// outputs, control values and geometry back, then links are restored and
    /// finally the configure hooks run.
    pub fn load_workflow(&mut self, save: &SaveData) -> Result<()> {
        for node_id in self.graph.sorted_ids() {
            self.remove_node(node_id)?;
        }
        self.graph = NodeGraph::new();

        let saved_graph = &save.root_graph;
        let mut restored = Vec::new();
        self.restoring = true;
        for node_id in saved_graph.sorted_ids() {
            let saved = &saved_graph.nodes[&node_id];
            let Some(node) = self.registry.create_node(&saved.node_type, saved.position) else {
                warn!("Skipping node {} of unknown type {}", node_id, saved.node_type);
                continue;
            };
            self.graph.add_node_with_id(node_id, node);
            self.install(node_id);
            self.restore_node(saved);
            restored.push(node_id);
        }
        self.restoring = false;

        for conn in &saved_graph.connections {
            if let Err(e) = self.graph.add_connection(conn.clone()) {
                warn!("Dropping saved link {:?}: {}", conn, e);
            }
        }

        for node_id in restored {
            let Some(node_type) = self.node(node_id).map(|node| node.node_type.clone()) else {
                continue;
            };
            let errors = self
                .with_chain(&node_type, |chain, ctx| chain.configured(ctx, node_id))
                .unwrap_or_default();
            self.report(errors);
        }
        Ok(())
    }

    fn restore_node(&mut self, saved: &Node) {
        let Some(node) = self.graph.nodes.get_mut(&saved.id) else {
            return;
        };
        node.title = saved.title.clone();
        node.position = saved.position;
        node.outputs = saved.outputs.clone();
        for saved_control in saved.controls.iter().filter(|c| c.serialize) {
            match node.control_mut(&saved_control.name) {
                Some(control) => control.value = saved_control.value.clone(),
                None => {
                    node.add_control(saved_control.clone());
                }
            }
        }
        node.set_size(saved.size);
    }

    pub fn open(&mut self, path: &Path) -> Result<()> {
        let save = self.files.load_from_file(path)?;
        self.load_workflow(&save)
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.files.save_to_file(path, &self.graph, None)
    }

    // ----------------- Job submission -----------------

    /// Queue `batch_count` jobs, then fire one submission event
    pub fn queue_prompt(&mut self, batch_count: usize) -> Vec<Job> {
        let jobs: Vec<Job> = (0..batch_count).map(|_| self.graph_to_job()).collect();
        self.submissions.emit();
        info!("Queued {} job(s)", jobs.len());
        jobs
    }

    fn graph_to_job(&mut self) -> Job {
        let Editor { graph, registry, .. } = self;
        let mut nodes = BTreeMap::new();

        for node_id in graph.sorted_ids() {
            let mut links = BTreeMap::new();
            for conn in graph.connections.iter().filter(|c| c.to_node == node_id) {
                if let Some(input) = graph.nodes[&node_id].inputs.get(conn.to_port) {
                    links.insert(input.name.clone(), (conn.from_node, conn.from_port));
                }
            }

            let Some(node) = graph.nodes.get_mut(&node_id) else {
                continue;
            };
            let schema: Vec<String> = registry
                .get_node_metadata(&node.node_type)
                .map(|meta| meta.controls.into_iter().map(|c| c.name).collect())
                .unwrap_or_default();

            let mut inputs = BTreeMap::new();
            let mut chain = registry.chain_mut(&node.node_type);
            for name in schema {
                let captured = chain
                    .as_deref_mut()
                    .and_then(|chain| chain.capture_value(node, &name));
                let value = captured.or_else(|| node.control(&name).map(|c| c.value.clone()));
                if let Some(value) = value {
                    inputs.insert(name, value);
                }
            }

            nodes.insert(
                node_id,
                JobNode {
                    class_type: node.node_type.clone(),
                    inputs,
                    links,
                },
            );
        }

        Job {
            id: Uuid::new_v4(),
            nodes,
        }
    }

    // ----------------- Frames -----------------

    /// Run one frame: queued frame tasks first, then every timer now due
    pub fn run_frame(&mut self) {
        for task in self.events.begin_frame() {
            task(self);
        }
        while let Some(task) = self.events.pop_due_timer() {
            task(self);
        }
    }

    /// Run frames until at least `duration` of editor time has passed
    pub fn advance(&mut self, duration: Duration) {
        let target = self.events.now() + duration;
        while self.events.now() < target {
            self.run_frame();
        }
    }

    /// Pump frames until no work is pending; returns the number of frames run
    pub fn run_until_idle(&mut self) -> u32 {
        let mut frames = 0;
        while !self.events.is_idle() {
            if frames >= self.config.max_idle_frames {
                warn!("Event loop still busy after {} frames", frames);
                break;
            }
            self.run_frame();
            frames += 1;
        }
        frames
    }

    // ----------------- Internals -----------------

    fn with_chain<R>(
        &mut self,
        node_type: &str,
        f: impl FnOnce(&mut LifecycleChain, &mut HookContext<'_>) -> R,
    ) -> Option<R> {
        let Editor {
            graph,
            registry,
            events,
            submissions,
            config,
            restoring,
            ..
        } = self;
        let chain = registry.chain_mut(node_type)?;
        let mut ctx = HookContext {
            graph,
            events,
            submissions,
            config,
            restoring: *restoring,
        };
        Some(f(chain, &mut ctx))
    }

    /// User-facing failures become notices, the rest is only logged
    fn report(&mut self, errors: Vec<TagSyncError>) {
        for error in errors {
            if error.is_user_facing() {
                info!("Notice: {}", error);
                self.notices.push(error.to_string());
            } else {
                warn!("{}", error);
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
