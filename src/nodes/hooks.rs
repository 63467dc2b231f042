//! Node lifecycle hooks
//!
//! Every node type owns a [`LifecycleChain`]: an ordered list of hook
//! subscribers. The editor calls the chain at creation, after a saved node is
//! configured, on control interaction, while capturing job values and on
//! removal. Each subscriber runs in registration order; a failing subscriber
//! is logged and never stops the ones after it.
//!
//! The chain passes no value from one subscriber to the next. What a later
//! subscriber continues from is the [`HookContext`]: the graph, event loop and
//! bus as the earlier subscribers left them. The dispatcher folds every
//! subscriber's failure into the returned error list.

use log::{debug, warn};

use crate::config::EditorConfig;
use crate::editor::event_loop::EventLoop;
use crate::editor::submission::SubmissionBus;
use crate::error::{Result, TagSyncError};
use crate::nodes::controls::ControlValue;
use crate::nodes::{Node, NodeGraph, NodeId};

/// Editor state a hook may touch while it runs
pub struct HookContext<'a> {
    pub graph: &'a mut NodeGraph,
    pub events: &'a mut EventLoop,
    pub submissions: &'a mut SubmissionBus,
    pub config: &'a EditorConfig,
    /// Set while a saved workflow is being rebuilt; configure hooks follow
    pub restoring: bool,
}

/// Trait for node-type lifecycle hooks
pub trait NodeLifecycleHooks {
    /// Name used in log output
    fn name(&self) -> &'static str;

    /// Called right after a node of this type was added to the graph
    fn on_created(&mut self, _ctx: &mut HookContext<'_>, _node_id: NodeId) -> Result<()> {
        Ok(())
    }

    /// Called after a saved node had its ports and control values restored
    fn on_configure(&mut self, _ctx: &mut HookContext<'_>, _node_id: NodeId) -> Result<()> {
        Ok(())
    }

    /// Called when a button control was pressed
    fn on_control_action(&mut self, _ctx: &mut HookContext<'_>, _node_id: NodeId, _control: &str) -> Result<()> {
        Ok(())
    }

    /// Called after a control value was edited
    fn on_control_changed(&mut self, _ctx: &mut HookContext<'_>, _node_id: NodeId, _control: &str) -> Result<()> {
        Ok(())
    }

    /// Produce the value submitted for `control` in one job, `None` to use the stored value
    fn capture_value(&mut self, _node: &mut Node, _control: &str) -> Option<ControlValue> {
        None
    }

    /// Called before the node is dropped from the graph
    fn on_removed(&mut self, _ctx: &mut HookContext<'_>, _node_id: NodeId) -> Result<()> {
        Ok(())
    }
}

/// Ordered hook subscribers for one node type
#[derive(Default)]
pub struct LifecycleChain {
    handlers: Vec<Box<dyn NodeLifecycleHooks>>,
}

impl LifecycleChain {
    pub fn push(&mut self, hooks: Box<dyn NodeLifecycleHooks>) {
        self.handlers.push(hooks);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn created(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> Vec<TagSyncError> {
        self.dispatch("created", node_id, |hooks| hooks.on_created(ctx, node_id))
    }

    pub fn configured(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> Vec<TagSyncError> {
        self.dispatch("configure", node_id, |hooks| hooks.on_configure(ctx, node_id))
    }

    pub fn control_action(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId, control: &str) -> Vec<TagSyncError> {
        self.dispatch("control_action", node_id, |hooks| hooks.on_control_action(ctx, node_id, control))
    }

    pub fn control_changed(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId, control: &str) -> Vec<TagSyncError> {
        self.dispatch("control_changed", node_id, |hooks| hooks.on_control_changed(ctx, node_id, control))
    }

    pub fn removed(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> Vec<TagSyncError> {
        self.dispatch("removed", node_id, |hooks| hooks.on_removed(ctx, node_id))
    }

    /// First subscriber that captures the control wins
    pub fn capture_value(&mut self, node: &mut Node, control: &str) -> Option<ControlValue> {
        self.handlers
            .iter_mut()
            .find_map(|hooks| hooks.capture_value(node, control))
    }

    fn dispatch(
        &mut self,
        stage: &str,
        node_id: NodeId,
        mut call: impl FnMut(&mut dyn NodeLifecycleHooks) -> Result<()>,
    ) -> Vec<TagSyncError> {
        let mut errors = Vec::new();
        for hooks in self.handlers.iter_mut() {
            debug!("{} hook {} for node {}", stage, hooks.name(), node_id);
            if let Err(e) = call(hooks.as_mut()) {
                warn!("{} hook {} failed for node {}: {}", stage, hooks.name(), node_id, e);
                errors.push(e);
            }
        }
        errors
    }
}
