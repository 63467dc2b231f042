//! Tag output synchronizer node
//!
//! A prompt parser whose outputs are chosen by the user from a fixed tag
//! catalog. The chosen outputs survive save and reload through a hidden record
//! control:
//! - catalog.rs: tag name -> value type
//! - record.rs: display names, record codec and the hidden record control
//! - reconcile.rs: add / remove / synchronize outputs against the record
//! - bootstrap.rs: deferred initialization after creation and configure

pub mod bootstrap;
pub mod catalog;
pub mod reconcile;
pub mod record;

pub use catalog::TagCatalog;
pub use reconcile::SyncReport;

use egui::Color32;
use log::debug;

use crate::constants::tag_sync::{
    ADD_BUTTON, NODE_TYPE, RECORD_CONTROL, REMOVE_BUTTON, REMOVE_LAST_BUTTON, SELECTOR_CONTROL,
};
use crate::error::{Result, TagSyncError};
use crate::nodes::controls::Control;
use crate::nodes::hooks::{HookContext, NodeLifecycleHooks};
use crate::nodes::{DataType, NodeCategory, NodeFactory, NodeId, NodeMetadata, PortDefinition};

/// Parse Prompt (Custom)
#[derive(Default)]
pub struct ParsePromptCustomNodeFactory;

impl NodeFactory for ParsePromptCustomNodeFactory {
    fn metadata() -> NodeMetadata {
        // The schema lists every catalog tag as a plain-named output; the
        // hooks replace them with the user's selection
        let outputs = TagCatalog::builtin()
            .iter()
            .map(|(tag, data_type)| PortDefinition::required(tag, data_type))
            .collect();

        NodeMetadata::new(
            NODE_TYPE,
            "Parse Prompt (Custom)",
            NodeCategory::text(),
            "Parses a prompt and exposes the selected tags as typed outputs",
        )
        .with_color(Color32::from_rgb(60, 50, 70))
        .with_inputs(vec![
            PortDefinition::required("text", DataType::String).with_description("Prompt text to parse"),
        ])
        .with_outputs(outputs)
        .with_controls(vec![Control::text(RECORD_CONTROL, "")])
        .with_tags(vec!["prompt", "parse", "tags"])
    }

    fn hooks() -> Vec<Box<dyn NodeLifecycleHooks>> {
        vec![Box::new(TagSyncHooks)]
    }
}

/// Selector, action buttons and output synchronization for the parser node
pub struct TagSyncHooks;

impl TagSyncHooks {
    fn selected_tag(ctx: &HookContext<'_>, node_id: NodeId) -> Option<String> {
        ctx.graph
            .nodes
            .get(&node_id)?
            .control(SELECTOR_CONTROL)?
            .value
            .as_str()
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
    }
}

impl NodeLifecycleHooks for TagSyncHooks {
    fn name(&self) -> &'static str {
        "tag_sync"
    }

    fn on_created(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> Result<()> {
        let node = ctx
            .graph
            .nodes
            .get_mut(&node_id)
            .ok_or(TagSyncError::NodeNotFound(node_id))?;
        node.serialize_controls = true;

        let tags = TagCatalog::builtin().names().map(str::to_string).collect();
        node.add_control(Control::combo(SELECTOR_CONTROL, tags));
        node.add_control(Control::button(ADD_BUTTON));
        node.add_control(Control::button(REMOVE_BUTTON));
        node.add_control(Control::button(REMOVE_LAST_BUTTON));

        if ctx.restoring {
            debug!("Node {} is being restored, waiting for configure", node_id);
        } else {
            bootstrap::schedule_initialize(ctx.events, node_id);
        }
        Ok(())
    }

    fn on_configure(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> Result<()> {
        bootstrap::schedule_refresh(ctx.events, node_id);
        Ok(())
    }

    fn on_control_action(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId, control: &str) -> Result<()> {
        let catalog = TagCatalog::builtin();
        let selected = Self::selected_tag(ctx, node_id);
        let mut host = ctx
            .graph
            .node_host(node_id)
            .ok_or(TagSyncError::NodeNotFound(node_id))?;

        match (control, selected) {
            (ADD_BUTTON, Some(tag)) => reconcile::add_tag(&mut host, catalog, &tag).map(|_| ()),
            (REMOVE_BUTTON, Some(tag)) => reconcile::remove_tag(&mut host, catalog, &tag),
            (REMOVE_LAST_BUTTON, _) => reconcile::remove_last_tag(&mut host).map(|_| ()),
            (ADD_BUTTON | REMOVE_BUTTON, None) => {
                debug!("No tag selected on node {}", node_id);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
