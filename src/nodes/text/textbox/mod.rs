//! Text-source nodes with submission-scoped counters
//!
//! Both node types pick lines out of a text box. Which line is chosen depends
//! on counters that are evaluated while a job is captured and reset whenever
//! jobs are submitted.

pub mod counter;

pub use counter::{ContinuedCounter, SimpleCounter};

use egui::Color32;
use log::debug;
use std::collections::HashMap;

use crate::constants::textbox::{
    COUNT_CONTROL, INDEX_CONTROL, MODE_CONTINUED, MODE_CONTROL, MODE_FIXED, PROMPTS_NODE_TYPE, START_CONTROL,
    STRINGS_NODE_TYPE, TEXT_CONTROL,
};
use crate::error::Result;
use crate::nodes::controls::{Control, ControlValue};
use crate::nodes::hooks::{HookContext, NodeLifecycleHooks};
use crate::nodes::{DataType, Node, NodeCategory, NodeFactory, NodeId, NodeMetadata, PortDefinition};

/// Strings From Textbox
#[derive(Default)]
pub struct StringsFromTextboxNodeFactory;

impl NodeFactory for StringsFromTextboxNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            STRINGS_NODE_TYPE,
            "Strings From Textbox",
            NodeCategory::text(),
            "Emits consecutive lines of a text box, advancing once per queued job",
        )
        .with_color(Color32::from_rgb(50, 65, 55))
        .with_outputs(vec![PortDefinition::required("strings", DataType::String)])
        .with_controls(vec![
            Control::text(TEXT_CONTROL, ""),
            Control::number(START_CONTROL, 0),
            Control::number(COUNT_CONTROL, 0),
        ])
        .with_tags(vec!["text", "lines", "batch"])
    }

    fn hooks() -> Vec<Box<dyn NodeLifecycleHooks>> {
        vec![Box::new(TextboxHooks::new(TextboxKind::Strings))]
    }
}

/// Prompts From Textbox
#[derive(Default)]
pub struct PromptsFromTextboxNodeFactory;

impl NodeFactory for PromptsFromTextboxNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            PROMPTS_NODE_TYPE,
            "Prompts From Textbox",
            NodeCategory::text(),
            "Emits prompts from a text box; Continued mode keeps advancing across submissions",
        )
        .with_color(Color32::from_rgb(50, 65, 55))
        .with_outputs(vec![PortDefinition::required("prompt", DataType::String)])
        .with_controls(vec![
            Control::text(TEXT_CONTROL, ""),
            Control::number(START_CONTROL, 0),
            Control::number(INDEX_CONTROL, 0),
            Control::combo(MODE_CONTROL, vec![MODE_FIXED.to_string(), MODE_CONTINUED.to_string()]),
        ])
        .with_tags(vec!["text", "prompt", "batch"])
    }

    fn hooks() -> Vec<Box<dyn NodeLifecycleHooks>> {
        vec![Box::new(TextboxHooks::new(TextboxKind::Prompts))]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextboxKind {
    /// `count` = start + counter
    Strings,
    /// `index` = counter, `start` accumulates in Continued mode
    Prompts,
}

#[derive(Debug, Default)]
struct CounterState {
    counter: SimpleCounter,
    continued: ContinuedCounter,
}

/// Counter state for every node of one text-source type
pub struct TextboxHooks {
    kind: TextboxKind,
    states: HashMap<NodeId, CounterState>,
}

impl TextboxHooks {
    pub fn new(kind: TextboxKind) -> Self {
        Self {
            kind,
            states: HashMap::new(),
        }
    }

    fn int_value(node: &Node, control: &str) -> i64 {
        node.control(control)
            .and_then(|c| c.value.as_int())
            .unwrap_or(0)
    }

    fn store(node: &mut Node, control: &str, value: i64) {
        if let Some(target) = node.control_mut(control) {
            target.value = ControlValue::Int(value);
        }
    }

    fn is_continued(node: &Node) -> bool {
        node.control(MODE_CONTROL)
            .and_then(|c| c.value.as_str())
            .is_some_and(|mode| mode == MODE_CONTINUED)
    }
}

impl NodeLifecycleHooks for TextboxHooks {
    fn name(&self) -> &'static str {
        match self.kind {
            TextboxKind::Strings => "strings_counter",
            TextboxKind::Prompts => "prompts_counter",
        }
    }

    fn on_created(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> Result<()> {
        let state = self.states.entry(node_id).or_default();
        state.counter.subscribe(ctx.submissions, node_id);
        Ok(())
    }

    fn on_control_changed(&mut self, _ctx: &mut HookContext<'_>, node_id: NodeId, control: &str) -> Result<()> {
        if self.kind == TextboxKind::Prompts && control == MODE_CONTROL {
            if let Some(state) = self.states.get_mut(&node_id) {
                debug!("Mode changed on node {}, restarting accumulation", node_id);
                state.continued.reset();
            }
        }
        Ok(())
    }

    fn capture_value(&mut self, node: &mut Node, control: &str) -> Option<ControlValue> {
        let state = self.states.entry(node.id).or_default();
        match (self.kind, control) {
            (TextboxKind::Strings, COUNT_CONTROL) => {
                let counter = state.counter.next();
                Self::store(node, COUNT_CONTROL, i64::from(counter));
                let start = Self::int_value(node, START_CONTROL);
                Some(ControlValue::Int(start.saturating_add(i64::from(counter))))
            }
            (TextboxKind::Prompts, INDEX_CONTROL) => {
                let counter = state.counter.next();
                Self::store(node, INDEX_CONTROL, i64::from(counter));
                Some(ControlValue::Int(i64::from(counter)))
            }
            (TextboxKind::Prompts, START_CONTROL) if Self::is_continued(node) => {
                let start = state.continued.next(Self::int_value(node, START_CONTROL));
                Self::store(node, START_CONTROL, start);
                Some(ControlValue::Int(start))
            }
            _ => None,
        }
    }

    fn on_removed(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> Result<()> {
        if let Some(mut state) = self.states.remove(&node_id) {
            state.counter.unsubscribe(ctx.submissions);
        }
        Ok(())
    }
}
