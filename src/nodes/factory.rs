//! Node factory system with self-registration and metadata

use egui::{Color32, Pos2, Vec2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::nodes::controls::Control;
use crate::nodes::hooks::{LifecycleChain, NodeLifecycleHooks};
use crate::nodes::Node;

/// Data types that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    String,
    Int,
    Float,
    Boolean,
}

impl DataType {
    pub const ALL: [DataType; 4] = [DataType::String, DataType::Int, DataType::Float, DataType::Boolean];

    /// Wire name used in display names and schemas
    pub fn name(&self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Boolean => "BOOLEAN",
        }
    }

    /// Parse a wire name; exact match only
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|data_type| data_type.name() == name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hierarchical category system for organizing nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeCategory {
    path: Vec<String>,
}

impl NodeCategory {
    /// Create a new category from path components
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn text() -> Self { Self::new(&["Text"]) }
}

/// Port definition for node creation
#[derive(Debug, Clone)]
pub struct PortDefinition {
    pub name: String,
    pub data_type: DataType,
    pub description: Option<String>,
}

impl PortDefinition {
    /// Create a port
    pub fn required(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Node schema: identity, default ports and declared controls
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub node_type: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: NodeCategory,
    pub color: Color32,
    pub size_hint: Vec2,
    pub tags: Vec<&'static str>,
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
    /// Controls the host builds for every instance, after creation
    pub controls: Vec<Control>,
}

impl NodeMetadata {
    /// Create node metadata with sensible defaults
    pub fn new(
        node_type: &'static str,
        display_name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> Self {
        Self {
            node_type,
            display_name,
            description,
            category,
            color: Color32::from_rgb(100, 100, 100),
            size_hint: Vec2::new(150.0, 80.0),
            tags: vec![],
            inputs: vec![],
            outputs: vec![],
            controls: vec![],
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<PortDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<PortDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_tags(mut self, tags: Vec<&'static str>) -> Self {
        self.tags = tags;
        self
    }
}

/// Node factory trait with metadata and lifecycle hooks
pub trait NodeFactory {
    /// Get comprehensive node metadata
    fn metadata() -> NodeMetadata where Self: Sized;

    /// Hooks installed for this node type when it is registered
    fn hooks() -> Vec<Box<dyn NodeLifecycleHooks>> where Self: Sized {
        Vec::new()
    }

    /// Create a node instance at the given position, with the schema's default ports
    fn create(position: Pos2) -> Node where Self: Sized {
        let meta = Self::metadata();
        let mut node = Node::new(0, meta.node_type, position).with_title(meta.display_name);

        for input in &meta.inputs {
            node.add_input(&input.name, input.data_type);
        }
        for output in &meta.outputs {
            node.add_output(&output.name, output.data_type);
        }

        let size = node.compute_size().max(meta.size_hint);
        node.set_size(size);
        node
    }
}

/// Function pointer type for creating nodes
type NodeCreator = fn(Pos2) -> Node;
type MetadataProvider = fn() -> NodeMetadata;

/// Registry for managing node factories and their lifecycle chains
#[derive(Default)]
pub struct NodeRegistry {
    creators: BTreeMap<String, NodeCreator>,
    metadata_providers: BTreeMap<String, MetadataProvider>,
    categories: HashMap<NodeCategory, Vec<String>>,
    chains: HashMap<String, LifecycleChain>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in node type
    pub fn with_builtin_nodes() -> Self {
        let mut registry = Self::new();
        crate::nodes::text::register_all(&mut registry);
        registry
    }

    /// Register a node factory along with the hooks it ships
    pub fn register<T: NodeFactory + 'static>(&mut self) {
        let metadata = T::metadata();
        let node_type = metadata.node_type.to_string();

        self.creators.insert(node_type.clone(), T::create);
        self.metadata_providers.insert(node_type.clone(), T::metadata);

        self.categories
            .entry(metadata.category.clone())
            .or_default()
            .push(node_type.clone());

        let chain = self.chains.entry(node_type.clone()).or_default();
        for hooks in T::hooks() {
            chain.push(hooks);
        }
        debug!("Registered node type {} ({} hooks)", node_type, chain.len());
    }

    /// Append another subscriber to a node type's lifecycle chain
    pub fn add_hooks(&mut self, node_type: &str, hooks: Box<dyn NodeLifecycleHooks>) {
        if !self.creators.contains_key(node_type) {
            warn!("Adding hooks for unregistered node type {}", node_type);
        }
        self.chains.entry(node_type.to_string()).or_default().push(hooks);
    }

    /// Create a node by type name
    pub fn create_node(&self, node_type: &str, position: Pos2) -> Option<Node> {
        match self.creators.get(node_type) {
            Some(creator) => Some(creator(position)),
            None => {
                warn!("No factory found for node type: {}", node_type);
                None
            }
        }
    }

    /// Get metadata for a node type without creating the node
    pub fn get_node_metadata(&self, node_type: &str) -> Option<NodeMetadata> {
        self.metadata_providers.get(node_type).map(|provider| provider())
    }

    pub fn chain_mut(&mut self, node_type: &str) -> Option<&mut LifecycleChain> {
        self.chains.get_mut(node_type)
    }

    pub fn is_registered(&self, node_type: &str) -> bool {
        self.creators.contains_key(node_type)
    }

    pub fn nodes_in_category(&self, category: &NodeCategory) -> &[String] {
        self.categories.get(category).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_wire_names() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::from_name(data_type.name()), Some(data_type));
        }
        assert_eq!(DataType::from_name("int"), None);
        assert_eq!(serde_json::to_string(&DataType::Boolean).unwrap(), "\"BOOLEAN\"");
    }

    #[test]
    fn test_builtin_registry() {
        let registry = NodeRegistry::with_builtin_nodes();
        assert!(registry.is_registered("ParsePromptCustom"));
        assert!(registry.is_registered("StringsFromTextbox"));
        assert!(registry.is_registered("PromptsFromTextbox"));
        assert_eq!(registry.nodes_in_category(&NodeCategory::text()).len(), 3);
        assert!(registry.create_node("Missing", Pos2::ZERO).is_none());
    }
}
