//! Node system - Core data structures and node type implementations

// Core node system modules
pub mod controls;
pub mod factory;
pub mod graph;
pub mod hooks;
pub mod host;
pub mod node;
pub mod port;

// Node type implementations
pub mod text;

// Re-export core types
pub use graph::{Connection, NodeGraph};
pub use node::{Node, NodeId};
pub use port::{Port, PortId, PortType};

// Re-export factory types
pub use factory::{
    NodeFactory, NodeMetadata, NodeCategory,
    DataType, NodeRegistry, PortDefinition,
};

pub use host::{GraphNode, NodeHost};
