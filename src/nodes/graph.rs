//! Node graph data structures and operations

use super::host::GraphNode;
use super::node::{Node, NodeId};
use super::port::PortId;
use crate::constants::FIRST_NODE_ID;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a connection between two ports on different nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: NodeId,
    pub from_port: PortId,
    pub to_node: NodeId,
    pub to_port: PortId,
}

impl Connection {
    /// Creates a new connection
    pub fn new(from_node: NodeId, from_port: PortId, to_node: NodeId, to_port: PortId) -> Self {
        Self {
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }
}

/// A graph containing nodes and their connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub connections: Vec<Connection>,
    next_node_id: NodeId,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            connections: Vec::new(),
            next_node_id: FIRST_NODE_ID,
        }
    }

    /// Adds a node to the graph and returns its ID
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = self.next_node_id;
        node.id = id;
        self.nodes.insert(id, node);
        self.next_node_id += 1;
        id
    }

    /// Adds a node to the graph with a specific ID (used when restoring saved graphs)
    pub fn add_node_with_id(&mut self, id: NodeId, mut node: Node) -> NodeId {
        node.id = id;
        self.nodes.insert(id, node);
        // Update next_node_id to avoid conflicts
        if id >= self.next_node_id {
            self.next_node_id = id + 1;
        }
        id
    }

    /// Removes a node and all its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections
            .retain(|conn| conn.from_node != node_id && conn.to_node != node_id);
        self.nodes.remove(&node_id)
    }

    /// Borrow a node together with the graph's link table
    pub fn node_host(&mut self, node_id: NodeId) -> Option<GraphNode<'_>> {
        let NodeGraph { nodes, connections, .. } = self;
        nodes
            .get_mut(&node_id)
            .map(|node| GraphNode::new(node, connections))
    }

    /// Adds a connection between two ports
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), &'static str> {
        if connection.from_node == connection.to_node {
            return Err("Cannot connect a node to itself");
        }

        let Some(source) = self.nodes.get(&connection.from_node) else {
            return Err("Source node does not exist");
        };
        if connection.from_port >= source.outputs.len() {
            return Err("Source port does not exist");
        }
        if !self.nodes.contains_key(&connection.to_node) {
            return Err("Target node does not exist");
        }

        self.connections.push(connection);
        Ok(())
    }

    /// Helper method to add connection by node IDs and port indices
    pub fn add_connection_by_ids(&mut self, from_node: NodeId, from_port: PortId, to_node: NodeId, to_port: PortId) -> Result<(), &'static str> {
        self.add_connection(Connection::new(from_node, from_port, to_node, to_port))
    }

    /// Removes a connection by index
    pub fn remove_connection(&mut self, index: usize) -> Option<Connection> {
        if index < self.connections.len() {
            Some(self.connections.remove(index))
        } else {
            None
        }
    }

    /// Connections leaving the given output slot
    pub fn connections_from(&self, node_id: NodeId, port: PortId) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|conn| conn.from_node == node_id && conn.from_port == port)
            .collect()
    }

    /// Node ids in ascending order
    pub fn sorted_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::factory::DataType;
    use egui::Pos2;

    fn source_and_sink(graph: &mut NodeGraph) -> (NodeId, NodeId) {
        let mut source = Node::new(0, "Source", Pos2::ZERO);
        source.add_output("a (STRING)", DataType::String);
        let mut sink = Node::new(0, "Sink", Pos2::ZERO);
        sink.add_input("in", DataType::String);
        (graph.add_node(source), graph.add_node(sink))
    }

    #[test]
    fn test_connection_validation() {
        let mut graph = NodeGraph::new();
        let (source, sink) = source_and_sink(&mut graph);

        assert!(graph.add_connection_by_ids(source, 0, source, 0).is_err());
        assert!(graph.add_connection_by_ids(source, 3, sink, 0).is_err());
        assert!(graph.add_connection_by_ids(source, 0, 99, 0).is_err());
        assert!(graph.add_connection_by_ids(source, 0, sink, 0).is_ok());
        assert_eq!(graph.connections_from(source, 0).len(), 1);
    }

    #[test]
    fn test_remove_node_drops_links() {
        let mut graph = NodeGraph::new();
        let (source, sink) = source_and_sink(&mut graph);
        graph.add_connection_by_ids(source, 0, sink, 0).unwrap();

        assert!(graph.remove_node(sink).is_some());
        assert!(graph.connections.is_empty());
        assert!(graph.node_host(sink).is_none());
    }

    #[test]
    fn test_add_node_with_id_advances_counter() {
        let mut graph = NodeGraph::new();
        graph.add_node_with_id(10, Node::new(0, "A", Pos2::ZERO));
        let next = graph.add_node(Node::new(0, "B", Pos2::ZERO));
        assert_eq!(next, 11);
        assert_eq!(graph.sorted_ids(), vec![10, 11]);
    }
}
