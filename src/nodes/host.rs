//! Host operations a node type extension may perform on a live node
//!
//! The reconciliation code only ever talks to a node through [`NodeHost`], so it
//! runs the same against a bare [`Node`] and against a node that lives inside a
//! [`NodeGraph`](super::NodeGraph), where removing an output also has to keep the
//! graph's links consistent.

use egui::Vec2;

use super::controls::{Control, ControlId};
use super::factory::DataType;
use super::graph::Connection;
use super::node::Node;
use super::port::Port;

/// Output, control and layout operations provided by the editor
pub trait NodeHost {
    /// Live output list, in slot order
    fn outputs(&self) -> &[Port];

    /// Append an output port
    fn add_output(&mut self, name: &str, data_type: DataType);

    /// Remove the output at `index`; out-of-range indices are ignored
    fn remove_output(&mut self, index: usize);

    fn find_output_slot(&self, name: &str) -> Option<usize> {
        self.outputs().iter().position(|port| port.name == name)
    }

    fn controls(&self) -> &[Control];

    fn find_control(&self, name: &str) -> Option<ControlId> {
        self.controls().iter().position(|control| control.name == name)
    }

    fn control_mut(&mut self, id: ControlId) -> Option<&mut Control>;

    fn add_control(&mut self, control: Control) -> ControlId;

    fn size(&self) -> Vec2;

    fn compute_size(&self) -> Vec2;

    fn set_size(&mut self, size: Vec2);

    /// Request a redraw
    fn set_dirty(&mut self);
}

impl NodeHost for Node {
    fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    fn add_output(&mut self, name: &str, data_type: DataType) {
        Node::add_output(self, name, data_type);
    }

    fn remove_output(&mut self, index: usize) {
        Node::remove_output(self, index);
    }

    fn controls(&self) -> &[Control] {
        &self.controls
    }

    fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(id)
    }

    fn add_control(&mut self, control: Control) -> ControlId {
        Node::add_control(self, control)
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn compute_size(&self) -> Vec2 {
        Node::compute_size(self)
    }

    fn set_size(&mut self, size: Vec2) {
        Node::set_size(self, size);
    }

    fn set_dirty(&mut self) {
        self.dirty = true;
    }
}

/// A node borrowed out of a graph along with the graph's links
pub struct GraphNode<'a> {
    node: &'a mut Node,
    connections: &'a mut Vec<Connection>,
}

impl<'a> GraphNode<'a> {
    pub(crate) fn new(node: &'a mut Node, connections: &'a mut Vec<Connection>) -> Self {
        Self { node, connections }
    }
}

impl NodeHost for GraphNode<'_> {
    fn outputs(&self) -> &[Port] {
        &self.node.outputs
    }

    fn add_output(&mut self, name: &str, data_type: DataType) {
        self.node.add_output(name, data_type);
    }

    /// Links on the removed slot are dropped; links on later slots follow their port
    fn remove_output(&mut self, index: usize) {
        if self.node.remove_output(index).is_none() {
            return;
        }
        let node_id = self.node.id;
        self.connections
            .retain(|conn| !(conn.from_node == node_id && conn.from_port == index));
        for conn in self.connections.iter_mut() {
            if conn.from_node == node_id && conn.from_port > index {
                conn.from_port -= 1;
            }
        }
    }

    fn controls(&self) -> &[Control] {
        &self.node.controls
    }

    fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.node.controls.get_mut(id)
    }

    fn add_control(&mut self, control: Control) -> ControlId {
        self.node.add_control(control)
    }

    fn size(&self) -> Vec2 {
        self.node.size
    }

    fn compute_size(&self) -> Vec2 {
        self.node.compute_size()
    }

    fn set_size(&mut self, size: Vec2) {
        self.node.set_size(size);
    }

    fn set_dirty(&mut self) {
        self.node.dirty = true;
    }
}
