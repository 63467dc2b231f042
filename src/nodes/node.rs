//! Node types and core node functionality

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::controls::{Control, ControlId};
use super::factory::DataType;
use super::port::{Port, PortType};
use crate::constants::layout;

/// Unique identifier for a node
pub type NodeId = usize;

/// Core node structure representing a visual node in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Registered type name, used to look up metadata and hooks
    pub node_type: String,
    pub title: String,
    #[serde(with = "pos2_serde")]
    pub position: Pos2,
    #[serde(with = "vec2_serde")]
    pub size: Vec2,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    #[serde(default)]
    pub controls: Vec<Control>,
    /// Persist control values even when the schema would not
    #[serde(default)]
    pub serialize_controls: bool,
    /// Set whenever the node needs a redraw
    #[serde(skip)]
    pub dirty: bool,
}

impl Node {
    /// Creates a new node with the specified properties
    pub fn new(id: NodeId, node_type: impl Into<String>, position: Pos2) -> Self {
        let node_type = node_type.into();
        Self {
            id,
            title: node_type.clone(),
            node_type,
            position,
            size: Vec2::new(layout::MIN_NODE_WIDTH, layout::TITLE_HEIGHT),
            inputs: vec![],
            outputs: vec![],
            controls: vec![],
            serialize_controls: false,
            dirty: false,
        }
    }

    /// Sets the display title of the node
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds an input port to the node
    pub fn add_input(&mut self, name: impl Into<String>, data_type: DataType) -> &mut Self {
        let port_id = self.inputs.len();
        self.inputs.push(Port::new(port_id, name, PortType::Input, data_type));
        self
    }

    /// Appends an output port to the node
    pub fn add_output(&mut self, name: impl Into<String>, data_type: DataType) -> &mut Self {
        let port_id = self.outputs.len();
        self.outputs.push(Port::new(port_id, name, PortType::Output, data_type));
        self.update_port_positions();
        self
    }

    /// Removes the output at `index`, renumbering the ports after it
    pub fn remove_output(&mut self, index: usize) -> Option<Port> {
        if index >= self.outputs.len() {
            return None;
        }
        let removed = self.outputs.remove(index);
        for (i, port) in self.outputs.iter_mut().enumerate().skip(index) {
            port.id = i;
        }
        self.update_port_positions();
        Some(removed)
    }

    /// Slot index of the output with exactly this name
    pub fn find_output_slot(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|port| port.name == name)
    }

    /// Appends a control and returns its id
    pub fn add_control(&mut self, control: Control) -> ControlId {
        self.controls.push(control);
        self.controls.len() - 1
    }

    pub fn find_control(&self, name: &str) -> Option<ControlId> {
        self.controls.iter().position(|control| control.name == name)
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.name == name)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|control| control.name == name)
    }

    /// Preferred size given the current ports and controls
    pub fn compute_size(&self) -> Vec2 {
        let title_width = self.title.chars().count() as f32 * layout::TITLE_CHAR_WIDTH + 20.0;
        let width = layout::MIN_NODE_WIDTH.max(title_width);

        let rows = self.inputs.len().max(self.outputs.len()) as f32;
        let controls: f32 = self.controls.iter().map(Control::layout_height).sum();
        let height = layout::TITLE_HEIGHT + rows * layout::SLOT_HEIGHT + controls + layout::BOTTOM_PADDING;

        Vec2::new(width, height)
    }

    /// Resizes the node and re-anchors its ports
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.update_port_positions();
    }

    /// Updates the positions of all ports based on the node's position and size
    pub fn update_port_positions(&mut self) {
        let port_spacing = layout::PORT_SPACING;

        // Input ports on TOP of node
        let input_start_x = if self.inputs.len() > 1 {
            (self.size.x - (self.inputs.len() - 1) as f32 * port_spacing) / 2.0
        } else {
            self.size.x / 2.0
        };

        for (i, input) in self.inputs.iter_mut().enumerate() {
            input.position =
                self.position + Vec2::new(input_start_x + i as f32 * port_spacing, 0.0);
        }

        // Output ports on BOTTOM of node
        let output_start_x = if self.outputs.len() > 1 {
            (self.size.x - (self.outputs.len() - 1) as f32 * port_spacing) / 2.0
        } else {
            self.size.x / 2.0
        };

        for (i, output) in self.outputs.iter_mut().enumerate() {
            output.position =
                self.position + Vec2::new(output_start_x + i as f32 * port_spacing, self.size.y);
        }
    }
}

// Serde helper modules for egui types
pub(super) mod pos2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(pos: &Pos2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [pos.x, pos.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pos2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Pos2::new(x, y))
    }
}

mod vec2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(vec: &Vec2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [vec.x, vec.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Vec2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_output_renumbers_slots() {
        let mut node = Node::new(1, "Test", Pos2::ZERO);
        node.add_output("a (STRING)", DataType::String)
            .add_output("b (INT)", DataType::Int)
            .add_output("c (FLOAT)", DataType::Float);

        let removed = node.remove_output(0).unwrap();
        assert_eq!(removed.name, "a (STRING)");
        assert_eq!(node.outputs[0].id, 0);
        assert_eq!(node.outputs[1].id, 1);
        assert_eq!(node.find_output_slot("c (FLOAT)"), Some(1));
        assert!(node.remove_output(5).is_none());
    }

    #[test]
    fn test_compute_size_grows_with_outputs_and_ignores_hidden_controls() {
        let mut node = Node::new(1, "Test", Pos2::ZERO);
        let base = node.compute_size();

        node.add_output("a (STRING)", DataType::String);
        let one = node.compute_size();
        assert_eq!(one.y - base.y, layout::SLOT_HEIGHT);

        let mut hidden = Control::text("tags", "");
        hidden.conceal();
        node.add_control(hidden);
        assert_eq!(node.compute_size(), one);

        node.add_control(Control::button("Add Output"));
        assert_eq!(node.compute_size().y - one.y, layout::CONTROL_HEIGHT);
    }
}
