//! Output and input slots of a node

use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::factory::DataType;
use super::node::pos2_serde;

/// Slot index of a port on its node; links address ports by slot
pub type PortId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortType {
    Input,
    Output,
}

/// One typed slot. Saved workflows keep the name and type, the anchor is recomputed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub port_type: PortType,
    pub data_type: DataType,
    #[serde(with = "pos2_serde", default)]
    pub position: Pos2,
}

impl Port {
    pub fn new(id: PortId, name: impl Into<String>, port_type: PortType, data_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            port_type,
            data_type,
            position: Pos2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_port_without_anchor_loads() {
        let json = r#"{"id":2,"name":"seed (INT)","port_type":"Output","data_type":"INT"}"#;
        let port: Port = serde_json::from_str(json).unwrap();
        assert_eq!(port.id, 2);
        assert_eq!(port.data_type, DataType::Int);
        assert_eq!(port.position, Pos2::ZERO);

        let saved = serde_json::to_value(&port).unwrap();
        assert_eq!(saved["position"], serde_json::json!([0.0, 0.0]));
    }
}
