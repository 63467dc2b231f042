//! Text node types

pub mod tag_sync;
pub mod textbox;

pub use tag_sync::ParsePromptCustomNodeFactory;
pub use textbox::{PromptsFromTextboxNodeFactory, StringsFromTextboxNodeFactory};

use super::NodeRegistry;

/// Register every text node type
pub fn register_all(registry: &mut NodeRegistry) {
    registry.register::<ParsePromptCustomNodeFactory>();
    registry.register::<StringsFromTextboxNodeFactory>();
    registry.register::<PromptsFromTextboxNodeFactory>();
}
