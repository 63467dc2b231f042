//! Application-wide constants and default values
//!
//! Centralized location for all hard-coded values to improve maintainability

/// Bootstrap retry budget used while waiting for a node's control list
pub mod bootstrap {
    /// Maximum number of deferred re-checks before giving up
    pub const MAX_RETRIES: u32 = 10;

    /// Delay between re-checks (milliseconds)
    pub const RETRY_DELAY_MS: u64 = 50;
}

/// Tag synchronizer node constants
pub mod tag_sync {
    /// Node type name of the synchronizer node
    pub const NODE_TYPE: &str = "ParsePromptCustom";

    /// Name of the hidden control holding the persisted record
    pub const RECORD_CONTROL: &str = "tags";

    /// Tag seeded into a fresh node
    pub const BASELINE_TAG: &str = "prompt";

    /// Selector combo label
    pub const SELECTOR_CONTROL: &str = "Tag to Add/Remove";

    pub const ADD_BUTTON: &str = "Add Output";
    pub const REMOVE_BUTTON: &str = "Remove Output";
    pub const REMOVE_LAST_BUTTON: &str = "Remove Last Output";
}

/// Text-source node constants
pub mod textbox {
    pub const STRINGS_NODE_TYPE: &str = "StringsFromTextbox";
    pub const PROMPTS_NODE_TYPE: &str = "PromptsFromTextbox";

    pub const TEXT_CONTROL: &str = "text";
    pub const START_CONTROL: &str = "start";
    pub const COUNT_CONTROL: &str = "count";
    pub const INDEX_CONTROL: &str = "index";
    pub const MODE_CONTROL: &str = "mode";

    pub const MODE_FIXED: &str = "Fixed";
    pub const MODE_CONTINUED: &str = "Continued";
}

/// Node layout metrics
pub mod layout {
    /// Minimum node width
    pub const MIN_NODE_WIDTH: f32 = 150.0;

    /// Approximate glyph width used for title sizing
    pub const TITLE_CHAR_WIDTH: f32 = 7.0;

    /// Height of the title bar
    pub const TITLE_HEIGHT: f32 = 30.0;

    /// Height of one input/output slot row
    pub const SLOT_HEIGHT: f32 = 20.0;

    /// Default height of a visible control
    pub const CONTROL_HEIGHT: f32 = 22.0;

    /// Vertical padding below the last row
    pub const BOTTOM_PADDING: f32 = 8.0;

    /// Horizontal spacing between port anchors
    pub const PORT_SPACING: f32 = 30.0;
}

/// Event loop constants
pub mod event_loop {
    /// Simulated frame interval (milliseconds)
    pub const FRAME_INTERVAL_MS: u64 = 16;

    /// Frame cap for `run_until_idle`
    pub const MAX_IDLE_FRAMES: u32 = 10_000;
}

/// Starting ID for nodes created without an explicit ID
pub const FIRST_NODE_ID: usize = 1;
