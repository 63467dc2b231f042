//! Fixed catalog of tags a synchronizer node can expose

use log::debug;
use once_cell::sync::Lazy;

use crate::nodes::DataType;

static BUILTIN: Lazy<TagCatalog> = Lazy::new(|| {
    use DataType::*;
    TagCatalog::new(vec![
        ("prompt", String),
        ("negative_prompt", String),
        ("seed", Int),
        ("steps", Int),
        ("width", Int),
        ("height", Int),
        ("cfg_scale", Float),
        ("batch_size", Int),
        ("outpath_samples", String),
        ("outpath_grids", String),
        ("prompt_for_display", String),
        ("styles", String),
        ("sampler_name", String),
        ("subseed", Int),
        ("seed_resize_from_h", Int),
        ("seed_resize_from_w", Int),
        ("sampler_index", Int),
        ("n_iter", Int),
        ("subseed_strength", Float),
        ("restore_faces", Boolean),
        ("tiling", Boolean),
        ("do_not_save_samples", Boolean),
        ("do_not_save_grid", Boolean),
    ])
});

/// Tag name -> value type, in presentation order
#[derive(Debug, Clone)]
pub struct TagCatalog {
    entries: Vec<(&'static str, DataType)>,
}

impl TagCatalog {
    pub fn new(entries: Vec<(&'static str, DataType)>) -> Self {
        Self { entries }
    }

    /// The catalog shared by every synchronizer node
    pub fn builtin() -> &'static TagCatalog {
        &BUILTIN
    }

    /// Declared type of `tag`; unknown tags are treated as STRING
    pub fn type_of(&self, tag: &str) -> DataType {
        match self.lookup(tag) {
            Some(data_type) => data_type,
            None => {
                debug!("Unknown tag '{}', treating as STRING", tag);
                DataType::String
            }
        }
    }

    pub fn lookup(&self, tag: &str) -> Option<DataType> {
        self.entries
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, data_type)| *data_type)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Tag names in presentation order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, DataType)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
