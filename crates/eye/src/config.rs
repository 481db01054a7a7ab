//! Wrapper Configuration

/// Naming used by compiled models
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Class put on every model root
    pub model_class: String,

    /// Attribute marking slot elements; its value is the slot name
    pub slot_attribute: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_class: "eye-model".to_string(),
            slot_attribute: "data-value".to_string(),
        }
    }
}
