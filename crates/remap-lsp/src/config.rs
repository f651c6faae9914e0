use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Whether completion items whose range exists only in the generated
    /// document are kept. Such items arrive without a text edit and the
    /// client falls back to its own word boundary; some clients handle
    /// that poorly, so it is a knob.
    pub synthesized_completions: bool,

    /// Maximum number of completion items returned per request.
    pub completion_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            synthesized_completions: true,
            completion_limit: 50,
        }
    }
}
