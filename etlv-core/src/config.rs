//! Codec configuration

use serde::{Deserialize, Serialize};

/// Configuration shared by the parser, serializer and finder
///
/// Every field has a default, so a partial serialized config is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Keep scanning after the parse output is full to report the true
    /// token count. When `false` the parse stops at once and reports the
    /// capacity as the count.
    pub count_past_capacity: bool,
    /// Upper bound on tokens appended to growable output
    pub max_tokens: Option<usize>,
    /// Hex-dump value bytes in log output
    pub dump_values: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            count_past_capacity: true,
            max_tokens: None,
            dump_values: true,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count_past_capacity(mut self, enabled: bool) -> Self {
        self.count_past_capacity = enabled;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_dump_values(mut self, enabled: bool) -> Self {
        self.dump_values = enabled;
        self
    }
}
