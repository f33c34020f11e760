//! Generation configuration

use serde::{Deserialize, Serialize};

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

/// Settings for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum number of resources generated concurrently
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Abort the whole run on the first failing definition instead of
    /// reporting it alongside the successes
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            fail_fast: false,
        }
    }
}
