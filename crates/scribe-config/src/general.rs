//! Settings that are not loader options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_search_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directories searched for Python modules, in order.
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            search_paths: default_search_paths(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searches_the_working_directory_by_default() {
        assert_eq!(GeneralConfig::default().search_paths, vec![PathBuf::from(".")]);
    }
}
