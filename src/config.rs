// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failure to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failure to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Batch description: one seed shared by a list of pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub scramble_seed: u32,
    pub page_list: Vec<String>,
}

impl BatchConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let cfg = BatchConfig::from_json(
            r#"{"scramble_seed": 42, "page_list": ["https://example.com/1.jpg", "p2.png"]}"#,
        )
        .unwrap();
        assert_eq!(cfg.scramble_seed, 42);
        assert_eq!(cfg.page_list.len(), 2);
    }

    #[test]
    fn reject_negative_seed() {
        let r = BatchConfig::from_json(r#"{"scramble_seed": -1, "page_list": []}"#);
        assert!(matches!(r, Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_file() {
        let r = BatchConfig::load("/nonexistent/descramble.json");
        assert!(matches!(r, Err(ConfigError::Io(_))));
    }
}
