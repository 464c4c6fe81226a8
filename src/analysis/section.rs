// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Opaque run context an analyzer is executed under.
///
/// A section carries a name and free-form string settings. The execution
/// core treats it as an identity handle only: two analyzers of the same
/// class scheduled under different sections are different scheduling units
/// and get their own dependency instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    settings: HashMap<String, String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip() {
        let section = Section::new("lint").with_setting("max_line_length", "100");

        assert_eq!(section.name(), "lint");
        assert_eq!(section.setting("max_line_length"), Some("100"));
        assert_eq!(section.setting("missing"), None);
    }
}
