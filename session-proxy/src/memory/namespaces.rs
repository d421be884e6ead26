// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Session-local namespace prefix mappings.

use std::collections::BTreeMap;

use crate::core::errors::SessionError;

/// Prefixes every session starts with.
pub const BUILTIN_NAMESPACES: &[(&str, &str)] = &[
    ("", ""),
    ("jcr", "http://www.jcp.org/jcr/1.0"),
    ("mix", "http://www.jcp.org/jcr/mix/1.0"),
    ("nt", "http://www.jcp.org/jcr/nt/1.0"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
];

/// Bidirectional prefix <-> URI table; one prefix per URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMap {
    by_prefix: BTreeMap<String, String>,
}

impl NamespaceMap {
    pub fn get_uri(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    pub fn get_prefix(&self, uri: &str) -> Option<&str> {
        self.by_prefix
            .iter()
            .find(|(_, u)| u.as_str() == uri)
            .map(|(p, _)| p.as_str())
    }

    pub fn prefixes(&self) -> Vec<String> {
        self.by_prefix.keys().cloned().collect()
    }

    /// Map `prefix` to `uri`, replacing any previous mapping of either side.
    ///
    /// Re-stating an existing mapping, built-ins included, is a no-op.
    pub fn set(&mut self, prefix: &str, uri: &str) -> Result<(), SessionError> {
        if prefix.is_empty() || uri.is_empty() {
            return Err(SessionError::Namespace(
                "prefix and URI must not be empty".to_string(),
            ));
        }
        if self.get_uri(prefix) == Some(uri) {
            return Ok(());
        }
        if prefix.to_ascii_lowercase().starts_with("xml") {
            return Err(SessionError::Namespace(format!(
                "prefix '{}' is reserved",
                prefix
            )));
        }

        if let Some(old) = self.get_prefix(uri).map(str::to_string) {
            self.by_prefix.remove(&old);
        }
        self.by_prefix.insert(prefix.to_string(), uri.to_string());
        Ok(())
    }
}

impl Default for NamespaceMap {
    fn default() -> Self {
        Self {
            by_prefix: BUILTIN_NAMESPACES
                .iter()
                .map(|(p, u)| (p.to_string(), u.to_string()))
                .collect(),
        }
    }
}
