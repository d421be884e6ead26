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

//! Resolved capability sets.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::capability::descriptor::Capability;

/// Flattened, deduplicated capabilities of one session type.
///
/// Immutable and cheap to clone; every proxy over the same session type
/// shares one instance. Iteration is ordered by capability name.
#[derive(Debug, Clone)]
pub struct CapabilitySet {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    by_name: BTreeMap<String, Capability>,
    // operation -> name of the capability providing it
    operations: HashMap<String, String>,
}

impl CapabilitySet {
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
        }
    }

    /// Build a set from already-filtered capabilities. The first descriptor
    /// seen for a name wins.
    pub fn from_capabilities<I>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        let mut by_name = BTreeMap::new();
        for cap in capabilities {
            by_name.entry(cap.name().to_string()).or_insert(cap);
        }

        let mut operations = HashMap::new();
        for (name, cap) in &by_name {
            for op in cap.operations() {
                operations.entry(op.clone()).or_insert_with(|| name.clone());
            }
        }

        Self {
            inner: Arc::new(Inner {
                by_name,
                operations,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.by_name.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.inner.by_name.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.inner.by_name.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.inner.by_name.keys().map(String::as_str).collect()
    }

    /// Whether any capability in the set declares `operation`.
    pub fn provides(&self, operation: &str) -> bool {
        self.inner.operations.contains_key(operation)
    }

    /// The capability that provides `operation`, if any.
    pub fn provider(&self, operation: &str) -> Option<&Capability> {
        self.inner
            .operations
            .get(operation)
            .and_then(|name| self.inner.by_name.get(name))
    }

    /// All operations reachable through the set, sorted.
    pub fn operations(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.inner.operations.keys().map(String::as_str).collect();
        ops.sort_unstable();
        ops
    }

    /// True when both handles point at the same resolved set.
    pub fn ptr_eq(&self, other: &CapabilitySet) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for CapabilitySet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner.by_name.keys().eq(other.inner.by_name.keys())
    }
}

impl Eq for CapabilitySet {}
