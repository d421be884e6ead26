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

//! Capability discovery.
//!
//! Flattens everything a session type satisfies: capabilities declared on
//! the type and on each ancestor, plus every capability those extend,
//! minus the excluded legacy families. Results are memoized per concrete
//! type for the lifetime of the resolver.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::capability::descriptor::{Capability, SessionType};
use crate::capability::set::CapabilitySet;
use crate::core::constants::capability::LEGACY_JSR283_PREFIX;

/// Drops capabilities whose name starts with a deprecated prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    prefixes: Vec<String>,
}

impl ExclusionRule {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Rule that excludes nothing.
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

impl Default for ExclusionRule {
    fn default() -> Self {
        Self::new([LEGACY_JSR283_PREFIX])
    }
}

/// Walk `session_type` and return its flattened capability set.
///
/// Pure and uncached. An excluded capability is left out of the result but
/// the capabilities it extends are still visited.
pub fn discover(session_type: &SessionType, exclusion: &ExclusionRule) -> CapabilitySet {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut found: Vec<Capability> = Vec::new();

    for ty in session_type.lineage() {
        for cap in ty.declared() {
            walk(cap, exclusion, &mut visited, &mut found);
        }
    }

    CapabilitySet::from_capabilities(found)
}

fn walk<'a>(
    root: &'a Capability,
    exclusion: &ExclusionRule,
    visited: &mut HashSet<&'a str>,
    found: &mut Vec<Capability>,
) {
    let mut stack: Vec<&'a Capability> = vec![root];
    while let Some(cap) = stack.pop() {
        if !visited.insert(cap.name()) {
            continue;
        }
        if !exclusion.is_excluded(cap.name()) {
            found.push(Arc::clone(cap));
        }
        stack.extend(cap.extends().iter().rev());
    }
}

/// Memoizing front end for [`discover`].
///
/// Reads go through the cache; a miss takes the resolver-wide compute lock,
/// checks again, computes and publishes. A set is computed at most once per
/// session type.
#[derive(Debug)]
pub struct CapabilityResolver {
    exclusion: ExclusionRule,
    cache: RwLock<HashMap<TypeId, CapabilitySet>>,
    compute_lock: Mutex<()>,
    computations: AtomicUsize,
}

impl CapabilityResolver {
    pub fn new(exclusion: ExclusionRule) -> Self {
        Self {
            exclusion,
            cache: RwLock::new(HashMap::new()),
            compute_lock: Mutex::new(()),
            computations: AtomicUsize::new(0),
        }
    }

    pub fn exclusion(&self) -> &ExclusionRule {
        &self.exclusion
    }

    /// Capability set for `session_type`, computing it on first use.
    ///
    /// A published set is read under a shared `RwLock` read guard rather than
    /// lock-free; writers only appear on a cache miss, so the guard is
    /// uncontended once every session type has been seen. Proxies keep their
    /// resolved set, so calls on a proxy never come back here.
    pub fn resolve(&self, session_type: &SessionType) -> CapabilitySet {
        if let Some(set) = self.cached(session_type.id()) {
            return set;
        }

        let _guard = self
            .compute_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(set) = self.cached(session_type.id()) {
            return set;
        }

        let set = discover(session_type, &self.exclusion);
        self.computations.fetch_add(1, Ordering::Relaxed);
        debug!(
            session_type = session_type.name(),
            capabilities = ?set.names(),
            "Resolved session capabilities"
        );

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_type.id(), set.clone());
        set
    }

    /// Cached set for `id`, without computing.
    pub fn cached(&self, id: TypeId) -> Option<CapabilitySet> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Number of sets computed so far.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn cached_types(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for CapabilityResolver {
    fn default() -> Self {
        Self::new(ExclusionRule::default())
    }
}

static GLOBAL: Lazy<Arc<CapabilityResolver>> =
    Lazy::new(|| Arc::new(CapabilityResolver::default()));

/// Process-wide resolver with the default exclusion rule.
pub fn global() -> Arc<CapabilityResolver> {
    Arc::clone(&GLOBAL)
}

/// Resolve through the process-wide resolver.
pub fn resolve_capabilities(session_type: &SessionType) -> CapabilitySet {
    GLOBAL.resolve(session_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::descriptor::CapabilityDescriptor;

    struct Plain;
    struct Derived;

    fn fixtures() -> (Arc<SessionType>, Arc<SessionType>) {
        let item = CapabilityDescriptor::builder("javax.jcr.Session")
            .operation("logout")
            .build();
        let legacy = CapabilityDescriptor::builder("org.apache.jackrabbit.api.jsr283.Session")
            .extends(&item)
            .build();
        let jackrabbit = CapabilityDescriptor::builder("org.apache.jackrabbit.api.JackrabbitSession")
            .extends(&item)
            .operation("getPrincipals")
            .build();
        let closeable = CapabilityDescriptor::builder("java.io.Closeable").build();

        let base = SessionType::of::<Plain>()
            .implements(&legacy)
            .implements(&closeable)
            .build();
        let derived = SessionType::of::<Derived>()
            .implements(&jackrabbit)
            .extends(&base)
            .build();
        (base, derived)
    }

    #[test]
    fn test_discover_flattens_ancestors_and_extends() {
        let (_, derived) = fixtures();
        let set = discover(&derived, &ExclusionRule::default());

        assert_eq!(
            set.names(),
            vec![
                "java.io.Closeable",
                "javax.jcr.Session",
                "org.apache.jackrabbit.api.JackrabbitSession",
            ]
        );
        assert!(set.provides("logout"));
        assert!(set.provides("getPrincipals"));
    }

    #[test]
    fn test_excluded_capability_still_contributes_its_parents() {
        let (base, _) = fixtures();
        let set = discover(&base, &ExclusionRule::default());

        assert!(!set.contains("org.apache.jackrabbit.api.jsr283.Session"));
        assert!(set.contains("javax.jcr.Session"));
    }

    #[test]
    fn test_no_exclusion_keeps_legacy() {
        let (base, _) = fixtures();
        let set = discover(&base, &ExclusionRule::none());
        assert!(set.contains("org.apache.jackrabbit.api.jsr283.Session"));
    }

    #[test]
    fn test_exclusion_rule_ignores_empty_prefix() {
        let rule = ExclusionRule::new(["", "legacy."]);
        assert_eq!(rule.prefixes(), ["legacy.".to_string()]);
        assert!(rule.is_excluded("legacy.Session"));
        assert!(!rule.is_excluded("javax.jcr.Session"));
    }

    #[test]
    fn test_resolver_caches_per_type() {
        let (base, derived) = fixtures();
        let resolver = CapabilityResolver::default();

        let first = resolver.resolve(&derived);
        let second = resolver.resolve(&derived);
        assert!(first.ptr_eq(&second));
        assert_eq!(resolver.computations(), 1);

        resolver.resolve(&base);
        assert_eq!(resolver.computations(), 2);
        assert_eq!(resolver.cached_types(), 2);
    }

    #[test]
    fn test_type_without_capabilities_yields_empty_set() {
        let ty = SessionType::of::<Plain>().build();
        let set = CapabilityResolver::default().resolve(&ty);
        assert!(set.is_empty());
    }
}
