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

//! Capability and session type descriptors.
//!
//! Rust has no runtime interface introspection, so a backend describes its
//! concrete session type explicitly: which capabilities it declares, which
//! type it derives from, and which operations each capability provides.
//! Descriptors are immutable once built and shared through `Arc`.

use std::any::TypeId;
use std::sync::Arc;

/// Shared handle to a capability descriptor.
pub type Capability = Arc<CapabilityDescriptor>;

/// An interface a session type can satisfy.
///
/// Identity is the name: two descriptors with the same name are the same
/// capability.
#[derive(Debug)]
pub struct CapabilityDescriptor {
    name: String,
    operations: Vec<String>,
    extends: Vec<Capability>,
}

impl CapabilityDescriptor {
    pub fn builder(name: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder {
            name: name.into(),
            operations: Vec::new(),
            extends: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operations declared directly on this capability.
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    /// Capabilities this one extends.
    pub fn extends(&self) -> &[Capability] {
        &self.extends
    }

    pub fn declares(&self, operation: &str) -> bool {
        self.operations.iter().any(|op| op == operation)
    }
}

pub struct CapabilityBuilder {
    name: String,
    operations: Vec<String>,
    extends: Vec<Capability>,
}

impl CapabilityBuilder {
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operations.push(operation.into());
        self
    }

    pub fn operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operations.extend(operations.into_iter().map(Into::into));
        self
    }

    pub fn extends(mut self, capability: &Capability) -> Self {
        self.extends.push(Arc::clone(capability));
        self
    }

    pub fn build(self) -> Capability {
        Arc::new(CapabilityDescriptor {
            name: self.name,
            operations: self.operations,
            extends: self.extends,
        })
    }
}

/// Runtime type of a concrete session.
///
/// Keyed by the `TypeId` of the backend struct it was built for; the parent
/// plays the role of a supertype whose declared capabilities are inherited.
#[derive(Debug)]
pub struct SessionType {
    id: TypeId,
    name: String,
    declared: Vec<Capability>,
    parent: Option<Arc<SessionType>>,
}

impl SessionType {
    /// Start describing the session type implemented by `T`.
    pub fn of<T: 'static>() -> SessionTypeBuilder {
        SessionTypeBuilder {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()).to_string(),
            declared: Vec::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capabilities declared directly by this type (not inherited).
    pub fn declared(&self) -> &[Capability] {
        &self.declared
    }

    pub fn parent(&self) -> Option<&Arc<SessionType>> {
        self.parent.as_ref()
    }

    /// This type followed by its ancestors, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &SessionType> {
        std::iter::successors(Some(self), |&t| t.parent.as_deref())
    }
}

pub struct SessionTypeBuilder {
    id: TypeId,
    name: String,
    declared: Vec<Capability>,
    parent: Option<Arc<SessionType>>,
}

impl SessionTypeBuilder {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn implements(mut self, capability: &Capability) -> Self {
        self.declared.push(Arc::clone(capability));
        self
    }

    pub fn extends(mut self, parent: &Arc<SessionType>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    pub fn build(self) -> Arc<SessionType> {
        Arc::new(SessionType {
            id: self.id,
            name: self.name,
            declared: self.declared,
            parent: self.parent,
        })
    }
}

fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
