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

//! In-memory repository backend.
//!
//! A small but complete session implementation: users, login,
//! impersonation rules and session-local namespace mappings. Used by the
//! command line tool and the test suite to drive the proxy end to end.

pub mod namespaces;
pub mod repository;
pub mod session;

use once_cell::sync::Lazy;

use crate::capability::{Capability, CapabilityDescriptor};
use crate::core::constants::capability::LEGACY_JSR283_PREFIX;
use crate::core::constants::operations::{IMPERSONATE, SET_NAMESPACE_PREFIX};

pub use namespaces::NamespaceMap;
pub use repository::{MemoryRepository, RepositoryDefinition, UserDefinition};
pub use session::MemorySession;

pub const JCR_SESSION: &str = "javax.jcr.Session";
pub const JACKRABBIT_SESSION: &str = "org.apache.jackrabbit.api.JackrabbitSession";

pub static JCR_SESSION_CAPABILITY: Lazy<Capability> = Lazy::new(|| {
    CapabilityDescriptor::builder(JCR_SESSION)
        .operations([
            "getUserID",
            "getAttribute",
            "getAttributeNames",
            "getWorkspaceName",
            IMPERSONATE,
            "isLive",
            "logout",
            SET_NAMESPACE_PREFIX,
            "getNamespacePrefix",
            "getNamespaceURI",
            "getNamespacePrefixes",
        ])
        .build()
});

pub static JACKRABBIT_SESSION_CAPABILITY: Lazy<Capability> = Lazy::new(|| {
    CapabilityDescriptor::builder(JACKRABBIT_SESSION)
        .extends(&JCR_SESSION_CAPABILITY)
        .operation("getPrincipals")
        .build()
});

pub static LEGACY_SESSION_CAPABILITY: Lazy<Capability> = Lazy::new(|| {
    CapabilityDescriptor::builder(format!("{}.Session", LEGACY_JSR283_PREFIX))
        .extends(&JCR_SESSION_CAPABILITY)
        .build()
});
