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

//! Session and repository collaborator contracts.

use std::sync::Arc;

use crate::capability::SessionType;
use crate::core::errors::SessionError;
use crate::core::types::{Credentials, Value};

/// Shared handle to any session, raw or proxied.
pub type SessionHandle = Arc<dyn Session>;

/// A stateful handle onto a content repository.
///
/// Backends expose their whole operation surface through [`Session::invoke`];
/// which operations exist is described by the capabilities of
/// [`Session::session_type`].
pub trait Session: Send + Sync {
    /// Runtime type of the concrete session. All sessions of one backend
    /// struct return the same descriptor.
    fn session_type(&self) -> Arc<SessionType>;

    /// Invoke `operation` with `args` and return its result.
    fn invoke(&self, operation: &str, args: &[Value]) -> Result<Value, SessionError>;

    /// Derive a new session for `credentials`.
    fn impersonate(&self, credentials: &Credentials) -> Result<SessionHandle, SessionError>;
}

/// Repository component consumed by the proxy.
pub trait Repository: Send + Sync {
    /// Apply the repository's configured namespace prefixes to `session`.
    fn define_namespace_prefixes(&self, session: &SessionHandle) -> Result<(), SessionError>;
}
