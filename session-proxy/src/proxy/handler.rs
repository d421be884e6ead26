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

//! Session proxy.
//!
//! A [`SessionProxy`] stands in for a delegate session. Every call goes
//! through [`SessionProxy::invoke`]: impersonation derives the new session,
//! has the repository define its namespace prefixes, and returns it wrapped
//! in another proxy; everything else is forwarded untouched.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::capability::{self, CapabilityResolver, CapabilitySet, SessionType};
use crate::core::errors::SessionError;
use crate::core::session::{Repository, Session, SessionHandle};
use crate::core::types::{Credentials, Value};
use crate::proxy::dispatch::{self, Route};

/// Creates proxies that share one repository and one capability resolver.
#[derive(Clone)]
pub struct SessionProxyFactory {
    repository: Arc<dyn Repository>,
    resolver: Arc<CapabilityResolver>,
}

impl SessionProxyFactory {
    /// Factory backed by the process-wide resolver.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self::with_resolver(repository, capability::global())
    }

    pub fn with_resolver(repository: Arc<dyn Repository>, resolver: Arc<CapabilityResolver>) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    pub fn resolver(&self) -> &Arc<CapabilityResolver> {
        &self.resolver
    }

    pub fn wrap(&self, session: SessionHandle) -> Arc<SessionProxy> {
        Arc::new(SessionProxy::new(
            session,
            Arc::clone(&self.repository),
            Arc::clone(&self.resolver),
        ))
    }
}

/// Wrap `session` using the process-wide resolver.
pub fn wrap(session: SessionHandle, repository: Arc<dyn Repository>) -> Arc<SessionProxy> {
    SessionProxyFactory::new(repository).wrap(session)
}

pub struct SessionProxy {
    delegate: SessionHandle,
    repository: Arc<dyn Repository>,
    resolver: Arc<CapabilityResolver>,
    capabilities: CapabilitySet,
}

impl SessionProxy {
    fn new(
        delegate: SessionHandle,
        repository: Arc<dyn Repository>,
        resolver: Arc<CapabilityResolver>,
    ) -> Self {
        let capabilities = resolver.resolve(&delegate.session_type());
        Self {
            delegate,
            repository,
            resolver,
            capabilities,
        }
    }

    pub fn delegate(&self) -> &SessionHandle {
        &self.delegate
    }

    /// Capabilities this proxy satisfies.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    fn impersonate_and_wrap(&self, credentials: &Credentials) -> Result<Arc<SessionProxy>, SessionError> {
        let session = self.delegate.impersonate(credentials)?;
        self.repository.define_namespace_prefixes(&session)?;

        let session_type = session.session_type();
        debug!(
            user = credentials.user_id().unwrap_or("<guest>"),
            session_type = session_type.name(),
            "Impersonated session with namespace prefixes defined"
        );

        Ok(Arc::new(SessionProxy::new(
            session,
            Arc::clone(&self.repository),
            Arc::clone(&self.resolver),
        )))
    }
}

impl Session for SessionProxy {
    fn session_type(&self) -> Arc<SessionType> {
        self.delegate.session_type()
    }

    fn invoke(&self, operation: &str, args: &[Value]) -> Result<Value, SessionError> {
        match dispatch::route(&self.capabilities, operation, args) {
            Route::Impersonate(credentials) => {
                let proxy: SessionHandle = self.impersonate_and_wrap(credentials)?;
                Ok(Value::Session(proxy))
            }
            Route::Forward => {
                trace!(operation, args = args.len(), "Forwarding to delegate");
                self.delegate
                    .invoke(operation, args)
                    .map_err(SessionError::into_cause)
            }
            Route::Reject => Err(SessionError::unsupported(
                operation,
                self.delegate.session_type().name(),
            )),
        }
    }

    fn impersonate(&self, credentials: &Credentials) -> Result<SessionHandle, SessionError> {
        let proxy: SessionHandle = self.impersonate_and_wrap(credentials)?;
        Ok(proxy)
    }
}

impl std::fmt::Debug for SessionProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProxy")
            .field("session_type", &self.delegate.session_type().name())
            .field("capabilities", &self.capabilities.names())
            .finish()
    }
}
