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

//! In-memory session.
//!
//! `MemorySession` embeds a [`SessionCore`]; the core's session type is the
//! ancestor of the memory session type, so capabilities declared on the core
//! are inherited.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use tracing::debug;
use uuid::Uuid;

use crate::capability::SessionType;
use crate::core::constants::operations::{IMPERSONATE, SET_NAMESPACE_PREFIX};
use crate::core::errors::SessionError;
use crate::core::operations::{expect_arity, str_arg, OperationTable};
use crate::core::session::{Session, SessionHandle};
use crate::core::types::{Credentials, Value};
use crate::memory::namespaces::NamespaceMap;
use crate::memory::repository::{Directory, ANONYMOUS_USER};
use crate::memory::{JACKRABBIT_SESSION_CAPABILITY, JCR_SESSION_CAPABILITY, LEGACY_SESSION_CAPABILITY};

static CORE_TYPE: Lazy<Arc<SessionType>> = Lazy::new(|| {
    SessionType::of::<SessionCore>()
        .implements(&JCR_SESSION_CAPABILITY)
        .implements(&LEGACY_SESSION_CAPABILITY)
        .build()
});

static MEMORY_SESSION_TYPE: Lazy<Arc<SessionType>> = Lazy::new(|| {
    SessionType::of::<MemorySession>()
        .implements(&JACKRABBIT_SESSION_CAPABILITY)
        .extends(&CORE_TYPE)
        .build()
});

static OPERATIONS: Lazy<OperationTable<MemorySession>> = Lazy::new(|| {
    OperationTable::new("MemorySession")
        .with("getUserID", get_user_id)
        .with("getAttribute", get_attribute)
        .with("getAttributeNames", get_attribute_names)
        .with("getWorkspaceName", get_workspace_name)
        .with(IMPERSONATE, impersonate)
        .with("isLive", is_live)
        .with("logout", logout)
        .with(SET_NAMESPACE_PREFIX, set_namespace_prefix)
        .with("getNamespacePrefix", get_namespace_prefix)
        .with("getNamespaceURI", get_namespace_uri)
        .with("getNamespacePrefixes", get_namespace_prefixes)
        .with("getPrincipals", get_principals)
});

/// State every in-memory session carries.
#[derive(Debug)]
pub struct SessionCore {
    id: Uuid,
    user_id: String,
    login_time: DateTime<Utc>,
    attributes: BTreeMap<String, serde_json::Value>,
    live: AtomicBool,
    namespaces: RwLock<NamespaceMap>,
}

impl SessionCore {
    fn new(user_id: &str, attributes: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            login_time: Utc::now(),
            attributes,
            live: AtomicBool::new(true),
            namespaces: RwLock::new(NamespaceMap::default()),
        }
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.live.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(SessionError::NotLive)
        }
    }

    fn namespaces(&self) -> NamespaceMap {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug)]
pub struct MemorySession {
    core: SessionCore,
    directory: Arc<Directory>,
}

impl MemorySession {
    pub(crate) fn open(
        directory: Arc<Directory>,
        user_id: &str,
        attributes: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            core: SessionCore::new(user_id, attributes),
            directory,
        }
    }

    /// Session type shared by all in-memory sessions.
    pub fn memory_session_type() -> Arc<SessionType> {
        Arc::clone(&MEMORY_SESSION_TYPE)
    }

    pub fn id(&self) -> Uuid {
        self.core.id
    }

    pub fn user_id(&self) -> &str {
        &self.core.user_id
    }

    pub fn login_time(&self) -> DateTime<Utc> {
        self.core.login_time
    }

    pub fn is_live(&self) -> bool {
        self.core.live.load(Ordering::Acquire)
    }

    pub fn logout(&self) {
        self.core.live.store(false, Ordering::Release);
    }

    pub fn namespace_uri(&self, prefix: &str) -> Option<String> {
        self.core.namespaces().get_uri(prefix).map(str::to_string)
    }

    fn may_impersonate(&self, target: &str) -> bool {
        let current = self.user_id();
        if current == target || self.directory.is_admin(current) {
            return true;
        }
        self.directory
            .user(target)
            .map(|u| u.impersonators.iter().any(|i| i == current))
            .unwrap_or(false)
    }
}

impl Session for MemorySession {
    fn session_type(&self) -> Arc<SessionType> {
        Self::memory_session_type()
    }

    fn invoke(&self, operation: &str, args: &[Value]) -> Result<Value, SessionError> {
        OPERATIONS.call(self, operation, args)
    }

    fn impersonate(&self, credentials: &Credentials) -> Result<SessionHandle, SessionError> {
        self.core.ensure_live()?;
        let session = match credentials {
            Credentials::Guest => MemorySession::open(
                Arc::clone(&self.directory),
                ANONYMOUS_USER,
                BTreeMap::new(),
            ),
            Credentials::Simple {
                user_id,
                attributes,
                ..
            } => {
                if self.directory.user(user_id).is_none() {
                    return Err(SessionError::Login(format!("unknown user '{}'", user_id)));
                }
                if !self.may_impersonate(user_id) {
                    return Err(SessionError::AccessDenied(format!(
                        "'{}' may not impersonate '{}'",
                        self.user_id(),
                        user_id
                    )));
                }
                MemorySession::open(Arc::clone(&self.directory), user_id, attributes.clone())
            }
        };
        debug!(
            from = self.user_id(),
            to = session.user_id(),
            session_id = %session.id(),
            "Impersonation"
        );
        Ok(Arc::new(session))
    }
}

fn get_user_id(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getUserID", args, 0)?;
    s.core.ensure_live()?;
    Ok(Value::from(s.user_id()))
}

fn get_attribute(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getAttribute", args, 1)?;
    s.core.ensure_live()?;
    let name = str_arg("getAttribute", args, 0)?;
    Ok(s.core
        .attributes
        .get(name)
        .cloned()
        .map(Value::Data)
        .unwrap_or(Value::Null))
}

fn get_attribute_names(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getAttributeNames", args, 0)?;
    s.core.ensure_live()?;
    Ok(Value::Strings(s.core.attributes.keys().cloned().collect()))
}

fn get_workspace_name(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getWorkspaceName", args, 0)?;
    s.core.ensure_live()?;
    Ok(Value::from(s.directory.workspace.as_str()))
}

fn impersonate(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity(IMPERSONATE, args, 1)?;
    let credentials = args[0]
        .as_credentials()
        .ok_or_else(|| SessionError::invalid_argument(IMPERSONATE, "argument 0 must be credentials"))?;
    s.impersonate(credentials).map(Value::Session)
}

fn is_live(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("isLive", args, 0)?;
    Ok(Value::Bool(s.is_live()))
}

fn logout(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("logout", args, 0)?;
    s.logout();
    Ok(Value::Null)
}

fn set_namespace_prefix(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity(SET_NAMESPACE_PREFIX, args, 2)?;
    s.core.ensure_live()?;
    let prefix = str_arg(SET_NAMESPACE_PREFIX, args, 0)?;
    let uri = str_arg(SET_NAMESPACE_PREFIX, args, 1)?;
    s.core
        .namespaces
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .set(prefix, uri)?;
    Ok(Value::Null)
}

fn get_namespace_prefix(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getNamespacePrefix", args, 1)?;
    s.core.ensure_live()?;
    let uri = str_arg("getNamespacePrefix", args, 0)?;
    s.core
        .namespaces()
        .get_prefix(uri)
        .map(Value::from)
        .ok_or_else(|| SessionError::Namespace(format!("no prefix for URI '{}'", uri)))
}

fn get_namespace_uri(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getNamespaceURI", args, 1)?;
    s.core.ensure_live()?;
    let prefix = str_arg("getNamespaceURI", args, 0)?;
    s.core
        .namespaces()
        .get_uri(prefix)
        .map(Value::from)
        .ok_or_else(|| SessionError::Namespace(format!("unknown prefix '{}'", prefix)))
}

fn get_namespace_prefixes(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getNamespacePrefixes", args, 0)?;
    s.core.ensure_live()?;
    Ok(Value::Strings(s.core.namespaces().prefixes()))
}

fn get_principals(s: &MemorySession, args: &[Value]) -> Result<Value, SessionError> {
    expect_arity("getPrincipals", args, 0)?;
    s.core.ensure_live()?;
    let mut principals = vec!["everyone".to_string()];
    if s.user_id() != ANONYMOUS_USER {
        principals.insert(0, s.user_id().to_string());
    }
    Ok(Value::Strings(principals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::repository::{MemoryRepository, RepositoryDefinition, UserDefinition};

    fn repository() -> MemoryRepository {
        let mut def = RepositoryDefinition::default();
        def.users.push(UserDefinition {
            id: "alice".to_string(),
            password: "alice".to_string(),
            admin: false,
            impersonators: vec!["bob".to_string()],
        });
        def.users.push(UserDefinition {
            id: "bob".to_string(),
            password: "bob".to_string(),
            admin: false,
            impersonators: Vec::new(),
        });
        MemoryRepository::new(def)
    }

    #[test]
    fn test_type_inherits_core_capabilities() {
        let ty = MemorySession::memory_session_type();
        let names: Vec<_> = ty.lineage().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["MemorySession", "SessionCore"]);
    }

    #[test]
    fn test_admin_may_impersonate_anyone() {
        let admin = repository().login(&Credentials::simple("admin", "admin")).unwrap();
        let alice = admin.impersonate(&Credentials::simple("alice", "")).unwrap();
        assert_eq!(alice.invoke("getUserID", &[]).unwrap().as_str(), Some("alice"));
    }

    #[test]
    fn test_listed_impersonator_allowed_others_denied() {
        let repo = repository();
        let bob = repo.login(&Credentials::simple("bob", "bob")).unwrap();
        assert!(bob.impersonate(&Credentials::simple("alice", "")).is_ok());

        let alice = repo.login(&Credentials::simple("alice", "alice")).unwrap();
        let err = alice.impersonate(&Credentials::simple("bob", "")).map(|_| ()).unwrap_err();
        assert!(matches!(err, SessionError::AccessDenied(_)));

        let err = alice.impersonate(&Credentials::simple("nobody", "")).map(|_| ()).unwrap_err();
        assert!(matches!(err, SessionError::Login(_)));
    }

    #[test]
    fn test_impersonation_carries_credential_attributes() {
        let admin = repository().login(&Credentials::simple("admin", "admin")).unwrap();
        let creds = Credentials::simple("alice", "").with_attribute("origin", serde_json::json!("cli"));
        let alice = admin.impersonate(&creds).unwrap();

        let attr = alice.invoke("getAttribute", &[Value::from("origin")]).unwrap();
        assert_eq!(attr.as_str(), Some("cli"));
        let names = alice.invoke("getAttributeNames", &[]).unwrap();
        assert_eq!(names.as_strings(), Some(&["origin".to_string()][..]));
    }

    #[test]
    fn test_logout_ends_session() {
        let admin = repository().login(&Credentials::simple("admin", "admin")).unwrap();
        admin.invoke("logout", &[]).unwrap();

        assert_eq!(admin.invoke("isLive", &[]).unwrap().as_bool(), Some(false));
        let err = admin.invoke("getUserID", &[]).unwrap_err();
        assert_eq!(err.into_cause(), SessionError::NotLive);
        assert!(matches!(
            admin.impersonate(&Credentials::Guest),
            Err(SessionError::NotLive)
        ));
    }

    #[test]
    fn test_raw_invoke_wraps_failures() {
        let admin = repository().login(&Credentials::simple("admin", "admin")).unwrap();
        let err = admin
            .invoke("getNamespaceURI", &[Value::from("missing")])
            .unwrap_err();
        assert!(err.is_invocation_wrapper());
        assert!(matches!(err.into_cause(), SessionError::Namespace(_)));
    }

    #[test]
    fn test_principals() {
        let repo = repository();
        let guest = repo.login(&Credentials::Guest).unwrap();
        let principals = guest.invoke("getPrincipals", &[]).unwrap();
        assert_eq!(principals.as_strings(), Some(&["everyone".to_string()][..]));

        let bob = repo.login(&Credentials::simple("bob", "bob")).unwrap();
        let principals = bob.invoke("getPrincipals", &[]).unwrap();
        assert_eq!(principals.as_strings().map(|p| p.len()), Some(2));
    }
}
