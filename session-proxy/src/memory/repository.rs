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

//! In-memory repository: users, login and namespace prefix definition.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::constants::operations::SET_NAMESPACE_PREFIX;
use crate::core::errors::{ConfigError, SessionError};
use crate::core::session::{Repository, SessionHandle};
use crate::core::types::{Credentials, Value};
use crate::memory::session::MemorySession;

pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDefinition {
    pub id: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
    /// Users allowed to impersonate this one.
    #[serde(default)]
    pub impersonators: Vec<String>,
}

/// Declarative repository content, loadable from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDefinition {
    #[serde(default = "default_workspace")]
    pub workspace: String,
    #[serde(default = "default_true")]
    pub allow_anonymous: bool,
    #[serde(default)]
    pub users: Vec<UserDefinition>,
    /// Prefix -> URI mappings defined on impersonated sessions.
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
}

fn default_workspace() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RepositoryDefinition {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            allow_anonymous: true,
            users: vec![UserDefinition {
                id: "admin".to_string(),
                password: "admin".to_string(),
                admin: true,
                impersonators: Vec::new(),
            }],
            namespaces: BTreeMap::from([(
                "sling".to_string(),
                "http://sling.apache.org/jcr/sling/1.0".to_string(),
            )]),
        }
    }
}

/// User lookup shared by the repository and every session it creates.
#[derive(Debug)]
pub(crate) struct Directory {
    pub(crate) workspace: String,
    users: BTreeMap<String, UserDefinition>,
}

impl Directory {
    pub(crate) fn user(&self, id: &str) -> Option<&UserDefinition> {
        self.users.get(id)
    }

    pub(crate) fn is_admin(&self, id: &str) -> bool {
        self.user(id).map(|u| u.admin).unwrap_or(false)
    }
}

pub struct MemoryRepository {
    directory: Arc<Directory>,
    namespaces: BTreeMap<String, String>,
    allow_anonymous: bool,
}

impl MemoryRepository {
    pub fn new(definition: RepositoryDefinition) -> Self {
        let users = definition
            .users
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        Self {
            directory: Arc::new(Directory {
                workspace: definition.workspace,
                users,
            }),
            namespaces: definition.namespaces,
            allow_anonymous: definition.allow_anonymous,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let definition: RepositoryDefinition = serde_yaml_ng::from_str(yaml)?;
        Ok(Self::new(definition))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let repository = Self::from_yaml_str(&content)?;
        info!("Loaded repository definition from {}", path.display());
        Ok(repository)
    }

    pub fn workspace(&self) -> &str {
        &self.directory.workspace
    }

    /// Prefixes applied by [`Repository::define_namespace_prefixes`].
    pub fn namespace_prefixes(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    pub fn login(&self, credentials: &Credentials) -> Result<SessionHandle, SessionError> {
        let session = match credentials {
            Credentials::Simple {
                user_id,
                password,
                attributes,
            } => {
                let user = self
                    .directory
                    .user(user_id)
                    .filter(|u| &u.password == password)
                    .ok_or_else(|| SessionError::Login(format!("invalid credentials for '{}'", user_id)))?;
                MemorySession::open(Arc::clone(&self.directory), &user.id, attributes.clone())
            }
            Credentials::Guest => {
                if !self.allow_anonymous {
                    return Err(SessionError::Login("anonymous access is disabled".to_string()));
                }
                MemorySession::open(Arc::clone(&self.directory), ANONYMOUS_USER, BTreeMap::new())
            }
        };
        debug!(user = session.user_id(), session_id = %session.id(), "Login");
        Ok(Arc::new(session))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new(RepositoryDefinition::default())
    }
}

impl Repository for MemoryRepository {
    fn define_namespace_prefixes(&self, session: &SessionHandle) -> Result<(), SessionError> {
        for (prefix, uri) in &self.namespaces {
            session
                .invoke(
                    SET_NAMESPACE_PREFIX,
                    &[Value::from(prefix.as_str()), Value::from(uri.as_str())],
                )
                .map_err(SessionError::into_cause)?;
        }
        Ok(())
    }
}
