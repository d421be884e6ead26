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

//! Domain error types.
//!
//! `SessionError` is shared by backends, repository collaborators and the
//! proxy, so a failure raised by a delegate reaches the caller as the very
//! same value.

use thiserror::Error;

/// Failure raised by a session, a repository collaborator or the proxy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Credentials were rejected at login.
    #[error("Login failed: {0}")]
    Login(String),

    /// The session is not allowed to perform the operation (includes
    /// rejected impersonation).
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Namespace prefix mapping could not be read or changed.
    #[error("Namespace error: {0}")]
    Namespace(String),

    /// Generic backend failure.
    #[error("Repository error: {0}")]
    Repository(String),

    /// The session has been logged out.
    #[error("Session is no longer live")]
    NotLive,

    /// Arguments do not match what the operation expects.
    #[error("Invalid argument for '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// The operation is not part of the session's capability surface.
    #[error("Operation '{operation}' is not supported by {session_type}")]
    UnsupportedOperation {
        operation: String,
        session_type: String,
    },

    /// Wrapper added by the generic forwarding mechanism around the failure
    /// of the operation it invoked. Never visible to callers of a proxy.
    #[error("Invocation of '{operation}' failed: {source}")]
    Invocation {
        operation: String,
        #[source]
        source: Box<SessionError>,
    },
}

impl SessionError {
    pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        SessionError::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(operation: &str, session_type: &str) -> Self {
        SessionError::UnsupportedOperation {
            operation: operation.to_string(),
            session_type: session_type.to_string(),
        }
    }

    /// Wrap `self` in an invocation layer for `operation`.
    pub fn in_invocation(self, operation: &str) -> Self {
        SessionError::Invocation {
            operation: operation.to_string(),
            source: Box::new(self),
        }
    }

    /// Strip every invocation layer and return the underlying failure.
    pub fn into_cause(self) -> Self {
        let mut err = self;
        while let SessionError::Invocation { source, .. } = err {
            err = *source;
        }
        err
    }

    pub fn is_invocation_wrapper(&self) -> bool {
        matches!(self, SessionError::Invocation { .. })
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse repository definition: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_cause_strips_nested_layers() {
        let cause = SessionError::AccessDenied("alice may not impersonate bob".to_string());
        let wrapped = cause
            .clone()
            .in_invocation("impersonate")
            .in_invocation("impersonate");

        assert!(wrapped.is_invocation_wrapper());
        assert_eq!(wrapped.into_cause(), cause);
    }

    #[test]
    fn test_into_cause_is_identity_without_wrapper() {
        let err = SessionError::NotLive;
        assert_eq!(err.clone().into_cause(), err);
    }

    #[test]
    fn test_invocation_message_names_operation() {
        let err = SessionError::Repository("disk full".to_string()).in_invocation("logout");
        let msg = err.to_string();
        assert!(msg.contains("logout"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_config_error_from_yaml() {
        let yaml_err = serde_yaml_ng::from_str::<Vec<String>>("{").unwrap_err();
        let err: ConfigError = yaml_err.into();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
