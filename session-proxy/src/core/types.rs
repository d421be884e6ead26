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

//! Session value types.
//!
//! Arguments and results travel through the generic dispatch path as
//! [`Value`]s. Sessions are a first-class variant so an operation can return
//! a derived session, and credentials are kept typed so impersonation can be
//! recognised without inspecting payloads.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::session::SessionHandle;

/// Credentials used to log in or to impersonate another user.
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// User id and password, plus free-form attributes that end up on the
    /// resulting session.
    Simple {
        user_id: String,
        password: String,
        attributes: BTreeMap<String, serde_json::Value>,
    },
    /// Anonymous access.
    Guest,
}

impl Credentials {
    pub fn simple(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Simple {
            user_id: user_id.into(),
            password: password.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute. No-op on guest credentials.
    pub fn with_attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        if let Credentials::Simple { attributes, .. } = &mut self {
            attributes.insert(name.into(), value);
        }
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Credentials::Simple { user_id, .. } => Some(user_id),
            Credentials::Guest => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Simple {
                user_id,
                attributes,
                ..
            } => f
                .debug_struct("Simple")
                .field("user_id", user_id)
                .field("password", &"<redacted>")
                .field("attributes", attributes)
                .finish(),
            Credentials::Guest => f.write_str("Guest"),
        }
    }
}

/// Argument or result of a session operation.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Data(serde_json::Value),
    Strings(Vec<String>),
    Credentials(Credentials),
    Session(SessionHandle),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Data(serde_json::Value::String(s.into()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Data(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Value::Strings(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_credentials(&self) -> Option<&Credentials> {
        match self {
            Value::Credentials(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_session(&self) -> Option<&SessionHandle> {
        match self {
            Value::Session(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_session(self) -> Option<SessionHandle> {
        match self {
            Value::Session(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Data(v) => f.debug_tuple("Data").field(v).finish(),
            Value::Strings(v) => f.debug_tuple("Strings").field(v).finish(),
            Value::Credentials(c) => f.debug_tuple("Credentials").field(c).finish(),
            Value::Session(s) => f
                .debug_tuple("Session")
                .field(&s.session_type().name())
                .finish(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Data(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Credentials> for Value {
    fn from(c: Credentials) -> Self {
        Value::Credentials(c)
    }
}

impl From<SessionHandle> for Value {
    fn from(s: SessionHandle) -> Self {
        Value::Session(s)
    }
}
