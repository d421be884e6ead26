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

//! session-proxy: namespace-aware session impersonation.
//!
//! Wraps repository sessions in a delegating proxy. The proxy forwards every
//! operation to the real session except impersonation, where it also has the
//! repository define its namespace prefixes on the derived session and wraps
//! that session again, so the rule holds for any chain of impersonations.

pub mod capability;
pub mod config;
pub mod core;
pub mod memory;
pub mod proxy;

pub use crate::core::errors::SessionError;
pub use crate::core::session::{Repository, Session, SessionHandle};
pub use crate::core::types::{Credentials, Value};
pub use crate::proxy::{wrap, SessionProxy, SessionProxyFactory};
