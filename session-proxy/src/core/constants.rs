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

//! session-proxy constants - single source of truth for names shared between
//! the proxy, the capability resolver, the in-memory backend and the CLI.

/// Operation names with special meaning to the proxy.
pub mod operations {
    /// The only operation the proxy intercepts.
    pub const IMPERSONATE: &str = "impersonate";
    /// Used by repositories to (re)define a session-local prefix mapping.
    pub const SET_NAMESPACE_PREFIX: &str = "setNamespacePrefix";
}

/// Capability discovery
pub mod capability {
    /// Pre-JCR 2.0 capability family. Superseded by the standard `javax.jcr`
    /// interfaces and never advertised by a proxy.
    pub const LEGACY_JSR283_PREFIX: &str = "org.apache.jackrabbit.api.jsr283";
}

/// Configuration environment variables
pub mod config {
    pub const ENV_LOG_LEVEL: &str = "SESSION_PROXY_LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "SESSION_PROXY_LOG_FORMAT";
    pub const ENV_EXCLUDED_PREFIXES: &str = "SESSION_PROXY_EXCLUDED_PREFIXES";
    pub const ENV_REPOSITORY_YAML: &str = "SESSION_PROXY_REPOSITORY_YAML";

    pub const DEFAULT_LOG_LEVEL: &str = "info";
    pub const DEFAULT_LOG_FORMAT: &str = "text";
}
