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

//! Dispatch routing.
//!
//! Decides, for a single call on a proxy, whether it is the intercepted
//! impersonation, an ordinary forward, or outside the capability surface.

use crate::capability::CapabilitySet;
use crate::core::constants::operations::IMPERSONATE;
use crate::core::types::{Credentials, Value};

#[derive(Debug, PartialEq)]
pub enum Route<'a> {
    /// Single-credentials impersonation: derive, remap, re-wrap.
    Impersonate(&'a Credentials),
    /// Pass through to the delegate unchanged.
    Forward,
    /// No capability in the set declares the operation.
    Reject,
}

/// Route one call.
///
/// Single-credentials impersonation is matched on the operation alone, before
/// the capability set is consulted, so it takes the same path as
/// [`Session::impersonate`](crate::core::session::Session::impersonate) on a
/// proxy. Every other operation must be provided by some capability in the set.
pub fn route<'a>(capabilities: &CapabilitySet, operation: &str, args: &'a [Value]) -> Route<'a> {
    if operation == IMPERSONATE {
        if let [Value::Credentials(credentials)] = args {
            return Route::Impersonate(credentials);
        }
    }
    if capabilities.provides(operation) {
        Route::Forward
    } else {
        Route::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityDescriptor;

    fn caps() -> CapabilitySet {
        CapabilitySet::from_capabilities(vec![CapabilityDescriptor::builder("javax.jcr.Session")
            .operations(["impersonate", "logout"])
            .build()])
    }

    #[test]
    fn test_single_credentials_is_intercepted() {
        let args = [Value::Credentials(Credentials::simple("bob", "pw"))];
        assert_eq!(
            route(&caps(), "impersonate", &args),
            Route::Impersonate(&Credentials::simple("bob", "pw"))
        );
    }

    #[test]
    fn test_other_arities_are_forwarded() {
        let creds = Value::Credentials(Credentials::Guest);
        assert_eq!(route(&caps(), "impersonate", &[]), Route::Forward);
        assert_eq!(
            route(&caps(), "impersonate", &[creds.clone(), creds]),
            Route::Forward
        );
        assert_eq!(route(&caps(), "impersonate", &[Value::from("bob")]), Route::Forward);
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        assert_eq!(route(&caps(), "logout", &[]), Route::Forward);
        assert_eq!(route(&caps(), "getWorkspaceName", &[]), Route::Reject);
        assert_eq!(route(&CapabilitySet::empty(), "logout", &[]), Route::Reject);
    }

    #[test]
    fn test_impersonation_intercepted_without_declaring_capability() {
        let args = [Value::Credentials(Credentials::Guest)];
        assert_eq!(
            route(&CapabilitySet::empty(), "impersonate", &args),
            Route::Impersonate(&Credentials::Guest)
        );
        assert_eq!(route(&CapabilitySet::empty(), "impersonate", &[]), Route::Reject);
    }
}
