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

//! Generic forwarding mechanism for backend sessions.
//!
//! A backend registers one handler per operation name, once per concrete
//! session type, and implements [`Session::invoke`](crate::core::session::Session::invoke)
//! by delegating to [`OperationTable::call`]. Handler failures come back
//! wrapped in [`SessionError::Invocation`]; the proxy strips that layer.

use std::collections::BTreeMap;

use crate::core::errors::SessionError;
use crate::core::types::Value;

pub type Handler<S> = fn(&S, &[Value]) -> Result<Value, SessionError>;

pub struct OperationTable<S> {
    type_name: &'static str,
    handlers: BTreeMap<&'static str, Handler<S>>,
}

impl<S> OperationTable<S> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            handlers: BTreeMap::new(),
        }
    }

    pub fn with(mut self, operation: &'static str, handler: Handler<S>) -> Self {
        self.handlers.insert(operation, handler);
        self
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn call(&self, target: &S, operation: &str, args: &[Value]) -> Result<Value, SessionError> {
        let handler = self
            .handlers
            .get(operation)
            .ok_or_else(|| SessionError::unsupported(operation, self.type_name))?;
        handler(target, args).map_err(|e| e.in_invocation(operation))
    }
}

/// Fail unless exactly `expected` arguments were passed.
pub fn expect_arity(operation: &str, args: &[Value], expected: usize) -> Result<(), SessionError> {
    if args.len() != expected {
        return Err(SessionError::invalid_argument(
            operation,
            format!("expected {} argument(s), got {}", expected, args.len()),
        ));
    }
    Ok(())
}

/// String argument at `index`.
pub fn str_arg<'a>(operation: &str, args: &'a [Value], index: usize) -> Result<&'a str, SessionError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            SessionError::invalid_argument(operation, format!("argument {} must be a string", index))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        base: i64,
    }

    fn add(c: &Counter, args: &[Value]) -> Result<Value, SessionError> {
        expect_arity("add", args, 1)?;
        let n = match &args[0] {
            Value::Data(v) => v.as_i64(),
            _ => None,
        }
        .ok_or_else(|| SessionError::invalid_argument("add", "not a number"))?;
        Ok(Value::Data(serde_json::json!(c.base + n)))
    }

    fn fail(_: &Counter, _: &[Value]) -> Result<Value, SessionError> {
        Err(SessionError::Repository("boom".to_string()))
    }

    fn table() -> OperationTable<Counter> {
        OperationTable::new("Counter").with("add", add).with("fail", fail)
    }

    #[test]
    fn test_call_dispatches_by_name() {
        let c = Counter { base: 40 };
        let res = table().call(&c, "add", &[Value::Data(serde_json::json!(2))]).unwrap();
        assert!(matches!(res, Value::Data(v) if v == serde_json::json!(42)));
    }

    #[test]
    fn test_handler_failure_is_wrapped() {
        let c = Counter { base: 0 };
        let err = table().call(&c, "fail", &[]).unwrap_err();
        match &err {
            SessionError::Invocation { operation, .. } => assert_eq!(operation, "fail"),
            other => panic!("Expected invocation wrapper, got {:?}", other),
        }
        assert_eq!(err.into_cause(), SessionError::Repository("boom".to_string()));
    }

    #[test]
    fn test_unknown_operation_is_not_wrapped() {
        let c = Counter { base: 0 };
        let err = table().call(&c, "missing", &[]).unwrap_err();
        assert!(matches!(err, SessionError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_arity_and_string_helpers() {
        let args = [Value::from("jcr"), Value::Null];
        assert!(expect_arity("op", &args, 2).is_ok());
        assert!(expect_arity("op", &args, 1).is_err());
        assert_eq!(str_arg("op", &args, 0).unwrap(), "jcr");
        assert!(str_arg("op", &args, 1).is_err());
        assert!(str_arg("op", &args, 5).is_err());
    }

    #[test]
    fn test_operations_listed_in_order() {
        let names: Vec<_> = table().operations().collect();
        assert_eq!(names, vec!["add", "fail"]);
    }
}
