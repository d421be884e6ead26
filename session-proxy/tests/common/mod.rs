// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use session_proxy::capability::{
    Capability, CapabilityDescriptor, CapabilityResolver, SessionType,
};
use session_proxy::{Credentials, Repository, Session, SessionError, SessionHandle, SessionProxyFactory, Value};

pub static FAKE_CAPABILITY: Lazy<Capability> = Lazy::new(|| {
    CapabilityDescriptor::builder("test.Session")
        .operations(["echo", "fail", "failPlain", "label", "impersonate"])
        .build()
});

pub static OTHER_CAPABILITY: Lazy<Capability> = Lazy::new(|| {
    CapabilityDescriptor::builder("test.OtherSession")
        .extends(&FAKE_CAPABILITY)
        .operation("other")
        .build()
});

pub static FAKE_TYPE: Lazy<Arc<SessionType>> =
    Lazy::new(|| SessionType::of::<FakeSession>().implements(&FAKE_CAPABILITY).build());

/// Marker for a second concrete session type.
pub struct OtherSession;

pub static OTHER_TYPE: Lazy<Arc<SessionType>> =
    Lazy::new(|| SessionType::of::<OtherSession>().implements(&OTHER_CAPABILITY).build());

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Session that records what it is asked to do.
pub struct FakeSession {
    pub label: String,
    pub session_type: Arc<SessionType>,
    pub log: CallLog,
    pub deny_impersonation: bool,
    /// Type reported by sessions derived through impersonation.
    pub derived_type: Arc<SessionType>,
}

impl FakeSession {
    pub fn new(label: &str, log: &CallLog) -> Self {
        Self {
            label: label.to_string(),
            session_type: Arc::clone(&FAKE_TYPE),
            log: Arc::clone(log),
            deny_impersonation: false,
            derived_type: Arc::clone(&FAKE_TYPE),
        }
    }

    pub fn handle(self) -> SessionHandle {
        Arc::new(self)
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl Session for FakeSession {
    fn session_type(&self) -> Arc<SessionType> {
        Arc::clone(&self.session_type)
    }

    fn invoke(&self, operation: &str, args: &[Value]) -> Result<Value, SessionError> {
        if operation == "label" {
            return Ok(Value::from(self.label.as_str()));
        }
        self.record(format!("{}:invoke:{}:{}", self.label, operation, args.len()));
        match operation {
            "echo" => Ok(args.first().cloned().unwrap_or(Value::Null)),
            "fail" => Err(SessionError::Repository(format!("{} failed", self.label))
                .in_invocation("fail")
                .in_invocation("fail")),
            "failPlain" => Err(SessionError::AccessDenied("plain".to_string())),
            "impersonate" => Ok(Value::Data(serde_json::json!(args.len()))),
            "other" => Ok(Value::from("other")),
            _ => Err(SessionError::unsupported(operation, self.session_type.name())),
        }
    }

    fn impersonate(&self, credentials: &Credentials) -> Result<SessionHandle, SessionError> {
        let user = credentials.user_id().unwrap_or("guest").to_string();
        self.record(format!("{}:impersonate:{}", self.label, user));
        if self.deny_impersonation {
            return Err(SessionError::AccessDenied(format!("{} denied", user)));
        }
        Ok(Arc::new(FakeSession {
            label: user,
            session_type: Arc::clone(&self.derived_type),
            log: Arc::clone(&self.log),
            deny_impersonation: false,
            derived_type: Arc::clone(&self.derived_type),
        }))
    }
}

/// Repository that records which sessions got their prefixes defined.
pub struct RecordingRepository {
    pub log: CallLog,
    pub fail: bool,
}

impl RecordingRepository {
    pub fn new(log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::clone(log),
            fail: false,
        })
    }

    pub fn failing(log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::clone(log),
            fail: true,
        })
    }
}

impl Repository for RecordingRepository {
    fn define_namespace_prefixes(&self, session: &SessionHandle) -> Result<(), SessionError> {
        let label = session.invoke("label", &[])?;
        self.log
            .lock()
            .unwrap()
            .push(format!("define:{}", label.as_str().unwrap_or("?")));
        if self.fail {
            return Err(SessionError::Namespace("prefix store unavailable".to_string()));
        }
        Ok(())
    }
}

/// Factory with its own resolver so tests don't share cache state.
pub fn factory(repository: Arc<dyn Repository>) -> SessionProxyFactory {
    SessionProxyFactory::with_resolver(repository, Arc::new(CapabilityResolver::default()))
}

pub fn label_of(session: &SessionHandle) -> String {
    session
        .invoke("label", &[])
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn count(log: &CallLog, prefix: &str) -> usize {
    entries(log).iter().filter(|e| e.starts_with(prefix)).count()
}
