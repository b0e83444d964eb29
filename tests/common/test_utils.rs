#![allow(dead_code)]

use async_trait::async_trait;
use flight_school_gateway::config::AppConfig;
use flight_school_gateway::models::user::UserRole;
use flight_school_gateway::services::persistence::{
    BackendCall, BackendError, HttpMethod, PersistenceApi,
};
use flight_school_gateway::services::recorder::RecorderConfig;
use flight_school_gateway::utils::jwt::{issue_token, SchoolContext};
use serde_json::Value;
use std::sync::Mutex;

pub const TEST_SECRET: &str = "flight-school-test-secret";
pub const TEST_SCHOOL: &str = "school-1";

type Reply = Result<Value, BackendError>;

/// In-memory persistence API: records every call and answers from a list
/// of canned replies keyed by method and path.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<BackendCall>>,
    replies: Mutex<Vec<(HttpMethod, String, Reply)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // Later replies for the same route win
    pub fn reply(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .push((method, path.to_string(), reply));
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> BackendCall {
        self.calls().pop().expect("no backend call was made")
    }
}

#[async_trait]
impl PersistenceApi for FakeBackend {
    async fn send(&self, call: BackendCall) -> Result<Value, BackendError> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(method, path, _)| *method == call.method && *path == call.path)
            .map(|(_, _, reply)| reply.clone())
            .unwrap_or(Ok(Value::Null));

        self.calls.lock().unwrap().push(call);
        reply
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        backend_api_url: "http://backend.test".to_string(),
        backend_timeout_secs: 5,
        jwt_secret: TEST_SECRET.to_string(),
        recorder: RecorderConfig::default(),
    }
}

pub fn token_for(role: UserRole) -> String {
    issue_token("user-1", TEST_SCHOOL, role, TEST_SECRET).expect("Failed to issue test token")
}

pub fn context_for(role: UserRole) -> SchoolContext {
    SchoolContext {
        user_id: "user-1".to_string(),
        school_id: TEST_SCHOOL.to_string(),
        role,
        token: token_for(role),
    }
}
