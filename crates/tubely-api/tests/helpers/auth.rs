use chrono::Duration;
use tubely_api::auth::jwt::make_jwt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret!";

/// A caller with a valid access token.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let token = make_jwt(id, TEST_JWT_SECRET, Duration::hours(1)).expect("Failed to sign token");
        Self { id, token }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
