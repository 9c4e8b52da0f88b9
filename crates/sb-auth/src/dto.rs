use super::*;
use sb_core::Unique;
use serde::Deserialize;
use serde::Serialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<&Member> for UserInfo {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id().to_string(),
            email: member.email().to_string(),
            is_active: member.active(),
            is_superuser: member.superuser(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub success: bool,
    pub message: &'static str,
}

impl Status {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
