use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Session token, only present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn accepted(token: String) -> Self {
        Self {
            success: true,
            message: "Login successful".to_string(),
            token: Some(token),
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            message: "Incorrect password".to_string(),
            token: None,
        }
    }
}
