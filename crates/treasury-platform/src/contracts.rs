use serde::{Deserialize, Serialize};
use treasury_core::PaymentRecord;

use crate::config::AdminCredentials;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&AdminCredentials> for AdminProfile {
    fn from(admin: &AdminCredentials) -> Self {
        Self {
            id: admin.id.clone(),
            email: admin.email.clone(),
            name: admin.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPaymentResponse {
    pub message: String,
    pub payment: PaymentRecord,
}

/// `{ "message": ... }`, used for errors and the liveness echoes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
