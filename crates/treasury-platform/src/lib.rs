pub mod config;
pub mod contracts;

pub use config::{AdminCredentials, ServiceConfig};
pub use contracts::{
    AdminLoginRequest, AdminLoginResponse, AdminProfile, MessageResponse, SubmitPaymentResponse,
};
