use std::{collections::HashMap, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, bail};
use chrono::FixedOffset;
use rust_decimal::Decimal;
use tracing::warn;
use treasury_core::SocietyProfile;

pub const DEFAULT_ADMIN_NAME: &str = "Apartment Treasurer";
pub const DEFAULT_ADMIN_ID: &str = "admin-1";

/// The treasurer's login. Compared as-is; there is a single admin.
#[derive(Clone)]
pub struct AdminCredentials {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl AdminCredentials {
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub http_addr: String,
    pub jwt_secret: String,
    pub admin: AdminCredentials,
    pub upload_dir: PathBuf,
    pub society: SocietyProfile,
    pub ping_message: String,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(default_http_addr: &str, vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| vars.get(key).cloned())
    }

    fn from_lookup(
        default_http_addr: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{key} is required"))
        };

        let jwt_secret = required("TREASURY_JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            warn!("TREASURY_JWT_SECRET is shorter than 32 bytes");
        }

        let admin = AdminCredentials {
            id: DEFAULT_ADMIN_ID.to_string(),
            email: required("TREASURY_ADMIN_EMAIL")?,
            password: required("TREASURY_ADMIN_PASSWORD")?,
            name: lookup("TREASURY_ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
        };

        let defaults = SocietyProfile::default();
        let total_flats = parse_or("TREASURY_TOTAL_FLATS", &lookup, defaults.total_flats)?;
        if total_flats <= 0 {
            bail!("TREASURY_TOTAL_FLATS must be positive");
        }
        let maintenance_per_flat = parse_or(
            "TREASURY_MAINTENANCE_PER_FLAT",
            &lookup,
            defaults.maintenance_per_flat,
        )?;
        if maintenance_per_flat < Decimal::ZERO {
            bail!("TREASURY_MAINTENANCE_PER_FLAT must be non-negative");
        }
        let offset_minutes: i32 = parse_or("TREASURY_UTC_OFFSET_MINUTES", &lookup, 0)?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("TREASURY_UTC_OFFSET_MINUTES is out of range")?;

        Ok(Self {
            http_addr: lookup("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string()),
            jwt_secret,
            admin,
            upload_dir: lookup("TREASURY_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            society: SocietyProfile {
                total_flats,
                maintenance_per_flat,
                utc_offset,
            },
            ping_message: lookup("PING_MESSAGE").unwrap_or_else(|| "ping".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow::anyhow!("{key} is invalid: {err}")),
        None => Ok(default),
    }
}
