use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Manager,
    CareWorker,
}

impl Role {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Manager => "MANAGER",
            Role::CareWorker => "CARE_WORKER",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MANAGER" => Some(Role::Manager),
            "CARE_WORKER" => Some(Role::CareWorker),
            _ => None,
        }
    }

    /// Helper: accept CLI spellings (`manager`, `care-worker`, `careworker`, ...)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().replace('-', "_").as_str() {
            "MANAGER" | "M" => Some(Role::Manager),
            "CARE_WORKER" | "CAREWORKER" | "C" => Some(Role::CareWorker),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worker {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Caller identity as established by the authentication layer.
///
/// The engine never re-derives the role: whoever builds an `Identity`
/// vouches for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub worker_id: String,
    pub role: Role,
    pub email: String,
    pub display_name: String,
}

/// Proof that the holder may reconfigure the perimeter.
///
/// Only obtainable through [`Identity::perimeter_admin`].
#[derive(Debug)]
pub struct PerimeterAdmin {
    manager_id: String,
}

impl PerimeterAdmin {
    pub fn manager_id(&self) -> &str {
        &self.manager_id
    }
}

impl Identity {
    pub fn new(worker_id: &str, role: Role, email: &str, display_name: &str) -> AppResult<Self> {
        let worker_id = worker_id.trim();
        if worker_id.is_empty() {
            return Err(AppError::Validation("worker id must not be empty".into()));
        }

        let email = email.trim().to_string();
        let display_name = match display_name.trim() {
            "" => email
                .split('@')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(worker_id)
                .to_string(),
            name => name.to_string(),
        };

        Ok(Self {
            worker_id: worker_id.to_string(),
            role,
            email,
            display_name,
        })
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    pub fn require_manager(&self) -> AppResult<()> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "'{}' is not a manager",
                self.worker_id
            )))
        }
    }

    pub fn perimeter_admin(&self) -> AppResult<PerimeterAdmin> {
        self.require_manager()?;
        Ok(PerimeterAdmin {
            manager_id: self.worker_id.clone(),
        })
    }
}
