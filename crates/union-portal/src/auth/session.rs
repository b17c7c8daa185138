use std::collections::HashMap;
use std::sync::Mutex;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::unions::domain::UnionId;

use super::identity::Credentials;

/// Role claim attached to a session at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Union,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            ActorRole::Admin => "admin",
            ActorRole::Union => "union",
        }
    }
}

/// Authenticated subject carried by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSubject {
    pub national_id: String,
    pub phone_number: String,
    pub role: ActorRole,
}

/// Explicit session object: created on successful code verification, torn
/// down on logout. Handlers read the role from here, never by re-comparing
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub access_token: String,
    pub refresh_token: String,
    pub subject: SessionSubject,
    pub issued_at: DateTime<Utc>,
    pub union: Option<UnionId>,
}

/// Reserved credential pair mapped to the admin role at issuance. This is
/// deployment policy fed from configuration, not something request handlers
/// compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub phone_number: String,
    pub national_id: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            phone_number: "09000000000".to_string(),
            national_id: "0000000000".to_string(),
        }
    }
}

/// Access failures at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("session not found or expired")]
    UnknownToken,
    #[error("insufficient role for this resource")]
    Forbidden,
}

/// Issues bearer tokens and resolves them back to session contexts. The
/// store is mutated only here: establish, attach-union, terminate.
pub struct SessionGate {
    admin: AdminCredentials,
    sessions: Mutex<HashMap<String, SessionContext>>,
}

impl SessionGate {
    pub fn new(admin: AdminCredentials) -> Self {
        Self {
            admin,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Mint a session after the one-time code has been verified. The role
    /// claim is decided here from the configured reserved pair.
    pub fn establish(&self, credentials: &Credentials, now: DateTime<Utc>) -> SessionContext {
        let role = if credentials.phone_number == self.admin.phone_number
            && credentials.national_id == self.admin.national_id
        {
            ActorRole::Admin
        } else {
            ActorRole::Union
        };

        let context = SessionContext {
            access_token: Uuid::new_v4().simple().to_string(),
            refresh_token: Uuid::new_v4().simple().to_string(),
            subject: SessionSubject {
                national_id: credentials.national_id.clone(),
                phone_number: credentials.phone_number.clone(),
                role,
            },
            issued_at: now,
            union: None,
        };

        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(context.access_token.clone(), context.clone());
        context
    }

    pub fn resolve(&self, token: &str) -> Option<SessionContext> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .cloned()
    }

    /// Link the session to its union record, e.g. after login lookup or a
    /// successful registration.
    pub fn attach_union(&self, token: &str, union: UnionId) {
        if let Some(context) = self
            .sessions
            .lock()
            .expect("session mutex poisoned")
            .get_mut(token)
        {
            context.union = Some(union);
        }
    }

    /// Tear the session down; returns whether a session existed.
    pub fn terminate(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .remove(token)
            .is_some()
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<SessionContext, AccessError> {
        let token = bearer_token(headers).ok_or(AccessError::MissingToken)?;
        self.resolve(&token).ok_or(AccessError::UnknownToken)
    }

    pub fn authorize_role(
        &self,
        headers: &HeaderMap,
        role: ActorRole,
    ) -> Result<SessionContext, AccessError> {
        let context = self.authorize(headers)?;
        if context.subject.role != role {
            return Err(AccessError::Forbidden);
        }
        Ok(context)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}
