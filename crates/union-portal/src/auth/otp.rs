use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::identity::{Credentials, CredentialViolation};

/// Delivery collaborator for one-time codes (e.g. an SMS gateway adapter).
pub trait SmsSender: Send + Sync {
    fn send(&self, phone_number: &str, code: &str) -> Result<(), SmsError>;
}

/// Delivery failure; the caller keeps its pre-call state and may retry.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("sms transport unavailable: {0}")]
    Transport(String),
}

/// Issuance dials: codes expire after five minutes and a resend is refused
/// until the cooldown has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    pub resend_cooldown_secs: i64,
    pub code_ttl_secs: i64,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            resend_cooldown_secs: 120,
            code_ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone)]
struct IssuedCode {
    code: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Error raised by the one-time-code flow.
#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error(transparent)]
    Credential(#[from] CredentialViolation),
    #[error("code already sent; retry in {remaining_secs}s")]
    ResendCooldown { remaining_secs: i64 },
    #[error("invalid or expired code")]
    InvalidCode,
    #[error(transparent)]
    Delivery(#[from] SmsError),
}

/// Issues and verifies 6-digit login codes keyed by phone number.
pub struct OtpService<S> {
    sender: Arc<S>,
    policy: OtpPolicy,
    codes: Mutex<HashMap<String, IssuedCode>>,
}

impl<S> OtpService<S>
where
    S: SmsSender,
{
    pub fn new(sender: Arc<S>, policy: OtpPolicy) -> Self {
        Self {
            sender,
            policy,
            codes: Mutex::new(HashMap::new()),
        }
    }

    /// Validate the credentials locally, then generate and deliver a code.
    pub fn send_code(
        &self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        credentials.validate()?;

        let mut codes = self.codes.lock().expect("otp mutex poisoned");
        if let Some(existing) = codes.get(&credentials.phone_number) {
            let elapsed = (now - existing.issued_at).num_seconds();
            if elapsed < self.policy.resend_cooldown_secs {
                return Err(OtpError::ResendCooldown {
                    remaining_secs: self.policy.resend_cooldown_secs - elapsed,
                });
            }
        }

        let code = generate_code();
        self.sender.send(&credentials.phone_number, &code)?;
        codes.insert(
            credentials.phone_number.clone(),
            IssuedCode {
                code,
                issued_at: now,
                expires_at: now + Duration::seconds(self.policy.code_ttl_secs),
            },
        );
        Ok(())
    }

    /// Consume a matching unexpired code. Mismatch and expiry collapse into
    /// one recoverable error so callers cannot probe which code was issued.
    pub fn verify_code(
        &self,
        credentials: &Credentials,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        credentials.validate()?;

        let mut codes = self.codes.lock().expect("otp mutex poisoned");
        match codes.get(&credentials.phone_number) {
            Some(issued) if issued.code == code && now < issued.expires_at => {
                codes.remove(&credentials.phone_number);
                Ok(())
            }
            _ => Err(OtpError::InvalidCode),
        }
    }
}

fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{value:06}")
}
