//! SMS one-time-code login and the session/identity gate.

pub mod identity;
pub mod otp;
pub mod router;
pub mod session;

pub use identity::{valid_national_id, valid_phone_number, CredentialViolation, Credentials};
pub use otp::{OtpError, OtpPolicy, OtpService, SmsError, SmsSender};
pub use router::{auth_router, AuthState};
pub use session::{
    AccessError, ActorRole, AdminCredentials, SessionContext, SessionGate, SessionSubject,
};
