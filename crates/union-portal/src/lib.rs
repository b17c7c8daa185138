//! Trade-union registration portal: SMS one-time-code authentication,
//! registration intake and approval, financial-data submission, and the
//! statutory audit-requirement assessment.

pub mod auth;
pub mod config;
pub mod error;
pub mod extraction;
pub mod telemetry;
pub mod unions;
