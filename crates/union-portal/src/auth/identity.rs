use serde::{Deserialize, Serialize};

/// Login credential pair collected before the one-time code is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub phone_number: String,
    pub national_id: String,
}

/// Local credential validation errors; raised before any collaborator call.
#[derive(Debug, thiserror::Error)]
pub enum CredentialViolation {
    #[error("national id failed checksum validation")]
    InvalidNationalId,
    #[error("phone number must be 11 digits starting with 09")]
    InvalidPhoneNumber,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), CredentialViolation> {
        if !valid_phone_number(&self.phone_number) {
            return Err(CredentialViolation::InvalidPhoneNumber);
        }
        if !valid_national_id(&self.national_id) {
            return Err(CredentialViolation::InvalidNationalId);
        }
        Ok(())
    }
}

/// Checksum validation for 10-digit national ids: the first nine digits are
/// weighted 10 down to 2, and the check digit must satisfy the mod-11 rule.
pub fn valid_national_id(id: &str) -> bool {
    if id.len() != 10 || !id.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = id.bytes().map(|b| u32::from(b - b'0')).collect();
    let check = digits[9];
    let sum: u32 = digits[..9]
        .iter()
        .enumerate()
        .map(|(index, digit)| digit * (10 - index as u32))
        .sum();

    let remainder = sum % 11;
    (remainder < 2 && check == remainder) || (remainder >= 2 && check == 11 - remainder)
}

/// Mobile numbers are 11 digits starting with 09.
pub fn valid_phone_number(phone: &str) -> bool {
    phone.len() == 11 && phone.starts_with("09") && phone.bytes().all(|b| b.is_ascii_digit())
}
