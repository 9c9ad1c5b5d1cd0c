// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation helpers for outgoing requests

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate a balance credit; the amount must be finite and positive
pub fn validate_add_balance_request(request: &AddBalanceRequest) -> Result<(), ApiContractError> {
    if !request.amount.is_finite() {
        return Err(ApiContractError::InvalidAmount(request.amount));
    }
    request.validate()?;
    Ok(())
}

/// Validate a password change; both passwords must be non-empty
pub fn validate_change_password_request(
    request: &ChangePasswordRequest,
) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_add_balance_request() {
        assert!(validate_add_balance_request(&AddBalanceRequest { amount: 10.0 }).is_ok());
        assert!(validate_add_balance_request(&AddBalanceRequest { amount: 0.0 }).is_err());
        assert!(validate_add_balance_request(&AddBalanceRequest { amount: -5.0 }).is_err());
        assert!(matches!(
            validate_add_balance_request(&AddBalanceRequest { amount: f64::NAN }),
            Err(ApiContractError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_validate_change_password_request() {
        let valid = ChangePasswordRequest {
            current_password: "old".to_string(),
            new_password: "new".to_string(),
        };
        assert!(validate_change_password_request(&valid).is_ok());

        let missing = ChangePasswordRequest {
            current_password: String::new(),
            new_password: "new".to_string(),
        };
        assert!(matches!(
            validate_change_password_request(&missing),
            Err(ApiContractError::Validation(_))
        ));
    }
}
