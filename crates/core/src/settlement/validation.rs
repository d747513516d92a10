//! Blocking input checks run before every computation.

use rust_decimal::Decimal;

use crate::contract::LeaseContract;

use super::error::ValidationError;
use super::types::{SettlementRequest, SettlementType};

/// Validates a request against its contract.
///
/// # Errors
///
/// Returns the first blocking problem found.
pub fn validate_request(
    contract: &LeaseContract,
    request: &SettlementRequest,
) -> Result<(), ValidationError> {
    match request.settlement_type {
        SettlementType::MoveIn => {
            let move_in = request
                .move_in_date
                .ok_or(ValidationError::MissingMoveInDate)?;
            if move_in < contract.start_date {
                return Err(ValidationError::MoveInBeforeContractStart {
                    move_in,
                    contract_start: contract.start_date,
                });
            }
        }
        SettlementType::Monthly => {
            let contract_start = contract.first_period();
            if request.reference_period < contract_start {
                return Err(ValidationError::ReferenceBeforeContractStart {
                    period: request.reference_period,
                    contract_start,
                });
            }
        }
        SettlementType::Termination => {
            let termination = request
                .termination_date
                .ok_or(ValidationError::MissingTerminationDate)?;
            if termination < contract.start_date {
                return Err(ValidationError::TerminationBeforeContractStart {
                    termination,
                    contract_start: contract.start_date,
                });
            }
        }
    }

    non_negative("manual_discount", request.manual_discount)?;
    non_negative("manual_surcharge", request.manual_surcharge)?;
    Ok(())
}

fn non_negative(field: &'static str, amount: Decimal) -> Result<(), ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount { field, amount });
    }
    Ok(())
}
