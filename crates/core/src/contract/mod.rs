//! Lease contract data consumed by the settlement engine.

pub mod period;
pub mod types;

pub use period::YearMonth;
pub use types::{
    AnticipationFlags, ContractCharges, ContractSummary, InstallmentWindow, LandlordShare,
    LeaseContract, ReceiptMethod, RetentionFlags,
};
