// Data models for the Bank Account Data REST resources

pub mod account;
pub mod agreement;
pub mod institution;
pub mod requisition;

pub use account::{AccountBalance, AccountData, AccountDetails, Balance, BalanceAmount, BalanceData};
pub use agreement::{Agreement, AgreementRequest};
pub use institution::Institution;
pub use requisition::{Requisition, RequisitionRequest};
