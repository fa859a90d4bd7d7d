// Business resources of the Bank Account Data API
// Each call obtains an authorized request from the client and decodes the response

mod accounts;
mod agreements;
mod institutions;
mod requisitions;

/// Country used when listing institutions without an explicit one
pub const DEFAULT_COUNTRY: &str = "gb";

/// Balance type reported when none is requested
pub const DEFAULT_BALANCE_TYPE: &str = "interimAvailable";
