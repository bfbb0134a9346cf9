mod errors;
mod loan_service;
mod validation;

pub use errors::{ErrorKind, LoanApplicationError, Result};
pub use loan_service::{ServiceDependencies, create_loan, get_loan, list_loans, return_loan};
pub use validation::parse_identifier;
