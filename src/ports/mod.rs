pub mod book_service;
pub mod loan_store;
pub mod member_service;

pub use book_service::BookService;
pub use loan_store::{InsertOutcome, LoanStore, ReturnOutcome};
pub use member_service::MemberService;
