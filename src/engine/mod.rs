pub mod errors;
pub mod operation;
pub mod session;
pub mod types;
