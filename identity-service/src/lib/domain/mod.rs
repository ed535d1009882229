pub mod account;
pub mod deadline;
pub mod session;
