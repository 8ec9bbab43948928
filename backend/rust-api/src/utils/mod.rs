pub mod regression;
pub mod retry;
