pub mod balances;
pub mod leaves;
pub mod outlets;
pub mod signups;
pub mod stats;
pub mod users;
