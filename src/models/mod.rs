pub mod leave;
pub mod leave_balance;
pub mod outlet;
pub mod signup_request;
pub mod user;

pub use leave::{LeaveStatus, LeaveType};
pub use signup_request::SignupStatus;
pub use user::UserRole;
