pub mod attendance;
pub mod employee;
pub mod leave_balance;
pub mod regularization;
pub mod shift;
