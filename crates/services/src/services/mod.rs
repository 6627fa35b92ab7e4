pub mod approval_validator;
pub mod booking_approval;
pub mod config;
pub mod notification;
