pub mod booking;
pub mod booking_activity;
pub mod caterer;
pub mod meal_job;
pub mod room;
pub mod space;
