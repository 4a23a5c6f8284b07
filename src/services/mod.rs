pub mod availability;
pub mod booking;
pub mod ratings;
pub mod staging;
