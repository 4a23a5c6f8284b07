pub mod booking;
pub mod review;
pub mod turf;
pub mod user;
