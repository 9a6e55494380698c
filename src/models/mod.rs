pub mod seat;
pub mod user;

pub use seat::Seat;
pub use user::User;
