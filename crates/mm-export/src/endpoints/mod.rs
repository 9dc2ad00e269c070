pub mod setup;
pub mod teams;
pub mod users;
