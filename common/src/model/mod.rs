pub mod donation;
pub mod financial;
pub mod user;
