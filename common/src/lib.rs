//! Data model shared between the donation-intake server and its clients.

pub mod model;
pub mod requests;
pub mod responses;
