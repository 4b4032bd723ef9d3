//! Wire models shared between the check-in backend and its clients.

pub mod model;
pub mod requests;
pub mod responses;
