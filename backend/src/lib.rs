//! Event check-in service.
//!
//! An administrator uploads a roster, every attendee gets a token rendered as
//! a QR code, and scanning plus confirming that code records attendance.
//! [`manager`] holds the attendance rules; the remaining modules adapt it to
//! SQLite, CSV, QR images, cookie sessions and HTTP.

pub mod config;
pub mod error;
pub mod manager;
pub mod qr;
pub mod services;
pub mod session;
pub mod sheet;
pub mod state;
pub mod store;
pub mod token;
