//! Background maintenance for the event share store.
//!
//! The worker periodically removes share links long past their expiry and
//! purges trash that has outlived its retention window.

pub mod config;
pub mod retention;
