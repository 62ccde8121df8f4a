//! Outbound adapters implementing domain ports.

pub mod mail;
pub mod persistence;
