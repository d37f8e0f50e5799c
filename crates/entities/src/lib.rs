//! Core entity definitions for Gearbook.
//!
//! This crate defines the data types the Gearbook backend stores and
//! displays: devices with their embedded maintenance policy, the users
//! responsible for them, and the schedule views derived from both.

mod device;
mod user;

pub mod schedule;

pub use device::*;
pub use user::*;
