//! Value generators for common data types and patterns
//!
//! This module provides generators for:
//! - Text (random strings)
//! - Numeric types (integers, floats)
//! - Booleans
//! - Domain types (UUIDs, hex)
//! - Network types (emails)
//! - Finance (card numbers)
//! - DateTime (chrono date-times)
//! - Person names

pub mod boolean;
pub mod datetime;
pub mod domain;
pub mod finance;
pub mod network;
pub mod numeric;
pub mod person;
pub mod text;
