//! Shared utilities: IPv4 address helpers.

pub mod ip_utils;

pub use ip_utils::{mask_to_cidr_suffix, to_decimal, AddressError};
