//! IPv4 helpers for decimal conversion and subnet mask lookup.

use std::net::Ipv4Addr;

/// Errors produced by the address helpers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    #[error("Unknown subnet mask: {0}")]
    UnknownMask(String),
}

/// Canonical dotted masks, indexed by prefix length
const CIDR_MASKS: [&str; 33] = [
    "0.0.0.0",
    "128.0.0.0",
    "192.0.0.0",
    "224.0.0.0",
    "240.0.0.0",
    "248.0.0.0",
    "252.0.0.0",
    "254.0.0.0",
    "255.0.0.0",
    "255.128.0.0",
    "255.192.0.0",
    "255.224.0.0",
    "255.240.0.0",
    "255.248.0.0",
    "255.252.0.0",
    "255.254.0.0",
    "255.255.0.0",
    "255.255.128.0",
    "255.255.192.0",
    "255.255.224.0",
    "255.255.240.0",
    "255.255.248.0",
    "255.255.252.0",
    "255.255.254.0",
    "255.255.255.0",
    "255.255.255.128",
    "255.255.255.192",
    "255.255.255.224",
    "255.255.255.240",
    "255.255.255.248",
    "255.255.255.252",
    "255.255.255.254",
    "255.255.255.255",
];

/// Convert a dotted-quad address to its big-endian 32-bit value
///
/// # Examples
/// ```
/// use ospf2dot::utils::ip_utils::to_decimal;
///
/// assert_eq!(to_decimal("10.0.0.1"), Ok(167772161));
/// assert!(to_decimal("10.0.0").is_err());
/// ```
pub fn to_decimal(ip: &str) -> Result<u32, AddressError> {
    ip.trim()
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| AddressError::InvalidAddress(ip.to_string()))
}

/// Look up the prefix length of a canonical dotted mask
pub fn mask_to_prefix_len(mask: &str) -> Result<u8, AddressError> {
    CIDR_MASKS
        .iter()
        .position(|candidate| *candidate == mask)
        .map(|len| len as u8)
        .ok_or_else(|| AddressError::UnknownMask(mask.to_string()))
}

/// Map a dotted mask to its CIDR suffix, e.g. `255.255.255.0` -> `/24`
pub fn mask_to_cidr_suffix(mask: &str) -> Result<String, AddressError> {
    mask_to_prefix_len(mask).map(|len| format!("/{}", len))
}

/// Format a network and dotted mask in CIDR notation
pub fn to_cidr(network: Ipv4Addr, mask: Ipv4Addr) -> Result<String, AddressError> {
    let suffix = mask_to_cidr_suffix(&mask.to_string())?;
    Ok(format!("{}{}", network, suffix))
}
