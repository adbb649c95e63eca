//! Dotted-decimal address codec and mask arithmetic.
//!
//! Addresses are plain `u32` values; the helpers here convert them to and from
//! `a.b.c.d` text and compute network / broadcast addresses for a mask length.

use crate::error::{PrefixError, Result};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Highest IPv4 address, the boundary of the root block.
pub const MAX_ADDRESS: u32 = u32::MAX;

lazy_static! {
    static ref DOTTED: Regex =
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)\.(\d+)$").expect("Invalid Regex?");
}

/// Render an address as four decimal octets.
///
/// # Examples
/// ```
/// use netbuilder_prefix::models::encode;
/// assert_eq!(encode(0x0A000001), "10.0.0.1");
/// ```
pub fn encode(addr: u32) -> String {
    addr.to_be_bytes().iter().join(".")
}

/// Parse `a.b.c.d` into an address.
///
/// Exactly four groups of ASCII digits, each in 0..=255. Anything else,
/// including surrounding whitespace, is a [`PrefixError::Format`].
pub fn decode(text: &str) -> Result<u32> {
    let caps = DOTTED
        .captures(text)
        .ok_or_else(|| PrefixError::Format(format!("malformed dotted decimal address '{text}'")))?;

    let mut addr: u32 = 0;
    for group in caps.iter().skip(1).flatten() {
        let octet = group
            .as_str()
            .parse::<u8>()
            .map_err(|_| PrefixError::Format(format!("octet '{}' out of range in '{text}'", group.as_str())))?;
        addr = (addr << 8) | u32::from(octet);
    }
    Ok(addr)
}

/// Convert a CIDR prefix length to a subnet mask.
///
/// # Examples
/// ```
/// use netbuilder_prefix::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        Err(PrefixError::Value(format!("mask length {len} is longer than {MAX_LENGTH}")))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Number of addresses in a block of the given length, `2^(32-len)`.
pub fn block_size(len: u8) -> Result<u64> {
    if len > MAX_LENGTH {
        return Err(PrefixError::Value(format!("mask length {len} is longer than {MAX_LENGTH}")));
    }
    Ok(1u64 << (MAX_LENGTH - len))
}

/// Get the network address for a given address and prefix length.
pub fn cut_addr(addr: u32, len: u8) -> Result<u32> {
    Ok(addr & get_cidr_mask(len)?)
}

/// Calculate the broadcast address for a given address and prefix length.
pub fn broadcast_addr(addr: u32, len: u8) -> Result<u32> {
    let mask = get_cidr_mask(len)?;
    Ok((addr & mask) | !mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(0), "0.0.0.0");
        assert_eq!(encode(u32::MAX), "255.255.255.255");
        assert_eq!(encode(0xA9FEFE01), "169.254.254.1");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("192.168.1.42").unwrap(), 0xC0A8012A);
        assert_eq!(decode("0.0.0.0").unwrap(), 0);
        assert_eq!(decode("010.0.0.1").unwrap(), 0x0A000001);
    }

    #[test]
    fn test_decode_format_errors() {
        for bad in [
            "10.0.0",
            "10.0.0.256",
            "10.0.0.0.0",
            " 10.0.0.1",
            "10.0.0.1 ",
            "10..0.1",
            "10.0.0.-1",
            "10.0.0.+1",
            "a.b.c.d",
            "",
            "10.0.0.99999999999",
        ] {
            assert!(
                matches!(decode(bad), Err(PrefixError::Format(_))),
                "expected format error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(31).unwrap(), 0xFFFFFFFE);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(matches!(get_cidr_mask(33), Err(PrefixError::Value(_))));
    }

    #[test]
    fn test_cut_and_broadcast() {
        let ip = decode("192.168.1.42").unwrap();
        assert_eq!(encode(cut_addr(ip, 24).unwrap()), "192.168.1.0");
        assert_eq!(encode(cut_addr(ip, 0).unwrap()), "0.0.0.0");
        assert_eq!(encode(broadcast_addr(ip, 24).unwrap()), "192.168.1.255");
        assert_eq!(encode(broadcast_addr(ip, 32).unwrap()), "192.168.1.42");
        assert_eq!(broadcast_addr(ip, 0).unwrap(), MAX_ADDRESS);
    }

    #[test]
    fn test_block_size() {
        assert_eq!(block_size(0).unwrap(), 1 << 32);
        assert_eq!(block_size(24).unwrap(), 256);
        assert_eq!(block_size(32).unwrap(), 1);
        assert!(block_size(33).is_err());
    }

    proptest! {
        #[test]
        fn prop_round_trip(addr in any::<u32>()) {
            prop_assert_eq!(decode(&encode(addr)).unwrap(), addr);
        }

        #[test]
        fn prop_std_agrees(addr in any::<u32>()) {
            prop_assert_eq!(encode(addr), std::net::Ipv4Addr::from(addr).to_string());
        }
    }
}
