//! CIDR block parsing and containment.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Reasons a string is not a CIDR block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrParseError {
    #[error("missing '/' separator")]
    MissingPrefix,

    #[error("invalid network address: {0}")]
    InvalidAddress(String),

    #[error("invalid prefix length: {0}")]
    InvalidPrefix(String),
}

/// A contiguous address range: base network plus prefix length.
///
/// Host bits of the written address are masked off on parse, so
/// `10.1.2.3/8` and `10.0.0.0/8` describe the same block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CidrBlock {
    V4 { network: u32, prefix: u8 },
    V6 { network: u128, prefix: u8 },
}

impl CidrBlock {
    /// Whether `addr` falls inside this block.
    ///
    /// IPv4-mapped IPv6 addresses are compared as their IPv4 form.
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (*self, addr) {
            (CidrBlock::V4 { network, prefix }, IpAddr::V4(ip)) => {
                u32::from(ip) & mask_v4(prefix) == network
            }
            (CidrBlock::V4 { network, prefix }, IpAddr::V6(ip)) => ip
                .to_ipv4_mapped()
                .is_some_and(|ip| u32::from(ip) & mask_v4(prefix) == network),
            (CidrBlock::V6 { network, prefix }, IpAddr::V6(ip)) => {
                u128::from(ip) & mask_v6(prefix) == network
            }
            (CidrBlock::V6 { .. }, IpAddr::V4(_)) => false,
        }
    }
}

fn mask_v4(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p)),
    }
}

fn mask_v6(prefix: u8) -> u128 {
    match prefix {
        0 => 0,
        p => u128::MAX << (128 - u32::from(p)),
    }
}

impl FromStr for CidrBlock {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s.split_once('/').ok_or(CidrParseError::MissingPrefix)?;

        let addr: IpAddr = addr
            .parse()
            .map_err(|_| CidrParseError::InvalidAddress(addr.to_string()))?;

        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CidrParseError::InvalidPrefix(prefix.to_string()));
        }
        let bits: u8 = prefix
            .parse()
            .map_err(|_| CidrParseError::InvalidPrefix(prefix.to_string()))?;

        match addr {
            IpAddr::V4(ip) if bits <= 32 => Ok(CidrBlock::V4 {
                network: u32::from(ip) & mask_v4(bits),
                prefix: bits,
            }),
            IpAddr::V6(ip) if bits <= 128 => Ok(CidrBlock::V6 {
                network: u128::from(ip) & mask_v6(bits),
                prefix: bits,
            }),
            _ => Err(CidrParseError::InvalidPrefix(prefix.to_string())),
        }
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CidrBlock::V4 { network, prefix } => write!(f, "{}/{}", Ipv4Addr::from(network), prefix),
            CidrBlock::V6 { network, prefix } => write!(f, "{}/{}", Ipv6Addr::from(network), prefix),
        }
    }
}
