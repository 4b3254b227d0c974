use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use serde::Serialize;
use thiserror::Error;

/// Network prefix lengths supported for zone generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Prefix {
    #[serde(rename = "8")]
    Slash8,
    #[serde(rename = "16")]
    Slash16,
    #[serde(rename = "24")]
    Slash24,
}

/// Prefix assumed when an address is given without one.
pub const DEFAULT_PREFIX: Prefix = Prefix::Slash24;

impl Prefix {
    /// Parse a prefix length, accepting only 8, 16 and 24.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Slash8),
            16 => Some(Self::Slash16),
            24 => Some(Self::Slash24),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Slash8 => 8,
            Self::Slash16 => 16,
            Self::Slash24 => 24,
        }
    }

    /// Number of leading octets that make up the network portion.
    pub fn network_octets(self) -> usize {
        usize::from(self.bits() / 8)
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.bits())
    }
}

/// A validated IPv4 address with a supported prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedAddress {
    pub octets: [u8; 4],
    pub prefix: Prefix,
}

impl ParsedAddress {
    pub fn new(octets: [u8; 4], prefix: Prefix) -> Self {
        Self { octets, prefix }
    }

    /// The address without its prefix.
    pub fn ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.octets)
    }

    /// Octets belonging to the network portion, most significant first.
    pub fn network(&self) -> &[u8] {
        &self.octets[..self.prefix.network_octets()]
    }

    /// Octets belonging to the host portion, most significant first.
    pub fn host(&self) -> &[u8] {
        &self.octets[self.prefix.network_octets()..]
    }
}

impl Display for ParsedAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.ip(), self.prefix)
    }
}

/// Non-fatal conditions found while validating an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressWarning {
    /// No `/prefix` was supplied; `assumed` was applied instead.
    MissingPrefix { assumed: Prefix },
}

impl Display for AddressWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrefix { assumed } => {
                write!(f, "no network mask included, defaulting to {assumed}")
            }
        }
    }
}

/// Errors returned for addresses that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid IPv4 address: {0:?} is not a dotted-quad address")]
    InvalidAddress(String),
    #[error("unsupported network mask /{0}: only /8, /16 and /24 are supported")]
    UnsupportedPrefix(String),
}

/// Result of a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated {
    pub address: ParsedAddress,
    pub warning: Option<AddressWarning>,
}

/// Validate a CIDR string such as `192.168.10.1/24`.
///
/// A missing prefix is not an error: [`DEFAULT_PREFIX`] is applied and a
/// [`AddressWarning::MissingPrefix`] is returned alongside the address.
pub fn validate(raw: &str) -> Result<Validated, AddressError> {
    let raw = raw.trim();
    let (addr_part, prefix_part) = match raw.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (raw, None),
    };

    let ip: Ipv4Addr = addr_part
        .parse()
        .map_err(|_| AddressError::InvalidAddress(addr_part.to_string()))?;

    let (prefix, warning) = match prefix_part {
        Some(text) => {
            let prefix = text
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(Prefix::from_bits)
                .ok_or_else(|| AddressError::UnsupportedPrefix(text.to_string()))?;
            (prefix, None)
        }
        None => (
            DEFAULT_PREFIX,
            Some(AddressWarning::MissingPrefix {
                assumed: DEFAULT_PREFIX,
            }),
        ),
    };

    Ok(Validated {
        address: ParsedAddress::new(ip.octets(), prefix),
        warning,
    })
}
