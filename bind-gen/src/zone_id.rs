//! Mapping from a validated address to the names of its reverse zone.
//!
//! All three functions read the network/host split from the address's own
//! prefix, so two addresses with the same network portion under the same
//! prefix always resolve to the same zone.

use serde::Serialize;

use crate::address::ParsedAddress;

/// Suffix of every IPv4 reverse zone.
pub const REVERSE_SUFFIX: &str = "in-addr.arpa";

/// Name of the zone file for the address's network, e.g. `db.192.168.10`.
pub fn zone_file_id(addr: &ParsedAddress) -> String {
    format!("db.{}", join(addr.network().iter()))
}

/// Reverse zone name for the address's network, e.g. `10.168.192.in-addr.arpa`.
pub fn reverse_zone_name(addr: &ParsedAddress) -> String {
    format!("{}.{REVERSE_SUFFIX}", join(addr.network().iter().rev()))
}

/// Host octets in reverse order; the owner label of a PTR record inside the
/// reverse zone. `192.168.10.1/8` gives `1.10.168`.
pub fn reverse_host_label(addr: &ParsedAddress) -> String {
    join(addr.host().iter().rev())
}

fn join<'a>(octets: impl Iterator<Item = &'a u8>) -> String {
    octets
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Identity of a reverse zone: its file name and its zone name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReverseZoneIdentity {
    pub zone_file_id: String,
    pub zone_name: String,
}

impl ReverseZoneIdentity {
    pub fn of(addr: &ParsedAddress) -> Self {
        Self {
            zone_file_id: zone_file_id(addr),
            zone_name: reverse_zone_name(addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{reverse_host_label, reverse_zone_name, zone_file_id, ReverseZoneIdentity};
    use crate::address::{validate, ParsedAddress, Prefix};

    fn addr(raw: &str) -> ParsedAddress {
        validate(raw).expect("valid address").address
    }

    #[test]
    fn resolves_slash_24() {
        let a = addr("192.168.10.1/24");
        assert_eq!(zone_file_id(&a), "db.192.168.10");
        assert_eq!(reverse_zone_name(&a), "10.168.192.in-addr.arpa");
        assert_eq!(reverse_host_label(&a), "1");
    }

    #[test]
    fn resolves_slash_16() {
        let a = addr("10.20.0.0/16");
        assert_eq!(zone_file_id(&a), "db.10.20");
        assert_eq!(reverse_zone_name(&a), "20.10.in-addr.arpa");
        assert_eq!(reverse_host_label(&a), "0.0");
    }

    #[test]
    fn resolves_slash_8() {
        let a = addr("172.0.0.1/8");
        assert_eq!(zone_file_id(&a), "db.172");
        assert_eq!(reverse_zone_name(&a), "172.in-addr.arpa");
        assert_eq!(reverse_host_label(&a), "1.0.0");
    }

    #[test]
    fn host_label_reverses_all_host_octets() {
        assert_eq!(reverse_host_label(&addr("192.168.10.1/8")), "1.10.168");
    }

    #[test]
    fn missing_prefix_resolves_as_slash_24_everywhere() {
        let defaulted = addr("192.168.10.9");
        let explicit = addr("192.168.10.9/24");
        assert_eq!(ReverseZoneIdentity::of(&defaulted), ReverseZoneIdentity::of(&explicit));
        assert_eq!(reverse_host_label(&defaulted), "9");
    }

    #[test]
    fn same_network_yields_same_identity_for_every_prefix() {
        let cases = [
            (Prefix::Slash8, [10, 1, 2, 3], [10, 200, 100, 50]),
            (Prefix::Slash16, [172, 16, 0, 1], [172, 16, 254, 254]),
            (Prefix::Slash24, [192, 168, 10, 0], [192, 168, 10, 255]),
        ];
        for (prefix, left, right) in cases {
            let left = ParsedAddress::new(left, prefix);
            let right = ParsedAddress::new(right, prefix);
            assert_eq!(zone_file_id(&left), zone_file_id(&right));
            assert_eq!(reverse_zone_name(&left), reverse_zone_name(&right));
            assert_eq!(ReverseZoneIdentity::of(&left), ReverseZoneIdentity::of(&right));
            assert_ne!(reverse_host_label(&left), reverse_host_label(&right));
        }
    }

    #[test]
    fn different_prefix_yields_different_identity() {
        let narrow = addr("10.20.30.1/24");
        let wide = addr("10.20.30.1/16");
        assert_ne!(ReverseZoneIdentity::of(&narrow), ReverseZoneIdentity::of(&wide));
    }
}
