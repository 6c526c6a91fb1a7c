//! Conversions between IP addresses / TEIDs and the generated tunnel IEs
//!
//! `TransportLayerAddress` (TS 38.414) is a BIT STRING holding an IPv4
//! address (32 bits), an IPv6 address (128 bits), or both (160 bits, IPv4
//! first). `GTP-TEID` is four octets in network byte order.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bitvec::prelude::*;
use ransim_common::{Error, GnbConfig};

use crate::codec::{TransportLayerAddress, GTP_TEID};

const IPV4_BITS: usize = 32;
const IPV6_BITS: usize = 128;
const DUAL_STACK_BITS: usize = IPV4_BITS + IPV6_BITS;

impl TransportLayerAddress {
    /// An IPv4 address followed by an IPv6 address of the same endpoint.
    pub fn dual_stack(v4: Ipv4Addr, v6: Ipv6Addr) -> Self {
        let mut bits = BitVec::<u8, Msb0>::from_slice(&v4.octets());
        bits.extend_from_bitslice(v6.octets().view_bits::<Msb0>());
        Self(bits)
    }

    /// Builds the N3 address a gNB advertises, from its configuration.
    ///
    /// Runs [`GnbConfig::validate`] first, so a configuration built in code
    /// gets the same checks as one loaded from YAML.
    pub fn from_config(config: &GnbConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(match (config.n3_address(), config.gtp_ipv6) {
            (IpAddr::V4(v4), Some(v6)) => Self::dual_stack(v4, v6),
            (addr, _) => addr.into(),
        })
    }

    /// Number of bits in the address.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the address holds no bits at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The IPv4 part, for a 32-bit or dual-stack address.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.len() {
            IPV4_BITS | DUAL_STACK_BITS => {
                let raw: [u8; 4] = self.0.as_raw_slice()[..4].try_into().ok()?;
                Some(Ipv4Addr::from(raw))
            }
            _ => None,
        }
    }

    /// The IPv6 part, for a 128-bit or dual-stack address.
    pub fn ipv6(&self) -> Option<Ipv6Addr> {
        let offset = match self.len() {
            IPV6_BITS => 0,
            DUAL_STACK_BITS => 4,
            _ => return None,
        };
        let raw: [u8; 16] = self.0.as_raw_slice()[offset..offset + 16].try_into().ok()?;
        Some(Ipv6Addr::from(raw))
    }
}

impl From<Ipv4Addr> for TransportLayerAddress {
    fn from(addr: Ipv4Addr) -> Self {
        Self(BitVec::from_slice(&addr.octets()))
    }
}

impl From<Ipv6Addr> for TransportLayerAddress {
    fn from(addr: Ipv6Addr) -> Self {
        Self(BitVec::from_slice(&addr.octets()))
    }
}

impl From<IpAddr> for TransportLayerAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl fmt::Display for TransportLayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ipv4(), self.ipv6()) {
            (Some(v4), Some(v6)) => write!(f, "{v4}/{v6}"),
            (Some(v4), None) => write!(f, "{v4}"),
            (None, Some(v6)) => write!(f, "{v6}"),
            (None, None) => write!(f, "<{} bits>", self.len()),
        }
    }
}

impl GTP_TEID {
    /// The TEID as an integer, if the IE holds exactly four octets.
    pub fn value(&self) -> Option<u32> {
        let raw: [u8; 4] = self.0.as_slice().try_into().ok()?;
        Some(u32::from_be_bytes(raw))
    }
}

impl From<u32> for GTP_TEID {
    fn from(teid: u32) -> Self {
        Self(teid.to_be_bytes().to_vec())
    }
}

impl fmt::Display for GTP_TEID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(teid) => write!(f, "0x{teid:08x}"),
            None => write!(f, "{}", hex::encode(&self.0)),
        }
    }
}
