//! NGAP (NG Application Protocol) library
//!
//! Builds the PDU Session Resource Setup Response sent by a gNB to the AMF,
//! with ASN.1 Aligned PER encoding.
//!
//! # Modules
//!
//! - `codec` - Generated NGAP types and low-level APER encoding/decoding
//! - `procedures` - Message builders for NGAP procedures
//! - `transport` - IP address and TEID conversions for GTP tunnel IEs

pub mod codec;
pub mod procedures;
pub mod transport;

#[cfg(test)]
mod capture_tests;
