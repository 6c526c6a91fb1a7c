//! NGAP ASN.1 PER codec
//!
//! This module provides NGAP message encoding and decoding using Aligned PER (APER).
//! The Rust types are generated at compile time from the NGAP ASN.1 definitions
//! in `asn/`, which cover the PDU Session Resource Setup procedure.

use asn1_codecs::aper::{self, AperCodec};
use asn1_codecs::{PerCodecData, PerCodecError};
use bitvec::prelude::*;
use thiserror::Error;

/// Include the generated NGAP types from ASN.1 schema
#[allow(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    unused,
    non_camel_case_types,
    non_snake_case
)]
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/ngap.rs"));
}

// Re-export commonly used types at the module level
pub use generated::*;

/// NGAP codec error types
#[derive(Debug, Error)]
pub enum NgapCodecError {
    /// Error during APER encoding
    #[error("APER encoding error: {0}")]
    EncodeError(String),

    /// Error during APER decoding
    #[error("APER decoding error: {0}")]
    DecodeError(String),
}

/// Encode an NGAP PDU to bytes using APER
///
/// # Arguments
/// * `pdu` - The NGAP PDU to encode
///
/// # Returns
/// * `Ok(Vec<u8>)` - The encoded bytes
/// * `Err(NgapCodecError)` - If encoding fails
pub fn encode_ngap_pdu(pdu: &NGAP_PDU) -> Result<Vec<u8>, NgapCodecError> {
    let mut data = PerCodecData::new_aper();
    pdu.aper_encode(&mut data)
        .map_err(|e| NgapCodecError::EncodeError(format!("{:?}", e)))?;
    Ok(data.into_bytes())
}

/// Decode an NGAP PDU from bytes using APER
///
/// # Arguments
/// * `bytes` - The bytes to decode
///
/// # Returns
/// * `Ok(NGAP_PDU)` - The decoded PDU
/// * `Err(NgapCodecError)` - If decoding fails
pub fn decode_ngap_pdu(bytes: &[u8]) -> Result<NGAP_PDU, NgapCodecError> {
    let mut data = PerCodecData::from_slice_aper(bytes);
    NGAP_PDU::aper_decode(&mut data)
        .map_err(|e| NgapCodecError::DecodeError(format!("{:?}", e)))
}

fn encode_error(e: PerCodecError) -> NgapCodecError {
    NgapCodecError::EncodeError(format!("{:?}", e))
}

fn is_empty_setup_list(ie: &PDUSessionResourceSetupResponseProtocolIEs_Entry) -> bool {
    matches!(
        &ie.value,
        PDUSessionResourceSetupResponseProtocolIEs_EntryValue::Id_PDUSessionResourceSetupListSURes(list)
            if list.0.is_empty()
    )
}

/// Encode an NGAP PDU, accepting an empty PDU Session Resource Setup List SURes.
///
/// The list is `SIZE(1..maxnoofPDUSessions)`: X.691 has no encoding for zero
/// items and [`encode_ngap_pdu`] rejects it. Here an empty list IE is written
/// as an open type of length zero (`00 4b 40 00`: id 75, criticality ignore,
/// no value octets). That is NOT conforming X.691. The IE framing stays
/// intact, so a receiver can skip it, but a schema-driven decoder cannot
/// decode the value (it expects at least the list length octet), and
/// [`decode_ngap_pdu`] fails on such a message.
///
/// Every other PDU, and every other IE, goes through the generated codec
/// unchanged.
pub fn encode_ngap_pdu_lenient(pdu: &NGAP_PDU) -> Result<Vec<u8>, NgapCodecError> {
    let NGAP_PDU::SuccessfulOutcome(outcome) = pdu else {
        return encode_ngap_pdu(pdu);
    };
    let SuccessfulOutcomeValue::Id_PDUSessionResourceSetup(response) = &outcome.value else {
        return encode_ngap_pdu(pdu);
    };
    let ies = &response.protocol_i_es.0;
    if !ies.iter().any(is_empty_setup_list) {
        return encode_ngap_pdu(pdu);
    }

    // PDUSessionResourceSetupResponse: extension bit, then ProtocolIE-Container (SIZE(0..65535))
    let mut value = PerCodecData::new_aper();
    aper::encode::encode_sequence_header(&mut value, true, &BitVec::<u8, Msb0>::new(), false)
        .map_err(encode_error)?;
    aper::encode::encode_length_determinent(&mut value, Some(0), Some(65535), false, ies.len())
        .map_err(encode_error)?;
    for ie in ies {
        if is_empty_setup_list(ie) {
            ie.id.aper_encode(&mut value).map_err(encode_error)?;
            ie.criticality.aper_encode(&mut value).map_err(encode_error)?;
            aper::encode::encode_length_determinent(&mut value, None, None, false, 0)
                .map_err(encode_error)?;
        } else {
            ie.aper_encode(&mut value).map_err(encode_error)?;
        }
    }

    // NGAP-PDU successfulOutcome (index 1 of 3, extensible)
    let mut data = PerCodecData::new_aper();
    aper::encode::encode_choice_idx(&mut data, 0, 2, true, 1, false).map_err(encode_error)?;
    outcome.procedure_code.aper_encode(&mut data).map_err(encode_error)?;
    outcome.criticality.aper_encode(&mut data).map_err(encode_error)?;
    aper::encode::encode_length_determinent(&mut data, None, None, false, value.length_in_bytes())
        .map_err(encode_error)?;
    data.append_aligned(&mut value);
    Ok(data.into_bytes())
}

/// Encode a PDU Session Resource Setup Response Transfer on its own.
///
/// The result is carried as the opaque octets of a setup item
/// (`OCTET STRING (CONTAINING PDUSessionResourceSetupResponseTransfer)`).
pub fn encode_pdu_session_resource_setup_response_transfer(
    transfer: &PDUSessionResourceSetupResponseTransfer,
) -> Result<Vec<u8>, NgapCodecError> {
    let mut data = PerCodecData::new_aper();
    transfer.aper_encode(&mut data).map_err(encode_error)?;
    Ok(data.into_bytes())
}

/// Decode a PDU Session Resource Setup Response Transfer from the octets of a setup item.
pub fn decode_pdu_session_resource_setup_response_transfer(
    bytes: &[u8],
) -> Result<PDUSessionResourceSetupResponseTransfer, NgapCodecError> {
    let mut data = PerCodecData::from_slice_aper(bytes);
    PDUSessionResourceSetupResponseTransfer::aper_decode(&mut data)
        .map_err(|e| NgapCodecError::DecodeError(format!("{:?}", e)))
}
