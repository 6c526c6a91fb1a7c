//! NGAP Capture Validation Tests
//!
//! Checks the encoder output byte for byte against hex captures of
//! PDU Session Resource Setup Response messages, as they appear on the
//! N2 interface (3GPP TS 38.413 Section 9.2.1.2).

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use ransim_common::{GnbConfig, PduSessionResource, UeNgapIds};

    use crate::codec::{decode_ngap_pdu, encode_ngap_pdu, TransportLayerAddress};
    use crate::procedures::pdu_session_resource::{
        encode_pdu_session_resource_setup_response, encode_setup_response_transfer,
        is_pdu_session_resource_setup_response, PduSessionResourceSetupResponseBuilder,
    };

    /// Transfer for TEID 0x0A0B0C0D, N3 address 10.0.0.1 and QFI 9
    const TRANSFER_CAPTURE: &str = "0003e00a0000010a0b0c0d0009";

    /// AMF UE NGAP ID 42, RAN UE NGAP ID 7, PDU session 5 carrying the transfer above
    const SETUP_RESPONSE_CAPTURE: &str = concat!(
        "201d0024",
        "000003",
        "000a4002002a",
        "005540020007",
        "004b4011",
        "000005",
        "0d",
        "0003e00a0000010a0b0c0d0009",
    );

    /// Same UE with no established session: the setup list IE is present with
    /// a zero-length value
    const EMPTY_LIST_CAPTURE: &str = concat!(
        "201d0013",
        "000003",
        "000a4002002a",
        "005540020007",
        "004b4000",
    );

    fn n3_address() -> TransportLayerAddress {
        Ipv4Addr::new(10, 0, 0, 1).into()
    }

    // ========================================================================
    // Setup Response Transfer
    // ========================================================================

    #[test]
    fn test_transfer_matches_capture() {
        let encoded = encode_setup_response_transfer(&n3_address(), 0x0A0B0C0D, &[9])
            .expect("Failed to encode transfer");
        assert_eq!(hex::encode(&encoded), TRANSFER_CAPTURE);
        assert_eq!(encoded.len(), 13);
    }

    // ========================================================================
    // PDU Session Resource Setup Response
    // ========================================================================

    #[test]
    fn test_setup_response_matches_capture() {
        let session = PduSessionResource::new(5, 0x0A0B0C0D, 9);
        let encoded = encode_pdu_session_resource_setup_response(
            &UeNgapIds::new(42, 7),
            &n3_address(),
            [Some(&session)],
        )
        .expect("Failed to encode");

        assert_eq!(hex::encode(&encoded), SETUP_RESPONSE_CAPTURE);
        assert_eq!(encoded.len(), 40);
    }

    #[test]
    fn test_setup_response_capture_roundtrip() {
        let capture = hex::decode(SETUP_RESPONSE_CAPTURE).expect("Invalid hex");
        let pdu = decode_ngap_pdu(&capture).expect("Failed to decode capture");
        let reencoded = encode_ngap_pdu(&pdu).expect("Failed to re-encode");
        assert_eq!(reencoded, capture);
        assert!(is_pdu_session_resource_setup_response(&pdu));
    }

    #[test]
    fn test_empty_list_matches_capture() {
        let encoded = PduSessionResourceSetupResponseBuilder::new()
            .amf_ue_ngap_id(42)
            .expect("Valid AMF UE NGAP ID")
            .ran_ue_ngap_id(7)
            .expect("Valid RAN UE NGAP ID")
            .pdu_session_resource_setup_list_su_res(&n3_address(), std::iter::empty())
            .expect("Empty list is allowed")
            .encode()
            .expect("Failed to encode");

        assert_eq!(hex::encode(&encoded), EMPTY_LIST_CAPTURE);
        assert_eq!(encoded.len(), 23);
    }

    #[test]
    fn test_address_from_gnb_config() {
        let config = GnbConfig::from_yaml("ngap_ip: 127.0.0.1\ngtp_ip: 10.0.0.1\n")
            .expect("Valid config");
        let session = PduSessionResource::new(5, 0x0A0B0C0D, 9);
        let encoded = encode_pdu_session_resource_setup_response(
            &UeNgapIds::new(42, 7),
            &TransportLayerAddress::from_config(&config).expect("Valid N3 address"),
            [Some(&session)],
        )
        .expect("Failed to encode");

        assert_eq!(hex::encode(&encoded), SETUP_RESPONSE_CAPTURE);
    }
}
