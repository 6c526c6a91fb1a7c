//! Caller-side context types: UE NGAP identifiers and established PDU sessions.
//!
//! These are read-only views of gNB state handed to NGAP message builders.
//! Values are kept in the wide integer types the gNB context stores them in;
//! range checks against the NGAP IE definitions happen where IEs are built.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The NGAP UE identifier pair of a UE-associated signalling connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UeNgapIds {
    /// AMF UE NGAP ID (assigned by AMF)
    pub amf_ue_ngap_id: i64,
    /// RAN UE NGAP ID (assigned by gNB)
    pub ran_ue_ngap_id: i64,
}

impl UeNgapIds {
    /// Creates a new identifier pair.
    pub const fn new(amf_ue_ngap_id: i64, ran_ue_ngap_id: i64) -> Self {
        Self {
            amf_ue_ngap_id,
            ran_ue_ngap_id,
        }
    }
}

impl fmt::Display for UeNgapIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "amf_ue_ngap_id={}, ran_ue_ngap_id={}",
            self.amf_ue_ngap_id, self.ran_ue_ngap_id
        )
    }
}

/// A PDU session whose user-plane resources the gNB has set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PduSessionResource {
    /// PDU Session ID (1-255, 0 is never a valid session)
    pub pdu_session_id: i64,
    /// Downlink TEID allocated by the gNB (UPF -> gNB)
    pub downlink_teid: u32,
    /// QoS Flow Identifiers carried over the tunnel
    pub qos_flow_ids: Vec<i64>,
}

impl PduSessionResource {
    /// Creates a session carrying a single QoS flow.
    pub fn new(pdu_session_id: i64, downlink_teid: u32, qos_flow_id: i64) -> Self {
        Self {
            pdu_session_id,
            downlink_teid,
            qos_flow_ids: vec![qos_flow_id],
        }
    }

    /// Creates a session carrying several QoS flows over the same tunnel.
    pub fn with_qos_flows(pdu_session_id: i64, downlink_teid: u32, qos_flow_ids: Vec<i64>) -> Self {
        Self {
            pdu_session_id,
            downlink_teid,
            qos_flow_ids,
        }
    }
}

impl fmt::Display for PduSessionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PSI={} DL-TEID=0x{:08x} QFI={:?}",
            self.pdu_session_id, self.downlink_teid, self.qos_flow_ids
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flow_session() {
        let session = PduSessionResource::new(5, 0x0A0B0C0D, 9);
        assert_eq!(session.qos_flow_ids, vec![9]);
        assert_eq!(session.to_string(), "PSI=5 DL-TEID=0x0a0b0c0d QFI=[9]");
    }

    #[test]
    fn test_multi_flow_session() {
        let session = PduSessionResource::with_qos_flows(1, 1, vec![1, 2, 3]);
        assert_eq!(session.qos_flow_ids.len(), 3);
    }

    #[test]
    fn test_ue_ngap_ids_display() {
        let ids = UeNgapIds::new(42, 7);
        assert_eq!(ids.to_string(), "amf_ue_ngap_id=42, ran_ue_ngap_id=7");
    }
}
