//! PDU Session Resource Setup Response
//!
//! Implements the gNB side of the PDU Session Resource Setup procedure
//! (3GPP TS 38.413 Section 8.2.1): once the user plane of the requested
//! sessions is in place, the gNB answers the AMF with a Successful Outcome
//! that lists, per session, the downlink GTP tunnel endpoint and the QoS
//! flows mapped onto it.
//!
//! The per-session tunnel information is a PDU Session Resource Setup
//! Response Transfer. It is APER encoded on its own first and the resulting
//! octets are embedded, opaque, in the outer message.

use std::collections::HashSet;

use ransim_common::{log_ngap_message, Direction, PduSessionResource, UeNgapIds};
use thiserror::Error;
use tracing::debug;

use crate::codec::generated::*;
use crate::codec::{self, NgapCodecError};

/// Errors that can occur while building a PDU Session Resource Setup Response
#[derive(Debug, Error)]
pub enum PduSessionResourceError {
    /// Codec error during encoding
    #[error("Codec error: {0}")]
    CodecError(#[from] NgapCodecError),

    /// Input value outside what the IE can carry
    #[error("Invalid IE value: {0}")]
    InvalidIeValue(String),

    /// The transfer of one session could not be produced
    #[error("PDU session {pdu_session_id}: setup response transfer failed: {source}")]
    TransferEncoding {
        /// PDU Session ID of the failing session
        pdu_session_id: i64,
        /// What went wrong
        source: Box<PduSessionResourceError>,
    },
}

// Value ranges of the IEs, TS 38.413 Section 9.3
const AMF_UE_NGAP_ID_MAX: i128 = (1 << 40) - 1;
const RAN_UE_NGAP_ID_MAX: i128 = u32::MAX as i128;
const PDU_SESSION_ID_MAX: i128 = 255;
const QOS_FLOW_IDENTIFIER_MAX: i128 = 63;
const MAX_NO_OF_QOS_FLOWS: usize = 64;

fn checked_ie_value(
    ie: &str,
    value: i64,
    min: i128,
    max: i128,
) -> Result<i128, PduSessionResourceError> {
    let wide = i128::from(value);
    if wide < min || wide > max {
        return Err(PduSessionResourceError::InvalidIeValue(format!(
            "{ie} {value} outside {min}..={max}"
        )));
    }
    Ok(wide)
}

// ============================================================================
// PDU Session Resource Setup Response Transfer
// ============================================================================

/// Build the QoS-flow-to-tunnel binding of one session.
///
/// # Arguments
/// * `n3_address` - The gNB N3 address (IPv4, IPv6 or dual stack)
/// * `downlink_teid` - TEID the UPF must use towards the gNB
/// * `qos_flow_ids` - QoS flows carried by the tunnel, at least one, each in 1..=63
pub fn build_setup_response_transfer(
    n3_address: &TransportLayerAddress,
    downlink_teid: u32,
    qos_flow_ids: &[i64],
) -> Result<PDUSessionResourceSetupResponseTransfer, PduSessionResourceError> {
    if n3_address.is_empty() {
        return Err(PduSessionResourceError::InvalidIeValue(
            "TransportLayerAddress is empty".to_string(),
        ));
    }
    if downlink_teid == 0 {
        return Err(PduSessionResourceError::InvalidIeValue(
            "GTP-TEID 0 is reserved".to_string(),
        ));
    }
    if qos_flow_ids.is_empty() || qos_flow_ids.len() > MAX_NO_OF_QOS_FLOWS {
        return Err(PduSessionResourceError::InvalidIeValue(format!(
            "AssociatedQosFlowList needs 1..={MAX_NO_OF_QOS_FLOWS} flows, got {}",
            qos_flow_ids.len()
        )));
    }

    let associated_qos_flows = qos_flow_ids
        .iter()
        .map(|&qfi| {
            let qfi = checked_ie_value("QosFlowIdentifier", qfi, 1, QOS_FLOW_IDENTIFIER_MAX)?;
            // No mapping indication: the flow is mapped in both directions
            Ok(AssociatedQosFlowItem {
                qos_flow_identifier: QosFlowIdentifier(qfi as u8),
                qos_flow_mapping_indication: None,
                ie_extensions: None,
            })
        })
        .collect::<Result<Vec<_>, PduSessionResourceError>>()?;

    Ok(PDUSessionResourceSetupResponseTransfer {
        dl_qos_flow_per_tnl_information: QosFlowPerTNLInformation {
            up_transport_layer_information: UPTransportLayerInformation::GTPTunnel(GTPTunnel {
                transport_layer_address: n3_address.clone(),
                gtp_teid: GTP_TEID::from(downlink_teid),
                ie_extensions: None,
            }),
            associated_qos_flow_list: AssociatedQosFlowList(associated_qos_flows),
            ie_extensions: None,
        },
        additional_dl_qos_flow_per_tnl_information: None,
        security_result: None,
        qos_flow_failed_to_setup_list: None,
        ie_extensions: None,
    })
}

/// Build and APER encode the transfer of one session.
///
/// The returned octets are what goes into the
/// `pdu_session_resource_setup_response_transfer` field of a setup item.
pub fn encode_setup_response_transfer(
    n3_address: &TransportLayerAddress,
    downlink_teid: u32,
    qos_flow_ids: &[i64],
) -> Result<Vec<u8>, PduSessionResourceError> {
    let transfer = build_setup_response_transfer(n3_address, downlink_teid, qos_flow_ids)?;
    Ok(codec::encode_pdu_session_resource_setup_response_transfer(&transfer)?)
}

// ============================================================================
// PDU Session Resource Setup Response
// ============================================================================

/// Wraps an IE value, taking id and criticality from the variant.
fn response_ie(
    value: PDUSessionResourceSetupResponseProtocolIEs_EntryValue,
) -> PDUSessionResourceSetupResponseProtocolIEs_Entry {
    let id = match &value {
        PDUSessionResourceSetupResponseProtocolIEs_EntryValue::Id_AMF_UE_NGAP_ID(_) => {
            ID_AMF_UE_NGAP_ID
        }
        PDUSessionResourceSetupResponseProtocolIEs_EntryValue::Id_RAN_UE_NGAP_ID(_) => {
            ID_RAN_UE_NGAP_ID
        }
        PDUSessionResourceSetupResponseProtocolIEs_EntryValue::Id_PDUSessionResourceSetupListSURes(_) => {
            ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_RES
        }
    };

    // Every IE of this message is criticality ignore
    PDUSessionResourceSetupResponseProtocolIEs_Entry {
        id: ProtocolIE_ID(id),
        criticality: Criticality(Criticality::IGNORE),
        value,
    }
}

/// Wraps a successful outcome, taking procedure code and criticality from the variant.
fn successful_outcome(value: SuccessfulOutcomeValue) -> SuccessfulOutcome {
    let procedure_code = match &value {
        SuccessfulOutcomeValue::Id_InitialContextSetup(_) => ID_INITIAL_CONTEXT_SETUP,
        SuccessfulOutcomeValue::Id_PDUSessionResourceSetup(_) => ID_PDU_SESSION_RESOURCE_SETUP,
    };

    SuccessfulOutcome {
        procedure_code: ProcedureCode(procedure_code),
        criticality: Criticality(Criticality::REJECT),
        value,
    }
}

/// Assembles a PDU Session Resource Setup Response.
///
/// IEs are appended in call order. The conventional order is AMF UE NGAP ID,
/// RAN UE NGAP ID, then the setup list.
///
/// ```
/// use std::net::Ipv4Addr;
/// use ransim_common::PduSessionResource;
/// use ransim_ngap::procedures::PduSessionResourceSetupResponseBuilder;
///
/// let session = PduSessionResource::new(5, 0x0A0B0C0D, 9);
/// let bytes = PduSessionResourceSetupResponseBuilder::new()
///     .amf_ue_ngap_id(42)?
///     .ran_ue_ngap_id(7)?
///     .pdu_session_resource_setup_list_su_res(
///         &Ipv4Addr::new(10, 0, 0, 1).into(),
///         [Some(&session)],
///     )?
///     .encode()?;
/// assert_eq!(&bytes[..3], &[0x20, 0x1d, 0x00]);
/// # Ok::<(), ransim_ngap::procedures::PduSessionResourceError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PduSessionResourceSetupResponseBuilder {
    protocol_ies: Vec<PDUSessionResourceSetupResponseProtocolIEs_Entry>,
}

impl PduSessionResourceSetupResponseBuilder {
    /// Creates a response with no IEs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the AMF UE NGAP ID IE.
    pub fn amf_ue_ngap_id(mut self, id: i64) -> Result<Self, PduSessionResourceError> {
        let id = checked_ie_value("AMF-UE-NGAP-ID", id, 0, AMF_UE_NGAP_ID_MAX)?;
        self.push(PDUSessionResourceSetupResponseProtocolIEs_EntryValue::Id_AMF_UE_NGAP_ID(
            AMF_UE_NGAP_ID(id as u64),
        ));
        Ok(self)
    }

    /// Appends the RAN UE NGAP ID IE.
    pub fn ran_ue_ngap_id(mut self, id: i64) -> Result<Self, PduSessionResourceError> {
        let id = checked_ie_value("RAN-UE-NGAP-ID", id, 0, RAN_UE_NGAP_ID_MAX)?;
        self.push(PDUSessionResourceSetupResponseProtocolIEs_EntryValue::Id_RAN_UE_NGAP_ID(
            RAN_UE_NGAP_ID(id as u32),
        ));
        Ok(self)
    }

    /// Appends the PDU Session Resource Setup List SURes IE.
    ///
    /// `None` entries stand for sessions that do not exist and are skipped.
    /// Any session whose transfer cannot be produced aborts the whole response.
    ///
    /// The IE is appended even when no session remains. An empty list has no
    /// X.691 encoding, see [`codec::encode_ngap_pdu_lenient`] for how
    /// [`encode`](Self::encode) sends it.
    pub fn pdu_session_resource_setup_list_su_res<'a, I>(
        mut self,
        n3_address: &TransportLayerAddress,
        sessions: I,
    ) -> Result<Self, PduSessionResourceError>
    where
        I: IntoIterator<Item = Option<&'a PduSessionResource>>,
    {
        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for session in sessions.into_iter().flatten() {
            let psi =
                checked_ie_value("PDUSessionID", session.pdu_session_id, 1, PDU_SESSION_ID_MAX)?;
            if !seen.insert(psi) {
                return Err(PduSessionResourceError::InvalidIeValue(format!(
                    "PDUSessionID {psi} listed twice"
                )));
            }

            let transfer =
                encode_setup_response_transfer(n3_address, session.downlink_teid, &session.qos_flow_ids)
                    .map_err(|e| PduSessionResourceError::TransferEncoding {
                        pdu_session_id: session.pdu_session_id,
                        source: Box::new(e),
                    })?;

            debug!(
                "PDU Session {}: N3 address={}, DL TEID={}, QFIs={:?}, transfer {} bytes",
                psi,
                n3_address,
                GTP_TEID::from(session.downlink_teid),
                session.qos_flow_ids,
                transfer.len()
            );

            items.push(PDUSessionResourceSetupItemSURes {
                pdu_session_id: PDUSessionID(psi as u8),
                pdu_session_resource_setup_response_transfer:
                    PDUSessionResourceSetupItemSUResPDUSessionResourceSetupResponseTransfer(transfer),
                ie_extensions: None,
            });
        }

        if items.is_empty() {
            debug!("No established PDU session, PDUSessionResourceSetupListSURes is empty");
        }

        self.push(
            PDUSessionResourceSetupResponseProtocolIEs_EntryValue::Id_PDUSessionResourceSetupListSURes(
                PDUSessionResourceSetupListSURes(items),
            ),
        );
        Ok(self)
    }

    /// IEs appended so far, in order.
    pub fn ies(&self) -> &[PDUSessionResourceSetupResponseProtocolIEs_Entry] {
        &self.protocol_ies
    }

    /// Returns the assembled NGAP PDU without encoding it.
    pub fn build(self) -> NGAP_PDU {
        let response = PDUSessionResourceSetupResponse {
            protocol_i_es: PDUSessionResourceSetupResponseProtocolIEs(self.protocol_ies),
        };
        NGAP_PDU::SuccessfulOutcome(successful_outcome(
            SuccessfulOutcomeValue::Id_PDUSessionResourceSetup(response),
        ))
    }

    /// Encodes the assembled NGAP PDU.
    ///
    /// An empty setup list is sent as a zero-length IE value.
    pub fn encode(self) -> Result<Vec<u8>, PduSessionResourceError> {
        let bytes = codec::encode_ngap_pdu_lenient(&self.build())?;
        log_ngap_message(Direction::Tx, "PDUSessionResourceSetupResponse", &bytes);
        Ok(bytes)
    }

    fn push(&mut self, value: PDUSessionResourceSetupResponseProtocolIEs_EntryValue) {
        self.protocol_ies.push(response_ie(value));
    }
}

/// Build and encode a complete PDU Session Resource Setup Response.
///
/// # Arguments
/// * `ue` - NGAP identifiers of the UE
/// * `n3_address` - The gNB N3 address advertised in every tunnel
/// * `sessions` - Established sessions; `None` entries are skipped
pub fn encode_pdu_session_resource_setup_response<'a, I>(
    ue: &UeNgapIds,
    n3_address: &TransportLayerAddress,
    sessions: I,
) -> Result<Vec<u8>, PduSessionResourceError>
where
    I: IntoIterator<Item = Option<&'a PduSessionResource>>,
{
    PduSessionResourceSetupResponseBuilder::new()
        .amf_ue_ngap_id(ue.amf_ue_ngap_id)?
        .ran_ue_ngap_id(ue.ran_ue_ngap_id)?
        .pdu_session_resource_setup_list_su_res(n3_address, sessions)?
        .encode()
}

/// Check if an NGAP PDU is a PDU Session Resource Setup Response
pub fn is_pdu_session_resource_setup_response(pdu: &NGAP_PDU) -> bool {
    matches!(
        pdu,
        NGAP_PDU::SuccessfulOutcome(SuccessfulOutcome {
            value: SuccessfulOutcomeValue::Id_PDUSessionResourceSetup(_),
            ..
        })
    )
}
