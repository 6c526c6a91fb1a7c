//! NGAP Procedures
//!
//! This module contains the gNB side of NGAP procedures as defined in 3GPP TS 38.413.

pub mod pdu_session_resource;

pub use pdu_session_resource::*;
