//! gNB configuration
//!
//! Only the parts of the gNB configuration that feed NGAP message
//! construction live here: the NGAP endpoint and the N3 (GTP-U) addresses
//! that are advertised to the core network in tunnel information IEs.

use std::fs;
use std::net::{IpAddr, Ipv6Addr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// gNB (gNodeB) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GnbConfig {
    /// IP address for NGAP interface
    pub ngap_ip: IpAddr,
    /// IP address for GTP-U interface
    pub gtp_ip: IpAddr,
    /// Advertised GTP IP address (for NAT scenarios)
    #[serde(default)]
    pub gtp_advertise_ip: Option<IpAddr>,
    /// Secondary IPv6 GTP address, advertised alongside an IPv4 N3 address
    /// for dual-stack tunnel endpoints
    #[serde(default)]
    pub gtp_ipv6: Option<Ipv6Addr>,
}

impl GnbConfig {
    /// Creates a configuration with the same address on NGAP and N3.
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ngap_ip: ip,
            gtp_ip: ip,
            gtp_advertise_ip: None,
            gtp_ipv6: None,
        }
    }

    /// Returns the N3 address put into GTP tunnel IEs.
    ///
    /// The advertised address wins over the bound GTP address.
    pub fn n3_address(&self) -> IpAddr {
        self.gtp_advertise_ip.unwrap_or(self.gtp_ip)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        if self.gtp_ipv6.is_some() && self.n3_address().is_ipv6() {
            return Err(Error::Config(format!(
                "gtp_ipv6 requires an IPv4 N3 address, got {}",
                self.n3_address()
            )));
        }
        Ok(())
    }

    /// Parses a gNB configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use ransim_common::GnbConfig;
    ///
    /// let yaml = r#"
    /// ngap_ip: 127.0.0.1
    /// gtp_ip: 10.0.0.1
    /// "#;
    ///
    /// let config = GnbConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.n3_address().to_string(), "10.0.0.1");
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a gNB configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Serializes the gNB configuration to a YAML string.
    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}
