// ── Appliance transport seam ──
//
// The orchestration layer talks to the appliance only through the
// `Appliance` trait. `XmlApiClient` is the production implementation;
// tests substitute a scripted fake.

use std::future::Future;

use panos_api::transport::{TlsMode, TransportConfig};
use panos_api::{Job, SystemInfo, XmlApiClient, XmlElement};
use tracing::{debug, info};

use crate::config::{ApplianceConfig, AuthCredentials, TlsVerification};
use crate::error::CoreError;

/// Operations the orchestration layer needs from a firewall or Panorama.
pub trait Appliance: Send + Sync {
    /// Identify the appliance (`<show><system><info/></system></show>`).
    fn system_info(&self) -> impl Future<Output = Result<SystemInfo, CoreError>> + Send;

    /// Submit a commit-type command. `None` means nothing was scheduled.
    fn commit(
        &self,
        cmd: &XmlElement,
        action: Option<&'static str>,
    ) -> impl Future<Output = Result<Option<u64>, CoreError>> + Send;

    /// Fetch the current state of a job.
    fn show_job(&self, id: u64) -> impl Future<Output = Result<Job, CoreError>> + Send;

    /// Run an operational command and return its `<result>` element.
    fn op(&self, cmd: &XmlElement) -> impl Future<Output = Result<XmlElement, CoreError>> + Send;
}

impl Appliance for XmlApiClient {
    async fn system_info(&self) -> Result<SystemInfo, CoreError> {
        Ok(XmlApiClient::system_info(self).await?)
    }

    async fn commit(
        &self,
        cmd: &XmlElement,
        action: Option<&'static str>,
    ) -> Result<Option<u64>, CoreError> {
        Ok(XmlApiClient::commit(self, cmd, action).await?)
    }

    async fn show_job(&self, id: u64) -> Result<Job, CoreError> {
        Ok(XmlApiClient::show_job(self, id).await?)
    }

    async fn op(&self, cmd: &XmlElement) -> Result<XmlElement, CoreError> {
        Ok(XmlApiClient::op(self, cmd).await?)
    }
}

/// Build an authenticated client from the runtime configuration.
///
/// Credentials are exchanged for an API key up front so every later
/// request carries `X-PAN-KEY`.
pub async fn connect(config: &ApplianceConfig) -> Result<XmlApiClient, CoreError> {
    let transport = build_transport(config);
    let client = XmlApiClient::new(config.url.clone(), &transport)?;

    let key = match &config.auth {
        AuthCredentials::ApiKey(key) => {
            debug!("using configured API key");
            key.clone()
        }
        AuthCredentials::Credentials { username, password } => {
            let key = client.keygen(username, password).await?;
            debug!(username = %username, "API key generated");
            key
        }
    };

    info!(url = %config.url, "connected to appliance");
    Ok(client.with_api_key(key))
}

/// Build a [`TransportConfig`] from the appliance configuration.
fn build_transport(config: &ApplianceConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
