// XML API HTTP client
//
// Wraps `reqwest::Client` with PAN-OS request construction and
// `<response status="...">` envelope unwrapping. Every request is a form
// POST to `/api/`; the request `type` (op, commit, config, keygen)
// selects the operation.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{Job, SystemInfo};
use crate::transport::TransportConfig;
use crate::xml::{self, XmlElement};

const API_KEY_HEADER: &str = "X-PAN-KEY";

/// Raw HTTP client for a PAN-OS firewall or Panorama XML API.
///
/// All methods return the unwrapped `<result>` payload (or a typed view of
/// it) -- the envelope is stripped and checked before the caller sees it.
pub struct XmlApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl XmlApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the appliance root (e.g. `https://192.168.1.1`).
    /// The client has no key until [`with_api_key`](Self::with_api_key).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            api_key: None,
        }
    }

    /// Attach the API key sent on every subsequent request.
    pub fn with_api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// The appliance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/`
    pub(crate) fn api_url(&self) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/"))?)
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Generate an API key from username/password.
    ///
    /// `GET /api/?type=keygen&user=...&password=...`
    pub async fn keygen(&self, username: &str, password: &SecretString) -> Result<SecretString, Error> {
        let url = self.api_url()?;
        debug!(username, "generating API key");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("type", "keygen"),
                ("user", username),
                ("password", password.expose_secret()),
            ])
            .send()
            .await?;

        let result = parse_envelope(resp).await.map_err(|e| match e {
            Error::Api { message, .. } => Error::Authentication { message },
            other => other,
        })?;

        result
            .text_at("key")
            .map(|k| SecretString::from(k.to_owned()))
            .ok_or_else(|| Error::Authentication {
                message: "keygen response did not contain a key".into(),
            })
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Run an operational command and return its `<result>` element.
    ///
    /// `POST /api/` with `type=op&cmd=<xml>`
    pub async fn op(&self, cmd: &XmlElement) -> Result<XmlElement, Error> {
        let cmd = cmd.to_xml()?;
        self.post(vec![("type", "op".into()), ("cmd", cmd)]).await
    }

    /// Submit a commit-type command.
    ///
    /// `POST /api/` with `type=commit&cmd=<xml>` (plus `action=all` for
    /// Panorama commit-all). Returns the enqueued job id, or `None` when
    /// the appliance scheduled nothing (e.g. no pending changes).
    pub async fn commit(&self, cmd: &XmlElement, action: Option<&str>) -> Result<Option<u64>, Error> {
        let mut form = vec![("type", "commit".to_owned()), ("cmd", cmd.to_xml()?)];
        if let Some(action) = action {
            form.push(("action", action.to_owned()));
        }
        let result = self.post(form).await?;

        match result.text_at("job") {
            Some(id) => {
                let id = id.parse::<u64>().map_err(|e| Error::Deserialization {
                    message: format!("invalid job id {id:?}: {e}"),
                    body: result.to_xml().unwrap_or_default(),
                })?;
                debug!(job_id = id, "commit job enqueued");
                Ok(Some(id))
            }
            None => {
                debug!(msg = %result.flatten_text(" "), "commit returned no job");
                Ok(None)
            }
        }
    }

    /// Fetch the current state of one job.
    ///
    /// `<show><jobs><id>N</id></jobs></show>`
    pub async fn show_job(&self, id: u64) -> Result<Job, Error> {
        let cmd = XmlElement::new("show")
            .child(XmlElement::new("jobs").child(XmlElement::with_text("id", id.to_string())));
        let result = self.op(&cmd).await?;
        Job::from_result(&result)
    }

    /// Fetch system information (model, serial, version).
    ///
    /// `<show><system><info/></system></show>`
    pub async fn system_info(&self) -> Result<SystemInfo, Error> {
        let cmd = XmlElement::new("show")
            .child(XmlElement::new("system").child(XmlElement::new("info")));
        let result = self.op(&cmd).await?;
        SystemInfo::from_result(&result)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated form POST and unwrap the envelope.
    async fn post(&self, form: Vec<(&'static str, String)>) -> Result<XmlElement, Error> {
        let key = self.api_key.as_ref().ok_or(Error::MissingApiKey)?;
        let url = self.api_url()?;
        let kind = form.first().map_or("", |(_, v)| v.as_str());
        debug!(request_type = kind, "POST {}", url);
        trace!(?form, "request form");

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, key.expose_secret())
            .form(&form)
            .send()
            .await?;

        parse_envelope(resp).await
    }
}

/// Parse the `<response status="...">` envelope, returning `<result>`
/// on success (an empty element when the appliance sent none) or an
/// `Error::Api` when `status="error"`.
async fn parse_envelope(resp: reqwest::Response) -> Result<XmlElement, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    trace!(%status, body = %body, "response");

    let doc = match xml::parse(&body) {
        Ok(doc) => doc,
        Err(e) if status.is_success() => return Err(e),
        Err(_) => {
            return Err(Error::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
    };

    if doc.tag != "response" {
        return Err(Error::Deserialization {
            message: format!("expected <response> envelope, got <{}>", doc.tag),
            body,
        });
    }

    match doc.attribute("status") {
        Some("success") => Ok(doc.find("result").cloned().unwrap_or_else(|| {
            // Some success responses carry only a top-level <msg>.
            let mut result = XmlElement::new("result");
            if let Some(msg) = doc.find("msg") {
                result.push(msg.clone());
            }
            result
        })),
        _ => {
            let message = error_message(&doc);
            let code = doc.attribute("code").map(str::to_owned);
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(Error::Authentication { message });
            }
            Err(Error::Api { message, code })
        }
    }
}

/// Extract the human-readable message of an error envelope.
///
/// PAN-OS places it under `<msg>` or `<result><msg>`, either as text or
/// as nested `<line>` elements.
fn error_message(doc: &XmlElement) -> String {
    let msg = doc
        .find("msg")
        .or_else(|| doc.path("result/msg"))
        .map(|m| m.flatten_text(" "))
        .filter(|m| !m.is_empty());
    msg.unwrap_or_else(|| {
        let all = doc.flatten_text(" ");
        if all.is_empty() {
            "unknown error".to_owned()
        } else {
            all
        }
    })
}
