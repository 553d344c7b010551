#![allow(clippy::unwrap_used)]
// Integration tests for `XmlApiClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use panos_api::{Error, JobResult, JobStatus, XmlApiClient, XmlElement};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, XmlApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = XmlApiClient::with_client(reqwest::Client::new(), base_url)
        .with_api_key(SecretString::from("test-key".to_string()));
    (server, client)
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_string(body)
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_keygen_success() {
    let server = MockServer::start().await;
    let client =
        XmlApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("type", "keygen"))
        .and(query_param("user", "admin"))
        .respond_with(xml(
            "<response status = 'success'><result><key>LUFRPT1abc=</key></result></response>",
        ))
        .mount(&server)
        .await;

    let secret: SecretString = "s3cret".to_string().into();
    let key = client.keygen("admin", &secret).await.unwrap();
    assert_eq!(key.expose_secret(), "LUFRPT1abc=");
}

#[tokio::test]
async fn test_keygen_invalid_credentials() {
    let server = MockServer::start().await;
    let client =
        XmlApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<response status = 'error' code = '403'><result><msg>Invalid Credential</msg></result></response>",
        ))
        .mount(&server)
        .await;

    let secret: SecretString = "wrong".to_string().into();
    let result = client.keygen("admin", &secret).await;
    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "Invalid Credential");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_requests_without_key_are_refused_locally() {
    let server = MockServer::start().await;
    let client =
        XmlApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    let result = client.system_info().await;
    assert!(matches!(result, Err(Error::MissingApiKey)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── System info ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_system_info_sends_key_header() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(header("X-PAN-KEY", "test-key"))
        .and(body_string_contains("type=op"))
        .and(body_string_contains("system"))
        .respond_with(xml(
            "<response status=\"success\"><result><system>\
             <hostname>fw01</hostname><model>PA-VM</model><serial>007</serial>\
             <sw-version>10.2.4</sw-version></system></result></response>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let info = client.system_info().await.unwrap();
    assert_eq!(info.hostname.as_deref(), Some("fw01"));
    assert_eq!(info.model.as_deref(), Some("PA-VM"));
}

// ── Commit ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_commit_returns_job_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("type=commit"))
        .respond_with(xml(
            "<response status=\"success\" code=\"19\"><result>\
             <msg><line>Commit job enqueued with jobid 42</line></msg>\
             <job>42</job></result></response>",
        ))
        .mount(&server)
        .await;

    let job = client
        .commit(&XmlElement::new("commit"), None)
        .await
        .unwrap();
    assert_eq!(job, Some(42));
}

#[tokio::test]
async fn test_commit_all_sends_action() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("action=all"))
        .respond_with(xml(
            "<response status=\"success\"><result><job>43</job></result></response>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let job = client
        .commit(&XmlElement::new("commit-all"), Some("all"))
        .await
        .unwrap();
    assert_eq!(job, Some(43));
}

#[tokio::test]
async fn test_commit_with_no_changes_has_no_job() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(xml(
            "<response status=\"success\" code=\"19\"><msg>There are no changes to commit.</msg></response>",
        ))
        .mount(&server)
        .await;

    let job = client
        .commit(&XmlElement::new("commit"), None)
        .await
        .unwrap();
    assert_eq!(job, None);
}

// ── Jobs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_show_job() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_string_contains("jobs"))
        .respond_with(xml(
            "<response status=\"success\"><result><job>\
             <id>42</id><type>Commit</type><status>FIN</status><result>OK</result>\
             <progress>100</progress><warnings><line>rule shadowed</line></warnings>\
             </job></result></response>",
        ))
        .mount(&server)
        .await;

    let job = client.show_job(42).await.unwrap();
    assert_eq!(job.id, 42);
    assert_eq!(job.status, JobStatus::Finished);
    assert_eq!(job.result, JobResult::Ok);
    assert_eq!(job.warnings, vec!["rule shadowed"]);
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_envelope_with_lines() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(xml(
            "<response status=\"error\" code=\"17\"><msg>\
             <line>commit failed</line><line>another commit is in progress</line>\
             </msg></response>",
        ))
        .mount(&server)
        .await;

    let result = client.commit(&XmlElement::new("commit"), None).await;
    match result {
        Err(Error::Api { message, code }) => {
            assert_eq!(message, "commit failed another commit is in progress");
            assert_eq!(code.as_deref(), Some("17"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_forbidden_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<response status=\"error\" code=\"403\"><result><msg>Invalid credentials.</msg></result></response>",
        ))
        .mount(&server)
        .await;

    let result = client.system_info().await;
    let err = result.unwrap_err();
    assert!(err.is_auth_failure(), "got: {err:?}");
}

#[tokio::test]
async fn test_non_xml_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = client.system_info().await;
    assert!(
        matches!(result, Err(Error::Http { status: 502, .. })),
        "got: {result:?}"
    );
}
