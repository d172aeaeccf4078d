//! Range API behaviour of the password checker against a local mock server

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use privacyguard_foundation::pwned_password::{
    PasswordCheckError, PasswordExposureResult, PwnedPasswordsClient,
};

// SHA-1("password") = 5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8
const PASSWORD_PREFIX: &str = "5BAA6";
const PASSWORD_SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";

fn create_client(mock_server: &MockServer) -> PwnedPasswordsClient {
    PwnedPasswordsClient::new()
        .unwrap()
        .with_base_url(mock_server.uri())
        .with_padding(false)
}

#[tokio::test]
async fn test_breached_password_is_reported() {
    let mock_server = MockServer::start().await;

    let body = format!(
        "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n{}:42\r\n00D4F6E8FA6EECAD2A3AA415EEC418D38EC:2",
        PASSWORD_SUFFIX
    );
    Mock::given(method("GET"))
        .and(path(format!("/range/{}", PASSWORD_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = create_client(&mock_server)
        .check_password("password")
        .await
        .unwrap();
    assert_eq!(result, PasswordExposureResult::pwned(42));
}

#[tokio::test]
async fn test_unknown_password_is_not_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/range/{}", PASSWORD_PREFIX)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("0018A45C4D1DEF81644B54AB7F969B88D65:1\n00D4F6E8FA6EECAD2A3AA415EEC418D38EC:2"),
        )
        .mount(&mock_server)
        .await;

    let result = create_client(&mock_server)
        .check_password("password")
        .await
        .unwrap();
    assert!(!result.is_pwned);
    assert_eq!(result.count, 0);
}

#[tokio::test]
async fn test_only_the_prefix_leaves_the_process() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    create_client(&mock_server)
        .check_password("password")
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url.path(), "/range/5BAA6");
    assert!(request.url.query().is_none());
    assert!(request.body.is_empty());
    assert!(!request.url.as_str().contains(PASSWORD_SUFFIX));
    assert!(!request.url.as_str().contains("password"));
}

#[tokio::test]
async fn test_padding_header_and_padding_entries() {
    let mock_server = MockServer::start().await;

    // Padding entries carry a zero count
    Mock::given(method("GET"))
        .and(path(format!("/range/{}", PASSWORD_PREFIX)))
        .and(header("Add-Padding", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("{}:0", PASSWORD_SUFFIX)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = create_client(&mock_server)
        .with_padding(true)
        .check_password("password")
        .await
        .unwrap();
    assert_eq!(result, PasswordExposureResult::not_pwned());
}

#[tokio::test]
async fn test_server_error_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = create_client(&mock_server).check_password("password").await;
    match result {
        Err(PasswordCheckError::Status(status)) => assert_eq!(status.as_u16(), 503),
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_count_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("{}:lots", PASSWORD_SUFFIX)),
        )
        .mount(&mock_server)
        .await;

    let result = create_client(&mock_server).check_password("password").await;
    assert!(matches!(
        result,
        Err(PasswordCheckError::MalformedCount { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_error() {
    // Nothing listens on port 1
    let client = PwnedPasswordsClient::new()
        .unwrap()
        .with_base_url("http://127.0.0.1:1");
    let result = client.check_password("password").await;
    assert!(matches!(result, Err(PasswordCheckError::Transport(_))));
}

#[tokio::test]
async fn test_empty_password_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = create_client(&mock_server).check_password("").await.unwrap();
    assert_eq!(result, PasswordExposureResult::not_pwned());
}
