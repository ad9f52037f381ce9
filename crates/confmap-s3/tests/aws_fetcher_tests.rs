use confmap::{CancellationToken, ErrorKind, Provider, ProviderError};
use confmap_s3::{CredentialSource, S3Provider, S3ProviderConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const URI: &str = "s3://bucket-x.s3.us-west-2.amazonaws.com/dir/key.yaml";

fn static_credentials() -> CredentialSource {
    CredentialSource::Static {
        access_key_id: "AKIDEXAMPLE".into(),
        secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
        session_token: None,
    }
}

async fn provider_for(server: &MockServer, credentials: CredentialSource) -> S3Provider {
    S3Provider::from_config(S3ProviderConfig {
        credentials,
        endpoint_url: Some(server.uri()),
        force_path_style: true,
    })
    .await
}

fn s3_error(code: &str, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Error><Code>{code}</Code><Message>{message}</Message>\
         <RequestId>4442587FB7D0A2F9</RequestId></Error>"
    )
}

#[tokio::test]
async fn downloads_object_from_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bucket-x/dir/key.yaml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("service:\n  pipelines: {}\n")
                .insert_header("content-type", "application/yaml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, static_credentials()).await;
    let retrieved = provider
        .retrieve(&CancellationToken::new(), URI, None)
        .await
        .unwrap();

    assert!(retrieved.to_json()["service"]["pipelines"].is_object());
}

#[tokio::test]
async fn no_such_key_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bucket-x/dir/key.yaml"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(s3_error("NoSuchKey", "The specified key does not exist."))
                .insert_header("content-type", "application/xml"),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, static_credentials()).await;
    let err = provider
        .retrieve(&CancellationToken::new(), URI, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteNotFound);
}

#[tokio::test]
async fn access_denied_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bucket-x/dir/key.yaml"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string(s3_error("AccessDenied", "Access Denied"))
                .insert_header("content-type", "application/xml"),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, static_credentials()).await;
    let err = provider
        .retrieve(&CancellationToken::new(), URI, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Remote { status: Some(403), .. }));
}

#[tokio::test]
async fn empty_static_keys_fail_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let credentials = CredentialSource::Static {
        access_key_id: String::new(),
        secret_access_key: String::new(),
        session_token: None,
    };
    let provider = provider_for(&server, credentials).await;
    let err = provider
        .retrieve(&CancellationToken::new(), URI, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthConfigurationMissing);
}

#[tokio::test]
async fn malformed_uri_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider_for(&server, static_credentials()).await;
    let err = provider
        .retrieve(
            &CancellationToken::new(),
            "s3://bucket-x.s3.us-west-2.amazonaws.com/",
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedUri);
}
