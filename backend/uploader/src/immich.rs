/// Immich upload client.
///
/// Sends one asset per call as a multipart/form-data POST to `/api/assets`.
/// The SHA-1 checksum of the raw bytes doubles as the `deviceAssetId` form
/// field and the `x-immich-checksum` header, so the server can deduplicate
/// files sent twice.
///
/// Required env vars (read by the CLI, not here):
///   IMMICH_SERVER — base URL, e.g. https://photos.example.com
///   IMMICH_TOKEN  — API key sent as x-api-key
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{header, multipart, Client};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::debug;

use courier_core::{UploadError, Uploader};

/// Device identifier reported for every relayed asset.
const DEVICE_ID: &str = "telegram";

// ---------------------------------------------------------------------------
// Immich wire types
// ---------------------------------------------------------------------------

/// Body returned by Immich on a successful upload.
#[derive(Deserialize, Debug)]
struct AssetResponse {
    id: String,
    /// "created" or "duplicate"; absent on some server versions.
    #[serde(default)]
    status: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ImmichClient {
    server: String,
    api_key: String,
    http: Client,
}

impl ImmichClient {
    pub fn new(server: &str, api_key: &str) -> Self {
        Self {
            server: server.into(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }
}

/// Hex-encoded SHA-1 digest of the file content.
fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[async_trait]
impl Uploader for ImmichClient {
    async fn upload(
        &self,
        content: Vec<u8>,
        filename: &str,
        tags: &[String],
    ) -> Result<String, UploadError> {
        let checksum = sha1_hex(&content);
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let file_part = multipart::Part::bytes(content).file_name(filename.to_owned());
        let mut form = multipart::Form::new()
            .part("assetData", file_part)
            .text("deviceAssetId", checksum.clone())
            .text("deviceId", DEVICE_ID)
            .text("fileCreatedAt", now.clone())
            .text("fileModifiedAt", now);
        if !tags.is_empty() {
            form = form.text("tags", serde_json::to_string(tags).unwrap_or_default());
        }

        let response = self
            .http
            .post(format!("{}/api/assets", self.server))
            .header(header::ACCEPT, "application/json")
            .header("x-immich-checksum", checksum.as_str())
            .header("x-api-key", self.api_key.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(UploadError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let asset: AssetResponse =
            serde_json::from_str(&body).map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        debug!("Uploaded {} as asset {} ({})", filename, asset.id, asset.status);
        Ok(asset.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn created_body(id: &str) -> serde_json::Value {
        serde_json::json!({ "id": id, "status": "created" })
    }

    #[test]
    fn checksum_matches_known_vector() {
        // SHA-1 of "abc", the classic FIPS 180-1 vector.
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[tokio::test]
    async fn upload_returns_the_asset_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/assets"))
            .and(header_eq("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(201).set_body_json(created_body("asset-1")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ImmichClient::new(&server.uri(), "secret");
        let id = client
            .upload(b"jpeg bytes".to_vec(), "photo_abc.jpg", &[])
            .await
            .unwrap();
        assert_eq!(id, "asset-1");
    }

    #[tokio::test]
    async fn checksum_is_sent_as_header_and_form_field() {
        let server = MockServer::start().await;
        let content = b"route these bytes".to_vec();
        let checksum = sha1_hex(&content);

        Mock::given(method("POST"))
            .and(path("/api/assets"))
            .and(header_eq("x-immich-checksum", checksum.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(created_body("asset-2")))
            .mount(&server)
            .await;

        let client = ImmichClient::new(&server.uri(), "secret");
        client.upload(content, "photo_y.jpg", &[]).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains(&format!("name=\"deviceAssetId\"\r\n\r\n{checksum}")));
        assert!(body.contains("name=\"deviceId\"\r\n\r\ntelegram"));
        assert!(body.contains("filename=\"photo_y.jpg\""));
        assert!(body.contains("name=\"fileCreatedAt\""));
        assert!(body.contains("name=\"fileModifiedAt\""));
    }

    #[tokio::test]
    async fn tags_go_out_as_a_json_array() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/assets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(created_body("asset-3")))
            .mount(&server)
            .await;

        let client = ImmichClient::new(&server.uri(), "secret");
        client
            .upload(b"x".to_vec(), "a.jpg", &["trip".to_string(), "2024".to_string()])
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"tags\"\r\n\r\n[\"trip\",\"2024\"]"));
    }

    #[tokio::test]
    async fn no_tags_field_when_none_are_given() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/assets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(created_body("asset-4")))
            .mount(&server)
            .await;

        let client = ImmichClient::new(&server.uri(), "secret");
        client.upload(b"x".to_vec(), "a.jpg", &[]).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(!body.contains("name=\"tags\""));
    }

    #[tokio::test]
    async fn non_2xx_is_an_api_error_with_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/assets"))
            .respond_with(ResponseTemplate::new(400).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = ImmichClient::new(&server.uri(), "secret");
        let err = client.upload(b"x".to_vec(), "a.jpg", &[]).await.unwrap_err();
        match err {
            UploadError::Api { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/assets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ImmichClient::new(&server.uri(), "secret");
        let err = client.upload(b"x".to_vec(), "a.jpg", &[]).await.unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = ImmichClient::new("http://127.0.0.1:9", "secret");
        let err = client.upload(b"x".to_vec(), "a.jpg", &[]).await.unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
    }
}
