//! HTTP Upload Client
//!
//! Talks to the upload microservice using reqwest.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header::CONTENT_DISPOSITION, header::CONTENT_TYPE, Client, StatusCode};
use serde::Deserialize;

use contactdesk::{DomainError, DownloadedFile, UploadClient, UploadedFile};

use crate::config::UploadSettings;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const FALLBACK_FILE_NAME: &str = "download";

/// Upload service response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_id: String,
    object_name: String,
    #[serde(default)]
    bucket: String,
    file_size: i64,
    uploaded_at: DateTime<Utc>,
}

/// reqwest implementation of UploadClient
pub struct HttpUploadClient {
    client: Client,
    base_url: String,
}

impl HttpUploadClient {
    pub fn new(settings: &UploadSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl UploadClient for HttpUploadClient {
    async fn upload(
        &self,
        object_name: &str,
        content: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<UploadedFile, DomainError> {
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| DomainError::ExternalService(format!("Invalid content type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("objectName", object_name.to_string())
            .text("contentType", content_type.to_string());

        let response = self
            .client
            .post(self.url("/api/v1/upload"))
            .multipart(form)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                tracing::error!(object_name, error = %e, "Failed to upload file");
                DomainError::ExternalService(format!("Upload failed: {e}"))
            })?;

        let body: UploadResponse = response.json().await.map_err(|e| {
            tracing::error!(object_name, error = %e, "Invalid response from upload service");
            DomainError::ExternalService(format!("Invalid response from upload service: {e}"))
        })?;

        tracing::info!(object_name, file_id = %body.file_id, "File uploaded");

        Ok(UploadedFile {
            file_id: body.file_id,
            object_name: body.object_name,
            bucket: body.bucket,
            file_size: body.file_size,
            uploaded_at: body.uploaded_at,
        })
    }

    async fn delete(&self, file_id: &str) -> Result<bool, DomainError> {
        let response = match self
            .client
            .delete(self.url(&format!("/api/v1/files/{}", file_id)))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(file_id, error = %e, "Error deleting file");
                return Ok(false);
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::info!(file_id, "File deleted");
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            tracing::warn!(file_id, "File not found for deletion");
            Ok(true)
        } else {
            tracing::warn!(file_id, status = %status, "Failed to delete file");
            Ok(false)
        }
    }

    async fn download(&self, file_id: &str) -> Result<DownloadedFile, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/files/{}/download", file_id)))
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                tracing::error!(file_id, error = %e, "Failed to download file");
                DomainError::ExternalService(format!("Download failed: {e}"))
            })?;

        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let file_name = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(file_name_from_disposition)
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());

        let content = response.bytes().await.map_err(|e| {
            tracing::error!(file_id, error = %e, "Failed to read download body");
            DomainError::ExternalService(format!("Download failed: {e}"))
        })?;

        tracing::info!(file_id, "File downloaded");

        Ok(DownloadedFile {
            file_size: content.len() as i64,
            content: content.to_vec(),
            content_type,
            file_name,
        })
    }
}

/// `filename` parameter of a `Content-Disposition` value, unquoted
fn file_name_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (key, raw) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("filename")
                .then(|| raw.trim().trim_matches('"').to_string())
        })
        .filter(|name| !name.is_empty())
}
