use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::MediaError;
use super::traits::{MediaStore, StoredFile};

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Hosted media backend speaking the signed upload/destroy REST API.
///
/// Credentials are constructor parameters; there is no module-level
/// configuration. Uploads send the inline payload verbatim as the `file`
/// form field, so the service does the decoding.
pub struct HostedMediaStore {
    http: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl HostedMediaStore {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), cloud_name, api_key, api_secret)
    }

    /// Point the client at a non-default API host (tests, proxies).
    pub fn with_base_url(
        base_url: String,
        cloud_name: String,
        api_key: String,
        api_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cloud_name,
            api_key,
            api_secret,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{action}", self.base_url, self.cloud_name)
    }

    /// Sign `params`, attach `file` and the credentials, and POST the form.
    async fn post_upload(
        &self,
        file: &str,
        mut params: BTreeMap<&'static str, String>,
    ) -> Result<StoredFile, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        params.insert("timestamp", timestamp);
        let signature = sign(&params, &self.api_secret);

        let mut form: Vec<(&str, String)> = params.into_iter().collect();
        form.push(("file", file.to_string()));
        form.push(("api_key", self.api_key.clone()));
        form.push(("signature", signature));

        let response = self
            .http
            .post(self.endpoint("upload"))
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !status.is_success() {
            return Err(MediaError::Upload(service_message(&body)));
        }

        let uploaded: UploadResponse =
            serde_json::from_str(&body).map_err(|e| MediaError::Upload(e.to_string()))?;

        debug!(public_id = %uploaded.public_id, "uploaded media asset");

        Ok(StoredFile {
            public_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }
}

#[async_trait]
impl MediaStore for HostedMediaStore {
    async fn upload(&self, file: &str, folder: &str) -> Result<StoredFile, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        // Image resource type so the PDF renders inline.
        params.insert("format", "pdf".to_string());
        params.insert("use_filename", "true".to_string());
        params.insert("unique_filename", "false".to_string());
        self.post_upload(file, params).await
    }

    async fn upload_image(&self, file: &str, folder: &str) -> Result<StoredFile, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        params.insert("quality", "auto".to_string());
        params.insert("fetch_format", "auto".to_string());
        self.post_upload(file, params).await
    }

    async fn delete(&self, public_id: &str) -> Result<bool, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign(&params, &self.api_secret);

        let mut form: Vec<(&str, String)> = params.into_iter().collect();
        form.push(("api_key", self.api_key.clone()));
        form.push(("signature", signature));

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::Deletion(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MediaError::Deletion(e.to_string()))?;

        if !status.is_success() {
            return Err(MediaError::Deletion(service_message(&body)));
        }

        let destroyed: DestroyResponse =
            serde_json::from_str(&body).map_err(|e| MediaError::Deletion(e.to_string()))?;

        Ok(destroyed.result == "ok")
    }
}

/// SHA-256 request signature: sorted `key=value` pairs joined with `&`,
/// with the API secret appended.
fn sign(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Pull the error message out of a service error body, falling back to the
/// raw body when it isn't the expected JSON shape.
fn service_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
