//! Typed client for the Bricklane instructions API.
//!
//! Wraps the five instruction operations plus the product listing and
//! login. Reads go through a small invalidating cache (see [`cache`]);
//! mutations clear it so dependent views refetch.

mod cache;
pub mod types;

use std::sync::Mutex;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cache::Cache;
pub use crate::types::{
    FileDescriptor, Instruction, InstructionPatch, Mutation, NewInstruction, Product, ProductBrief,
    ProductRef, Session,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the request; carries its `message` string.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ListEnvelope {
    instructions: Vec<Instruction>,
}

#[derive(Deserialize)]
struct DetailEnvelope {
    instruction: Instruction,
}

#[derive(Deserialize)]
struct MutationEnvelope {
    message: String,
    instruction: Instruction,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: String,
}

#[derive(Deserialize)]
struct ProductsEnvelope {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: String,
}

pub struct InstructionsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    cache: Mutex<Cache>,
}

impl InstructionsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            cache: Mutex::new(Cache::default()),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Exchange credentials for a bearer token. Does not mutate the
    /// client; call [`set_token`](Self::set_token) with the result.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.request_json(Method::POST, "/api/v1/auth/login", Some(&body))
            .await
    }

    /// Products for the selector in the admin forms.
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let envelope: ProductsEnvelope = self
            .request_json(Method::GET, "/api/v1/products", None)
            .await?;
        Ok(envelope.products)
    }

    /// The one cached query: all instructions, optionally filtered by
    /// product, newest first.
    pub async fn list(&self, product: Option<i32>) -> Result<Vec<Instruction>, ClientError> {
        if let Some(cached) = self.cache.lock().unwrap().list(product) {
            return Ok(cached);
        }

        let path = match product {
            Some(id) => format!("/api/v1/instructions?product={id}"),
            None => "/api/v1/instructions".to_string(),
        };
        let envelope: ListEnvelope = self.request_json(Method::GET, &path, None).await?;

        self.cache
            .lock()
            .unwrap()
            .put_list(product, envelope.instructions.clone());
        Ok(envelope.instructions)
    }

    pub async fn get(&self, id: &str) -> Result<Instruction, ClientError> {
        if let Some(cached) = self.cache.lock().unwrap().record(id) {
            return Ok(cached);
        }

        let envelope: DetailEnvelope = self
            .request_json(Method::GET, &format!("/api/v1/instructions/{id}"), None)
            .await?;

        self.cache
            .lock()
            .unwrap()
            .put_record(envelope.instruction.clone());
        Ok(envelope.instruction)
    }

    pub async fn create(&self, new: &NewInstruction) -> Result<Mutation, ClientError> {
        let body = serde_json::to_value(new).map_err(|e| ClientError::Decode(e.to_string()))?;
        let envelope: MutationEnvelope = self
            .request_json(Method::POST, "/api/v1/admin/instructions", Some(&body))
            .await?;

        self.cache.lock().unwrap().invalidate(None);
        Ok(Mutation {
            message: envelope.message,
            instruction: envelope.instruction,
        })
    }

    pub async fn update(
        &self,
        id: &str,
        patch: &InstructionPatch,
    ) -> Result<Mutation, ClientError> {
        let body = serde_json::to_value(patch).map_err(|e| ClientError::Decode(e.to_string()))?;
        let envelope: MutationEnvelope = self
            .request_json(
                Method::PUT,
                &format!("/api/v1/admin/instructions/{id}"),
                Some(&body),
            )
            .await?;

        self.cache.lock().unwrap().invalidate(Some(id));
        Ok(Mutation {
            message: envelope.message,
            instruction: envelope.instruction,
        })
    }

    /// Replace the PDF. `file` is the inline-encoded payload; submits
    /// immediately, independent of any metadata update.
    pub async fn replace_file(&self, id: &str, file: &str) -> Result<Mutation, ClientError> {
        let body = serde_json::json!({ "file": file });
        let envelope: MutationEnvelope = self
            .request_json(
                Method::PUT,
                &format!("/api/v1/admin/instructions/{id}/file"),
                Some(&body),
            )
            .await?;

        self.cache.lock().unwrap().invalidate(Some(id));
        Ok(Mutation {
            message: envelope.message,
            instruction: envelope.instruction,
        })
    }

    /// Delete the instruction and its remote asset. Returns the server's
    /// confirmation message.
    pub async fn delete(&self, id: &str) -> Result<String, ClientError> {
        let envelope: MessageEnvelope = self
            .request_json(
                Method::DELETE,
                &format!("/api/v1/admin/instructions/{id}"),
                None,
            )
            .await?;

        self.cache.lock().unwrap().invalidate(Some(id));
        Ok(envelope.message)
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ClientError> {
        let mut builder = self.builder(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Turn a failed response into [`ClientError::Api`], surfacing the
/// server's `message` when the body has the expected envelope.
fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
