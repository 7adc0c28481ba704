use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::JobClient;
use super::error::ClientError;
use super::types::{
    CreateProcessRequest, CreateProcessResponse, JobHandle, JobOutput, JobRequest,
    JobStatus, ProcessIdRequest, ProcessOutputResponse, ProcessStatusResponse,
};

pub const DEFAULT_ENDPOINT: &str = "https://api.codemaker.ai";

pub struct CodemakerClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl CodemakerClient {
    /// `base_url` is the service root, e.g. [`DEFAULT_ENDPOINT`].
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000))
            .unwrap_or(1000);
        return Err(ClientError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

impl JobClient for CodemakerClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ClientError> {
        let body = CreateProcessRequest::from(request);
        let resp: CreateProcessResponse = self.post("/process", &body).await?;
        Ok(resp.id)
    }

    async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus, ClientError> {
        let resp: ProcessStatusResponse = self
            .post("/process/status", &ProcessIdRequest { id: handle })
            .await?;
        Ok(resp.status)
    }

    async fn fetch_output(&self, handle: &JobHandle) -> Result<JobOutput, ClientError> {
        let resp: ProcessOutputResponse = self
            .post("/process/output", &ProcessIdRequest { id: handle })
            .await?;
        Ok(resp.output)
    }
}
