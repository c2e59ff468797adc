//! AssemblyAI API client.
//!
//! Handles transcription requests using an upload→transcribe→poll pattern:
//! 1. Upload audio binary data to get an upload URL
//! 2. Submit a transcription request with the upload URL and options
//! 3. Poll for the completed transcript
//!
//! Uploads retry with exponential backoff on transient failures; polling runs
//! at 3-second intervals (the AssemblyAI recommended cadence) with a bounded
//! attempt count.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::file::TranscriptionConfig;

/// AssemblyAI API base URL
const BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Maximum number of poll attempts before timing out (5 minutes at 3-second intervals)
const MAX_POLL_ATTEMPTS: u32 = 100;

/// Polling interval in seconds
const POLL_INTERVAL_SECS: u64 = 3;

/// Maximum retry attempts for transient upload errors
const MAX_UPLOAD_RETRIES: u32 = 3;

/// Initial retry delay for upload failures (doubles with each retry)
const INITIAL_RETRY_DELAY_MS: u64 = 1000;

/// Response from the upload endpoint
#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Request body for the transcription endpoint
#[derive(Debug, Serialize)]
struct TranscriptRequest {
    audio_url: String,
    punctuate: bool,
    format_text: bool,
    language_detection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyterms_prompt: Option<Vec<String>>,
}

/// Response from the transcription endpoint (both submit and poll)
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    text: Option<String>,
    error: Option<String>,
}

/// Transcribes an audio file using AssemblyAI's API.
///
/// # Errors
/// - If the audio file cannot be read from disk
/// - If the API request fails due to network issues (connection, timeout)
/// - If the API returns an HTTP error (401 for invalid key, 429 for rate limit, etc.)
/// - If the transcription itself fails or times out
pub async fn transcribe(
    api_key: &str,
    options: &TranscriptionConfig,
    audio_path: &Path,
) -> anyhow::Result<String> {
    let audio_data = std::fs::read(audio_path)
        .map_err(|e| anyhow::anyhow!("Failed to read audio file: {e}"))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

    // Step 1: Upload audio with retry logic for transient failures
    let upload_url = upload_with_retry(&client, api_key, &audio_data).await?;

    // Step 2: Submit transcription request
    let request = TranscriptRequest {
        audio_url: upload_url,
        punctuate: options.punctuate,
        format_text: options.format_text,
        language_detection: options.language_detection,
        keyterms_prompt: if options.keywords.is_empty() {
            None
        } else {
            Some(options.keywords.clone())
        },
    };

    tracing::debug!("Submitting transcription request...");
    let submit_response = client
        .post(format!("{BASE_URL}/transcript"))
        .header("Authorization", api_key)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .map_err(network_error)?;

    if !submit_response.status().is_success() {
        let status = submit_response.status();
        let error_body = submit_response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(format_error(status.as_u16(), &error_body)));
    }

    let transcript: TranscriptResponse = submit_response
        .json()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse AssemblyAI submit response: {e}"))?;

    let transcript_id = transcript.id;
    tracing::debug!("Transcription submitted, id: {transcript_id}");

    // Step 3: Poll for result with timeout
    let poll_url = format!("{BASE_URL}/transcript/{transcript_id}");
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        if attempts > MAX_POLL_ATTEMPTS {
            return Err(anyhow::anyhow!(
                "AssemblyAI transcription timed out after {} seconds. The audio may be too long or the API is experiencing delays.",
                MAX_POLL_ATTEMPTS as u64 * POLL_INTERVAL_SECS
            ));
        }

        let poll_response = client
            .get(&poll_url)
            .header("Authorization", api_key)
            .send()
            .await
            .map_err(network_error)?;

        if !poll_response.status().is_success() {
            let status = poll_response.status();
            let error_body = poll_response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(format_error(status.as_u16(), &error_body)));
        }

        let result: TranscriptResponse = poll_response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse AssemblyAI poll response: {e}"))?;

        tracing::debug!(
            "Poll attempt {}/{}: status={}, id={}",
            attempts,
            MAX_POLL_ATTEMPTS,
            result.status,
            result.id
        );

        match result.status.as_str() {
            "completed" => {
                let text = result.text.ok_or_else(|| {
                    anyhow::anyhow!("AssemblyAI returned completed status but no transcript text")
                })?;
                let trimmed = text.trim().to_string();
                tracing::debug!("Transcription completed: {} chars", trimmed.len());
                return Ok(trimmed);
            }
            "error" => {
                let error = result
                    .error
                    .unwrap_or_else(|| "Unknown transcription error".to_string());
                return Err(anyhow::anyhow!("AssemblyAI transcription failed: {error}"));
            }
            _ => {
                // Still processing (queued, processing, etc.)
                tokio::time::sleep(Duration::from_secs(POLL_INTERVAL_SECS)).await;
            }
        }
    }
}

/// Uploads audio to AssemblyAI with exponential backoff retry logic.
async fn upload_with_retry(
    client: &reqwest::Client,
    api_key: &str,
    audio_data: &[u8],
) -> anyhow::Result<String> {
    let mut retries = 0;
    let mut delay_ms = INITIAL_RETRY_DELAY_MS;

    loop {
        tracing::debug!(
            "Uploading audio to AssemblyAI (attempt {} of {})...",
            retries + 1,
            MAX_UPLOAD_RETRIES + 1
        );

        match try_upload(client, api_key, audio_data).await {
            Ok(upload_url) => return Ok(upload_url),
            Err(e) => {
                retries += 1;
                if retries > MAX_UPLOAD_RETRIES {
                    return Err(anyhow::anyhow!(
                        "Failed to upload audio after {} attempts: {}",
                        MAX_UPLOAD_RETRIES + 1,
                        e
                    ));
                }

                tracing::warn!(
                    "Upload attempt {} failed: {}. Retrying in {}ms...",
                    retries,
                    e,
                    delay_ms
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms *= 2;
            }
        }
    }
}

/// Attempts a single upload request to AssemblyAI.
async fn try_upload(
    client: &reqwest::Client,
    api_key: &str,
    audio_data: &[u8],
) -> anyhow::Result<String> {
    let upload_response = client
        .post(format!("{BASE_URL}/upload"))
        .header("Authorization", api_key)
        .header("Content-Type", "application/octet-stream")
        .body(audio_data.to_vec())
        .send()
        .await
        .map_err(network_error)?;

    if !upload_response.status().is_success() {
        let status = upload_response.status();
        let error_body = upload_response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(format_error(status.as_u16(), &error_body)));
    }

    let upload: UploadResponse = upload_response
        .json()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse AssemblyAI upload response: {e}"))?;

    tracing::debug!("Audio uploaded successfully");
    Ok(upload.upload_url)
}

/// Maps reqwest failures to human-readable messages.
fn network_error(e: reqwest::Error) -> anyhow::Error {
    if e.is_connect() {
        anyhow::anyhow!("Failed to connect to AssemblyAI API server. Check your internet connection.")
    } else if e.is_timeout() {
        anyhow::anyhow!("Request to AssemblyAI timed out. The API server is not responding.")
    } else {
        anyhow::anyhow!("AssemblyAI network error: {e}")
    }
}

/// Formats HTTP error codes into human-readable messages.
fn format_error(status: u16, error_body: &str) -> String {
    match status {
        401 => "AssemblyAI API key is invalid or expired. Please run 'rectap auth' to update your API key.".to_string(),
        403 => "You don't have permission to use AssemblyAI's API. Check your API key and account status.".to_string(),
        429 => "Too many requests to AssemblyAI. You've hit the API rate limit. Please wait and try again.".to_string(),
        500 | 502 | 503 | 504 => "AssemblyAI API server is experiencing issues. Please try again later.".to_string(),
        _ => format!("AssemblyAI API error (status {status}): {error_body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_suggest_rerunning_auth() {
        assert!(format_error(401, "").contains("rectap auth"));
    }

    #[test]
    fn unknown_status_includes_body() {
        let msg = format_error(418, "teapot");
        assert!(msg.contains("418"));
        assert!(msg.contains("teapot"));
    }
}
