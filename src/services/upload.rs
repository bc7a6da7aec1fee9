//! Multipart handling for `POST /api/prds/generate`.
//!
//! The document is streamed to a temporary file with the size cap enforced
//! per chunk, then handed to the text extractor. The temporary file is
//! removed when the upload goes out of scope.

use std::path::Path;

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::parse_bool;
use crate::error::{AppError, AppResult};
use crate::models::GenerationOptions;
use crate::services::extraction::{self, ExtractError};

/// Longest accepted value for a non-file form field.
const MAX_FIELD_BYTES: usize = 64;

/// Extracted document text plus the options submitted with it.
#[derive(Debug)]
pub struct PrdUpload {
    pub text: String,
    pub filename: String,
    pub options: GenerationOptions,
}

/// Read the multipart body: one document and the boolean option fields.
pub async fn read_prd_upload(
    mut payload: Multipart,
    max_upload_size: usize,
    upload_dir: Option<&Path>,
) -> AppResult<PrdUpload> {
    let mut options = GenerationOptions::default();
    let mut document: Option<(String, NamedTempFile)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
        let field_name = content_disposition.get_name().unwrap_or_default().to_string();
        let filename = content_disposition.get_filename().map(|f| f.to_string());

        if let Some(filename) = filename {
            if document.is_some() {
                return Err(AppError::InvalidInput(
                    "Only one file may be uploaded per request".to_string(),
                ));
            }
            let temp = stream_to_temp(&mut field, max_upload_size, upload_dir).await?;
            document = Some((filename, temp));
            continue;
        }

        let target = match field_name.as_str() {
            "extractPersonas" => &mut options.extract_personas,
            "identifyFeatures" => &mut options.identify_features,
            "generateAcceptanceCriteria" => &mut options.generate_acceptance_criteria,
            other => {
                warn!("Ignoring unknown form field '{}'", other);
                drain_field(&mut field).await;
                continue;
            }
        };
        let value = read_text_field(&mut field).await?;
        *target = parse_bool(&value).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Field '{}' must be true or false, got '{}'",
                field_name, value
            ))
        })?;
    }

    let (filename, temp) = document.ok_or_else(|| {
        AppError::InvalidInput("No file uploaded. Attach a TXT or DOCX document".to_string())
    })?;

    let text = extraction::extract_file(temp.path(), &filename, max_upload_size as u64).await?;
    info!(
        "Accepted upload '{}' ({} characters, {:?})",
        filename,
        text.chars().count(),
        options
    );

    Ok(PrdUpload {
        text,
        filename,
        options,
    })
}

async fn stream_to_temp(
    field: &mut Field,
    max_upload_size: usize,
    upload_dir: Option<&Path>,
) -> AppResult<NamedTempFile> {
    let builder = {
        let mut builder = tempfile::Builder::new();
        builder.prefix("prd-upload-");
        builder
    };
    let temp = match upload_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?;

    let mut file = tokio::fs::File::from_std(temp.reopen()?);
    let mut size: usize = 0;
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        size += data.len();
        if size > max_upload_size {
            return Err(ExtractError::FileTooLarge {
                size: size as u64,
                max: max_upload_size as u64,
            }
            .into());
        }
        file.write_all(&data).await?;
    }
    file.flush().await?;

    Ok(temp)
}

async fn read_text_field(field: &mut Field) -> AppResult<String> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        data.extend_from_slice(&chunk);
        if data.len() > MAX_FIELD_BYTES {
            return Err(AppError::InvalidInput("Form field value too long".to_string()));
        }
    }
    Ok(String::from_utf8_lossy(&data).trim().to_string())
}

/// Drain a multipart field without keeping it.
async fn drain_field(field: &mut Field) {
    while let Some(chunk) = field.next().await {
        let _ = chunk;
    }
}
