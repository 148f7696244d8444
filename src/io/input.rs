use std::path::Path;

use anyhow::{Context, Result};

use crate::api::parse_document_response;
use crate::models::SpeechDocument;

/// Load a speech document saved from the `media/<id>` endpoint
pub fn parse_speech_file(path: &Path) -> Result<SpeechDocument> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let source_url = path
        .canonicalize()
        .map(|p| format!("file://{}", p.display()))
        .unwrap_or_else(|_| path.display().to_string());
    parse_document_response(&content, &source_url)
}
