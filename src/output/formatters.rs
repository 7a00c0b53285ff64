use anyhow::Result;
use serde::Serialize;

use crate::transcribe::{TranscriptEntry, TranscriptResult};
use crate::utils::{format_clock, format_timestamp};

/// JSON envelope shared with the HTTP route
#[derive(Debug, Serialize)]
pub struct TranscriptEnvelope<'a> {
    pub transcriptions: &'a [TranscriptEntry],
}

/// Plain text, one caption per line
pub fn format_as_text(result: &TranscriptResult, include_timestamps: bool) -> String {
    result
        .entries
        .iter()
        .map(|entry| {
            if include_timestamps {
                format!("[{}] {}", format_clock(entry.offset), entry.text)
            } else {
                entry.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_as_json(result: &TranscriptResult) -> Result<String> {
    let envelope = TranscriptEnvelope {
        transcriptions: &result.entries,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn format_as_srt(result: &TranscriptResult) -> String {
    let mut out = String::new();
    for (index, entry) in result.entries.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_timestamp(entry.offset, ','),
            format_timestamp(entry.end(), ','),
            entry.text
        ));
    }
    out
}

pub fn format_as_vtt(result: &TranscriptResult) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for entry in &result.entries {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            format_timestamp(entry.offset, '.'),
            format_timestamp(entry.end(), '.'),
            entry.text
        ));
    }
    out
}
