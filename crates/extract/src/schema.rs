use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ParseError;
use crate::parser::parse_response;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub verification_result: String,
    pub reason: String,
}

/// A model response attributed to the claim named in its filename.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResponse {
    pub target_id: i64,
    pub source: PathBuf,
    pub raw: String,
    pub verdict: Result<Verdict, ParseError>,
}

impl VerificationResponse {
    pub fn parse(target_id: i64, source: PathBuf, raw: String) -> Self {
        let verdict = parse_response(&raw);
        Self {
            target_id,
            source,
            raw,
            verdict,
        }
    }

    /// Decode raw file bytes. Text that is not UTF-8 is kept (lossily) for
    /// inspection but never parsed.
    pub fn from_bytes(target_id: i64, source: PathBuf, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(raw) => Self::parse(target_id, source, raw),
            Err(e) => Self {
                target_id,
                source,
                raw: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                verdict: Err(ParseError::InvalidEncoding),
            },
        }
    }

    pub fn unreadable(target_id: i64, source: PathBuf, error: &std::io::Error) -> Self {
        Self {
            target_id,
            source,
            raw: String::new(),
            verdict: Err(ParseError::Unreadable(error.to_string())),
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.verdict.is_ok()
    }
}
