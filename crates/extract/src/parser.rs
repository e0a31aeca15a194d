use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::ParseError;
use crate::literal::{Literal, parse_mapping};
use crate::schema::Verdict;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// Body of the first fenced block, trimmed.
pub fn fenced_block(raw: &str) -> Option<&str> {
    FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Pull a verdict out of a free-text model response.
///
/// A fenced block wins if present. Otherwise the whole text is tried, and
/// failing that the outermost `{ ... }` span inside it.
pub fn parse_response(raw: &str) -> Result<Verdict, ParseError> {
    if let Some(body) = fenced_block(raw) {
        return verdict_from_candidate(body);
    }

    let candidate = raw.trim();
    match verdict_from_candidate(candidate) {
        Ok(verdict) => Ok(verdict),
        Err(first_err) => match embedded_mapping(candidate) {
            Some(span) if span != candidate => verdict_from_candidate(span),
            _ => Err(first_err),
        },
    }
}

fn embedded_mapping(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn verdict_from_candidate(candidate: &str) -> Result<Verdict, ParseError> {
    let mut fields = parse_mapping(candidate)?;
    Ok(Verdict {
        verification_result: take_string(&mut fields, "verification_result")?,
        reason: take_string(&mut fields, "reason")?,
    })
}

fn take_string(
    fields: &mut BTreeMap<String, Literal>,
    field: &'static str,
) -> Result<String, ParseError> {
    match fields.remove(field) {
        Some(Literal::Str(s)) => Ok(s),
        Some(other) => Err(ParseError::WrongType {
            field,
            found: other.type_name(),
        }),
        None => Err(ParseError::MissingField(field)),
    }
}
