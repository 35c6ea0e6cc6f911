// Decoding of the generation service's raw text into per-team roasts.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::RoastResult;

const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is not a JSON object of team id -> roast text: {0}")]
    Json(#[from] serde_json::Error),
}

/// Strip one markdown code fence wrapping the response, if present.
///
/// The opening fence line (including any language tag) is dropped, as is a
/// closing fence at the very end.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };
    let body = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => rest,
    };
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Decode a response into a team id -> roast mapping.
pub fn decode_roasts(raw: &str) -> Result<RoastResult, DecodeError> {
    Ok(serde_json::from_str(strip_code_fence(raw))?)
}

/// How a decoded batch lines up with the ids it was asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Requested ids with no roast.
    pub missing: Vec<String>,
    /// Roasts for ids that were not requested.
    pub unexpected: Vec<String>,
}

impl Coverage {
    pub fn check(requested: &[String], roasts: &RoastResult) -> Self {
        let requested_set: BTreeSet<&str> = requested.iter().map(String::as_str).collect();
        let missing = requested
            .iter()
            .filter(|id| !roasts.contains_key(id.as_str()))
            .cloned()
            .collect();
        let unexpected = roasts
            .keys()
            .filter(|k| !requested_set.contains(k.as_str()))
            .cloned()
            .collect();
        Self { missing, unexpected }
    }

    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}
