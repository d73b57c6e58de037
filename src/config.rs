use std::fmt;

use serde::Deserialize;

use crate::error::Result;

// -----------------------------------------------------------------------------
// Call-site patterns
// -----------------------------------------------------------------------------

/// A `root.method(...)` call pattern, e.g. `$.ajax`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallTarget {
    pub object: String,
    pub method: String,
}

impl CallTarget {
    pub fn new(object: &str, method: &str) -> Self {
        Self {
            object: object.to_string(),
            method: method.to_string(),
        }
    }

    pub fn matches(&self, object: &str, method: &str) -> bool {
        self.object == object && self.method == method
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object, self.method)
    }
}

/// Legacy continuation name and the promise-chain name it becomes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContinuationRename {
    pub from: String,
    pub to: String,
}

impl ContinuationRename {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// Printing
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    pub fn char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintOptions {
    pub quote: QuoteStyle,
    pub trailing_comma: bool,
    pub tab_width: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            quote: QuoteStyle::Single,
            trailing_comma: true,
            tab_width: 4,
        }
    }
}

// -----------------------------------------------------------------------------
// Transform config
// -----------------------------------------------------------------------------

pub const DEFAULT_URL_ENCODER: &str = "REPLACE_WITH_QUERY_STRING_TRANSFORM_AT_URL";
pub const DEFAULT_BODY_ENCODER: &str = "REPLACE_WITH_QUERY_STRING_TRANSFORM_AT_BODY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformConfig {
    /// Call sites rewritten by the primary pass, in order.
    pub targets: Vec<CallTarget>,
    /// Root calls that make a `.done`/`.fail` chain eligible for renaming.
    pub provenance_roots: Vec<CallTarget>,
    /// Rename passes, run in order before each primary pass.
    pub continuations: Vec<ContinuationRename>,
    pub request_fn: String,
    /// Wraps a GET body folded into the query string.
    pub url_encoder: String,
    /// Wraps an object or identifier body sent as form data.
    pub body_encoder: String,
    pub print: PrintOptions,
}

impl Default for TransformConfig {
    fn default() -> Self {
        let roots = ["$", "jQuery"]
            .iter()
            .flat_map(|o| ["ajax", "get", "getJSON"].map(|m| CallTarget::new(o, m)))
            .collect();
        Self {
            targets: vec![CallTarget::new("$", "ajax"), CallTarget::new("jQuery", "ajax")],
            provenance_roots: roots,
            continuations: vec![
                ContinuationRename::new("done", "then"),
                ContinuationRename::new("fail", "catch"),
            ],
            request_fn: "fetch".to_string(),
            url_encoder: DEFAULT_URL_ENCODER.to_string(),
            body_encoder: DEFAULT_BODY_ENCODER.to_string(),
            print: PrintOptions::default(),
        }
    }
}

impl TransformConfig {
    /// Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
