//! Source-to-source rewrite of jQuery `$.ajax({...})` call sites into
//! `fetch(...)` promise chains.
//!
//! ```ignore
//! let out = ajax_to_fetch::transform(
//!     "$.ajax({ url: '/users', success: render });",
//!     &ajax_to_fetch::TransformConfig::default(),
//! )?;
//! // fetch('/users').then((response) => response.json()).then(render);
//! ```

pub mod config;
pub mod error;
pub mod nodes;
pub mod options;
pub mod pipeline;
pub mod provenance;
pub mod rename;
pub mod rewrite;
pub mod source;
pub mod synth;
pub mod template;

#[cfg(feature = "plugin")]
mod plugin;

pub use config::{CallTarget, ContinuationRename, PrintOptions, QuoteStyle, TransformConfig};
pub use error::{CodemodError, Result};
pub use pipeline::{transform, transform_program, transform_with_report, PassReport, TransformOutput};
