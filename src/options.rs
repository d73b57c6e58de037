//! Decomposition of a `$.ajax` settings object into request fields.

use swc_core::{common::DUMMY_SP, ecma::ast::*};
use thiserror::Error;

use crate::{
    config::{QuoteStyle, TransformConfig},
    nodes, template,
};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Why a call site was left as written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    #[error("expected a single settings argument, found {0}")]
    ArgumentCount(usize),
    #[error("settings argument is not an object literal")]
    NotAnObject,
    #[error("spread in settings")]
    Spread,
    #[error("computed settings key")]
    ComputedKey,
    #[error("`{0}` is an accessor, not a value")]
    Accessor(String),
    #[error("no `url` setting")]
    MissingUrl,
}

// -----------------------------------------------------------------------------
// Entries
// -----------------------------------------------------------------------------

/// One property of the settings object, classified by key.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub key: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone)]
pub enum EntryKind {
    Target(Box<Expr>),
    Method(Box<Expr>),
    Body(Box<Expr>),
    ContentType(Box<Expr>),
    Headers(Box<Expr>),
    CacheHint(Box<Expr>),
    Ignored,
    SuccessCallback(Box<Expr>),
    ErrorCallback(Box<Expr>),
    /// Carried into the request init verbatim.
    Passthrough(Box<Prop>),
}

impl ConfigEntry {
    pub fn from_prop(prop: &Prop) -> Result<Self, Unsupported> {
        let key = prop_key(prop)?;
        let value = || prop_value(prop, &key);
        let kind = match key.as_str() {
            "url" => EntryKind::Target(value()?),
            "type" | "method" => EntryKind::Method(value()?),
            "data" => EntryKind::Body(value()?),
            "contentType" => EntryKind::ContentType(value()?),
            "headers" => EntryKind::Headers(value()?),
            "cache" => EntryKind::CacheHint(value()?),
            "success" => EntryKind::SuccessCallback(value()?),
            "error" | "failure" => EntryKind::ErrorCallback(value()?),
            // fetch always parses JSON; `traditional` has no counterpart
            "dataType" | "traditional" => EntryKind::Ignored,
            _ => EntryKind::Passthrough(Box::new(prop.clone())),
        };
        Ok(Self { key, kind })
    }
}

fn prop_key(prop: &Prop) -> Result<String, Unsupported> {
    let name = match prop {
        Prop::Shorthand(i) => return Ok(i.sym.to_string()),
        Prop::Assign(a) => return Ok(a.key.sym.to_string()),
        Prop::KeyValue(kv) => &kv.key,
        Prop::Method(m) => &m.key,
        Prop::Getter(g) => &g.key,
        Prop::Setter(s) => &s.key,
    };
    nodes::prop_name_str(name).ok_or(Unsupported::ComputedKey)
}

fn prop_value(prop: &Prop, key: &str) -> Result<Box<Expr>, Unsupported> {
    match prop {
        Prop::KeyValue(kv) => Ok(kv.value.clone()),
        Prop::Shorthand(i) => Ok(Box::new(Expr::Ident(i.clone()))),
        Prop::Method(m) => Ok(Box::new(Expr::Fn(FnExpr {
            ident: None,
            function: m.function.clone(),
        }))),
        Prop::Getter(_) | Prop::Setter(_) | Prop::Assign(_) => {
            Err(Unsupported::Accessor(key.to_string()))
        }
    }
}

/// Classifies every property in source order.
pub fn classify(obj: &ObjectLit) -> Result<Vec<ConfigEntry>, Unsupported> {
    obj.props
        .iter()
        .map(|p| match p {
            PropOrSpread::Spread(_) => Err(Unsupported::Spread),
            PropOrSpread::Prop(prop) => ConfigEntry::from_prop(prop),
        })
        .collect()
}

/// Entry point for a matched call's argument list. Values are cloned out of the
/// call, so nothing in the result aliases the original tree.
pub fn decompose(args: &[ExprOrSpread]) -> Result<DecomposedRequest, Unsupported> {
    let [arg] = args else {
        return Err(Unsupported::ArgumentCount(args.len()));
    };
    if arg.spread.is_some() {
        return Err(Unsupported::Spread);
    }
    let Expr::Object(obj) = nodes::unparen(&arg.expr) else {
        return Err(Unsupported::NotAnObject);
    };
    DecomposedRequest::from_entries(classify(obj)?)
}

// -----------------------------------------------------------------------------
// Decomposed request
// -----------------------------------------------------------------------------

/// Request-init fields whose relative source order is preserved.
#[derive(Debug)]
enum Field {
    Passthrough(Box<Prop>),
    Method(Box<Expr>),
    Cache(Box<Expr>),
}

#[derive(Debug)]
pub struct DecomposedRequest {
    pub target: Box<Expr>,
    pub body: Option<Box<Expr>>,
    pub content_type: Option<Box<Expr>>,
    pub headers: Option<Box<Expr>>,
    pub success: Option<Box<Expr>>,
    pub error: Option<Box<Expr>>,
    fields: Vec<Field>,
}

/// What synthesis needs: the final target and request-init properties.
#[derive(Debug)]
pub struct RequestParts {
    pub target: Box<Expr>,
    pub props: Vec<PropOrSpread>,
    pub success: Option<Box<Expr>>,
    pub error: Option<Box<Expr>>,
}

impl DecomposedRequest {
    /// Later duplicates of a tagged key replace earlier ones.
    pub fn from_entries(entries: Vec<ConfigEntry>) -> Result<Self, Unsupported> {
        let mut target = None;
        let mut body = None;
        let mut content_type = None;
        let mut headers = None;
        let mut success = None;
        let mut error = None;
        let mut fields = vec![];

        for entry in entries {
            match entry.kind {
                EntryKind::Target(v) => target = Some(v),
                EntryKind::Method(v) => {
                    fields.retain(|f| !matches!(f, Field::Method(_)));
                    if !is_literal_get(&v) {
                        fields.push(Field::Method(v));
                    }
                }
                EntryKind::Body(v) => body = Some(v),
                EntryKind::ContentType(v) => content_type = Some(v),
                EntryKind::Headers(v) => headers = Some(v),
                EntryKind::CacheHint(v) => {
                    fields.retain(|f| !matches!(f, Field::Cache(_)));
                    fields.push(Field::Cache(v));
                }
                EntryKind::SuccessCallback(v) => success = Some(v),
                EntryKind::ErrorCallback(v) => error = Some(v),
                EntryKind::Ignored => {}
                EntryKind::Passthrough(p) => fields.push(Field::Passthrough(p)),
            }
        }

        Ok(Self {
            target: target.ok_or(Unsupported::MissingUrl)?,
            body,
            content_type,
            headers,
            success,
            error,
            fields,
        })
    }

    pub fn is_get(&self) -> bool {
        !self.fields.iter().any(|f| matches!(f, Field::Method(_)))
    }

    /// Applies the per-field rules: GET bodies move into the query string, other
    /// bodies are shaped, and the content type lands in the headers.
    pub fn into_parts(self, cfg: &TransformConfig) -> RequestParts {
        let quote = cfg.print.quote;
        let is_get = self.is_get();
        let DecomposedRequest {
            mut target,
            body,
            content_type,
            headers,
            success,
            error,
            fields,
        } = self;

        let mut props: Vec<PropOrSpread> = fields
            .into_iter()
            .filter_map(|f| f.into_prop(quote))
            .collect();

        let mut form_encoded = false;
        if let Some(body) = body {
            if is_get {
                let query = nodes::call(nodes::path_expr(&cfg.url_encoder), vec![body]);
                target = nodes::add(nodes::add(target, nodes::str_expr("?", quote)), query);
            } else {
                let (body, encoded) = shape_body(body, &cfg.body_encoder);
                form_encoded = encoded;
                props.push(nodes::key_value(nodes::key("body"), body));
            }
        }

        let target = match *target {
            Expr::Bin(bin) => template::concat_to_template(bin, quote),
            other => Box::new(other),
        };

        let content_type = content_type
            .or_else(|| form_encoded.then(|| nodes::str_expr(FORM_CONTENT_TYPE, quote)));
        if let Some(headers) = merge_headers(headers, content_type) {
            props.push(nodes::key_value(nodes::key("headers"), headers));
        }

        RequestParts {
            target,
            props,
            success,
            error,
        }
    }
}

impl Field {
    fn into_prop(self, quote: QuoteStyle) -> Option<PropOrSpread> {
        match self {
            Field::Passthrough(p) => Some(PropOrSpread::Prop(p)),
            Field::Method(v) => Some(nodes::key_value(nodes::key("method"), v)),
            Field::Cache(v) => {
                let force = || nodes::str_expr("force-cache", quote);
                let value = match static_truthiness(&v) {
                    Some(true) => force(),
                    Some(false) => return None,
                    None => nodes::cond(v, force(), nodes::str_expr("default", quote)),
                };
                Some(nodes::key_value(nodes::key("cache"), value))
            }
        }
    }
}

fn is_literal_get(expr: &Expr) -> bool {
    matches!(nodes::unparen(expr), Expr::Lit(Lit::Str(s)) if &*s.value == "GET")
}

/// Object literals and bare identifiers are form data; anything else is
/// assumed to be an already-serialized payload.
fn shape_body(body: Box<Expr>, encoder: &str) -> (Box<Expr>, bool) {
    if matches!(nodes::unparen(&body), Expr::Object(_) | Expr::Ident(_)) {
        (nodes::call(nodes::path_expr(encoder), vec![body]), true)
    } else {
        (body, false)
    }
}

fn merge_headers(
    headers: Option<Box<Expr>>,
    content_type: Option<Box<Expr>>,
) -> Option<Box<Expr>> {
    let Some(content_type) = content_type else {
        return headers;
    };
    let entry = nodes::key_value(nodes::key("contentType"), content_type);
    Some(match headers.map(|h| *h) {
        None => nodes::object(vec![entry]),
        Some(Expr::Object(mut obj)) => {
            obj.props.push(entry);
            Box::new(Expr::Object(obj))
        }
        Some(other) => nodes::object(vec![
            PropOrSpread::Spread(SpreadElement {
                dot3_token: DUMMY_SP,
                expr: Box::new(other),
            }),
            entry,
        ]),
    })
}

/// Truthiness of values whose evaluation is side-effect free and known statically.
fn static_truthiness(expr: &Expr) -> Option<bool> {
    match nodes::unparen(expr) {
        Expr::Lit(Lit::Bool(b)) => Some(b.value),
        Expr::Lit(Lit::Num(n)) => Some(n.value != 0.0 && !n.value.is_nan()),
        Expr::Lit(Lit::Str(s)) => Some(!s.value.is_empty()),
        Expr::Lit(Lit::Null(_)) => Some(false),
        Expr::Lit(Lit::Regex(_)) | Expr::Arrow(_) | Expr::Fn(_) => Some(true),
        Expr::Ident(i) if &*i.sym == "undefined" => Some(false),
        Expr::Unary(u) if u.op == UnaryOp::Bang => static_truthiness(&u.arg).map(|t| !t),
        _ => None,
    }
}
