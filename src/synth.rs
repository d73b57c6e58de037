use swc_core::{common::DUMMY_SP, ecma::ast::*};

use crate::{config::TransformConfig, nodes, options::RequestParts};

/// The synthesized request chain for one call site.
#[derive(Debug)]
pub struct Replacement {
    pub expr: Box<Expr>,
}

impl Replacement {
    pub fn into_stmt(self) -> Stmt {
        Stmt::Expr(ExprStmt {
            span: DUMMY_SP,
            expr: self.expr,
        })
    }
}

/// `fetch(target[, init]).then(response => response.json())`, followed by the
/// success and error continuations when present.
pub fn synthesize(parts: RequestParts, cfg: &TransformConfig) -> Replacement {
    let RequestParts {
        target,
        props,
        success,
        error,
    } = parts;

    let mut args = vec![target];
    if !props.is_empty() {
        args.push(nodes::object(props));
    }
    let request = nodes::call(nodes::path_expr(&cfg.request_fn), args);

    let parse_json = nodes::arrow(
        "response",
        nodes::method_call(nodes::ident_expr("response"), "json", vec![]),
    );
    let mut expr = nodes::method_call(request, "then", vec![parse_json]);

    if let Some(success) = success {
        expr = nodes::method_call(expr, "then", vec![success]);
    }
    if let Some(error) = error {
        expr = nodes::method_call(expr, "catch", vec![error]);
    }

    Replacement { expr }
}
