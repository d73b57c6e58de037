//! Small constructors for the synthesized nodes. Everything built here carries
//! `DUMMY_SP` and an empty syntax context.

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::ast::*,
};

use crate::config::QuoteStyle;

pub fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

pub fn ident_expr(name: &str) -> Box<Expr> {
    Box::new(Expr::Ident(ident(name)))
}

/// `a.b.c` as a member chain; a plain name stays an identifier.
pub fn path_expr(path: &str) -> Box<Expr> {
    let mut segments = path.split('.');
    let head = ident_expr(segments.next().unwrap_or(path));
    segments.fold(head, |obj, prop| {
        Box::new(Expr::Member(MemberExpr {
            span: DUMMY_SP,
            obj,
            prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
        }))
    })
}

/// String literal with an explicit raw form, so the printer honours the quote style.
pub fn str_lit(value: &str, quote: QuoteStyle) -> Str {
    let q = quote.char();
    let mut raw = String::with_capacity(value.len() + 2);
    raw.push(q);
    for c in value.chars() {
        match c {
            '\\' => raw.push_str("\\\\"),
            '\n' => raw.push_str("\\n"),
            '\r' => raw.push_str("\\r"),
            '\u{2028}' => raw.push_str("\\u2028"),
            '\u{2029}' => raw.push_str("\\u2029"),
            c if c == q => {
                raw.push('\\');
                raw.push(c);
            }
            c => raw.push(c),
        }
    }
    raw.push(q);
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: Some(raw.into()),
    }
}

pub fn str_expr(value: &str, quote: QuoteStyle) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(str_lit(value, quote))))
}

pub fn key(name: &str) -> PropName {
    PropName::Ident(IdentName::new(name.into(), DUMMY_SP))
}

pub fn key_value(key: PropName, value: Box<Expr>) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp { key, value })))
}

pub fn object(props: Vec<PropOrSpread>) -> Box<Expr> {
    Box::new(Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props,
    }))
}

pub fn call(callee: Box<Expr>, args: Vec<Box<Expr>>) -> Box<Expr> {
    Box::new(Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(callee),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread { spread: None, expr })
            .collect(),
        type_args: None,
    }))
}

/// `obj.method(args...)`
pub fn method_call(obj: Box<Expr>, method: &str, args: Vec<Box<Expr>>) -> Box<Expr> {
    let callee = Box::new(Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj,
        prop: MemberProp::Ident(IdentName::new(method.into(), DUMMY_SP)),
    }));
    call(callee, args)
}

pub fn add(left: Box<Expr>, right: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op: BinaryOp::Add,
        left,
        right,
    }))
}

/// `param => body`
pub fn arrow(param: &str, body: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Arrow(ArrowExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        params: vec![Pat::Ident(BindingIdent {
            id: ident(param),
            type_ann: None,
        })],
        body: Box::new(BlockStmtOrExpr::Expr(body)),
        is_async: false,
        is_generator: false,
        type_params: None,
        return_type: None,
    }))
}

/// `test ? cons : alt`. The emitter inserts no parentheses, so any `test` that
/// binds looser than a primary expression is wrapped.
pub fn cond(test: Box<Expr>, cons: Box<Expr>, alt: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Cond(CondExpr {
        span: DUMMY_SP,
        test: paren_unless_primary(test),
        cons,
        alt,
    }))
}

fn paren_unless_primary(expr: Box<Expr>) -> Box<Expr> {
    let primary = matches!(
        *expr,
        Expr::Ident(_)
            | Expr::Member(_)
            | Expr::Call(_)
            | Expr::Lit(_)
            | Expr::Paren(_)
            | Expr::Tpl(_)
            | Expr::This(_)
            | Expr::Array(_)
            | Expr::Object(_)
    );
    if primary {
        expr
    } else {
        Box::new(Expr::Paren(ParenExpr {
            span: DUMMY_SP,
            expr,
        }))
    }
}

/// Strips any number of wrapping parentheses.
pub fn unparen(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(p) = expr {
        expr = &*p.expr;
    }
    expr
}

/// Static key name; `None` for computed keys.
pub fn prop_name_str(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(i) => Some(i.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        PropName::BigInt(b) => Some(b.value.to_string()),
        PropName::Computed(_) => None,
    }
}
