//! `"a" + b + "c"` → `` `a${b}c` ``

use swc_core::{common::DUMMY_SP, ecma::ast::*};

use crate::{config::QuoteStyle, nodes};

/// Converts a `+` chain into a template literal when some operand is a string
/// literal; any other chain comes back unchanged.
///
/// Only string-typed sub-chains are split. In `a + b + "x"` the leading `a + b`
/// may be numeric addition, so it stays one interpolation: `` `${a + b}x` ``.
/// A chain made only of literals folds into a plain string literal.
pub fn concat_to_template(bin: BinExpr, quote: QuoteStyle) -> Box<Expr> {
    let root = Box::new(Expr::Bin(bin));
    if plus_operands(&root).is_none() {
        return root;
    }
    let shape = ChainShape::measure(&root);
    if !shape.has_string_literal {
        return root;
    }
    fold(shape.flatten(root), quote)
}

// -----------------------------------------------------------------------------
// Chain flattening
// -----------------------------------------------------------------------------

/// Pre-order layout of a `+` tree: every `+` node and every operand leaf gets an
/// index; a subtree occupies `size[i]` consecutive indices.
struct ChainShape {
    size: Vec<usize>,
    stringy: Vec<bool>,
    has_string_literal: bool,
}

impl ChainShape {
    fn measure(root: &Expr) -> Self {
        let mut parent: Vec<Option<usize>> = vec![];
        let mut stringy = vec![];
        let mut has_string_literal = false;

        let mut stack = vec![(root, None)];
        while let Some((expr, up)) = stack.pop() {
            let idx = parent.len();
            parent.push(up);
            match plus_operands(expr) {
                Some((left, right)) => {
                    stringy.push(false);
                    stack.push((right, Some(idx)));
                    stack.push((left, Some(idx)));
                }
                None => {
                    let leaf = nodes::unparen(expr);
                    let is_str = matches!(leaf, Expr::Lit(Lit::Str(_)));
                    has_string_literal |= is_str;
                    stringy.push(is_str || matches!(leaf, Expr::Tpl(_)));
                }
            }
        }

        // children always sit after their parent
        let mut size = vec![1; parent.len()];
        for idx in (1..parent.len()).rev() {
            if let Some(up) = parent[idx] {
                size[up] += size[idx];
                stringy[up] |= stringy[idx];
            }
        }

        Self {
            size,
            stringy,
            has_string_literal,
        }
    }

    /// Leaf operands in evaluation order. Walks the owned tree in the same
    /// pre-order as `measure`, skipping over subtrees that stay whole.
    fn flatten(&self, root: Box<Expr>) -> Vec<Box<Expr>> {
        let mut leaves = vec![];
        let mut stack = vec![root];
        let mut idx = 0;
        while let Some(expr) = stack.pop() {
            let split = if self.stringy[idx] {
                into_plus_operands(expr)
            } else {
                Err(expr)
            };
            match split {
                Ok((left, right)) => {
                    idx += 1;
                    stack.push(right);
                    stack.push(left);
                }
                Err(whole) => {
                    idx += self.size[idx];
                    leaves.push(whole);
                }
            }
        }
        leaves
    }
}

fn plus_operands(expr: &Expr) -> Option<(&Expr, &Expr)> {
    match nodes::unparen(expr) {
        Expr::Bin(b) if b.op == BinaryOp::Add => Some((&*b.left, &*b.right)),
        _ => None,
    }
}

fn into_plus_operands(expr: Box<Expr>) -> Result<(Box<Expr>, Box<Expr>), Box<Expr>> {
    match *expr {
        Expr::Bin(BinExpr {
            op: BinaryOp::Add,
            left,
            right,
            ..
        }) => Ok((left, right)),
        Expr::Paren(p) if plus_operands(&p.expr).is_some() => into_plus_operands(p.expr),
        other => Err(Box::new(other)),
    }
}

// -----------------------------------------------------------------------------
// Folding
// -----------------------------------------------------------------------------

#[derive(Default)]
struct Pending {
    raw: String,
    cooked: String,
}

impl Pending {
    fn push_literal(&mut self, text: &str) {
        self.push_raw(&escape_template_raw(text));
        self.cooked.push_str(text);
    }

    fn push_raw(&mut self, raw: &str) {
        // `$` + `{` arriving from two pieces must not open an interpolation
        if raw.starts_with('{') && self.raw.ends_with('$') {
            self.raw.push('\\');
        }
        self.raw.push_str(raw);
    }

    fn close(&mut self, tail: bool) -> TplElement {
        let Pending { raw, cooked } = std::mem::take(self);
        TplElement {
            span: DUMMY_SP,
            tail,
            cooked: Some(cooked.into()),
            raw: raw.into(),
        }
    }
}

fn fold(leaves: Vec<Box<Expr>>, quote: QuoteStyle) -> Box<Expr> {
    let mut quasis = vec![];
    let mut exprs = vec![];
    let mut pending = Pending::default();
    let mut spliced = false;

    for leaf in leaves {
        if let Some(text) = literal_text(&leaf) {
            pending.push_literal(&text);
            continue;
        }
        match into_tpl(leaf) {
            Ok(tpl) => {
                spliced = true;
                let mut inner = tpl.exprs.into_iter();
                for quasi in tpl.quasis {
                    pending.push_raw(&quasi.raw);
                    match &quasi.cooked {
                        Some(c) => pending.cooked.push_str(c),
                        None => pending.cooked.push_str(&quasi.raw),
                    }
                    if let Some(e) = inner.next() {
                        quasis.push(pending.close(false));
                        exprs.push(e);
                    }
                }
            }
            Err(other) => {
                quasis.push(pending.close(false));
                exprs.push(other);
            }
        }
    }

    if exprs.is_empty() && !spliced {
        return nodes::str_expr(&pending.cooked, quote);
    }
    quasis.push(pending.close(true));
    Box::new(Expr::Tpl(Tpl {
        span: DUMMY_SP,
        exprs,
        quasis,
    }))
}

fn into_tpl(expr: Box<Expr>) -> Result<Tpl, Box<Expr>> {
    match *expr {
        Expr::Tpl(t) => Ok(t),
        Expr::Paren(p) if matches!(nodes::unparen(&p.expr), Expr::Tpl(_)) => into_tpl(p.expr),
        other => Err(Box::new(other)),
    }
}

/// JS string form of literals that fold into text. Non-integral numbers are left
/// as interpolations rather than reimplementing number formatting.
fn literal_text(expr: &Expr) -> Option<String> {
    match nodes::unparen(expr) {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
        Expr::Lit(Lit::Num(n))
            if n.value.is_finite() && n.value.fract() == 0.0 && n.value.abs() < 1e15 =>
        {
            Some((n.value as i64).to_string())
        }
        Expr::Lit(Lit::Bool(b)) => Some(b.value.to_string()),
        Expr::Lit(Lit::Null(_)) => Some("null".to_string()),
        _ => None,
    }
}

fn escape_template_raw(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_expr;
    use std::collections::HashMap;

    fn convert(src: &str) -> Box<Expr> {
        match *parse_expr(src) {
            Expr::Bin(bin) => concat_to_template(bin, QuoteStyle::Single),
            other => panic!("not a binary expression: {other:?}"),
        }
    }

    fn cooked(tpl: &Tpl) -> Vec<String> {
        tpl.quasis
            .iter()
            .map(|q| q.cooked.as_ref().map(|c| c.to_string()).unwrap_or_default())
            .collect()
    }

    // Minimal JS `+` semantics over numbers and strings
    #[derive(Clone, Debug, PartialEq)]
    enum Val {
        Num(f64),
        Str(String),
    }

    impl Val {
        fn text(&self) -> String {
            match self {
                Val::Num(n) if n.fract() == 0.0 => format!("{}", *n as i64),
                Val::Num(n) => n.to_string(),
                Val::Str(s) => s.clone(),
            }
        }
    }

    fn eval(expr: &Expr, env: &HashMap<&str, Val>) -> Val {
        match nodes::unparen(expr) {
            Expr::Lit(Lit::Str(s)) => Val::Str(s.value.to_string()),
            Expr::Lit(Lit::Num(n)) => Val::Num(n.value),
            Expr::Lit(Lit::Bool(b)) => Val::Str(b.value.to_string()),
            Expr::Ident(i) => env[&*i.sym].clone(),
            Expr::Bin(b) if b.op == BinaryOp::Add => {
                match (eval(&b.left, env), eval(&b.right, env)) {
                    (Val::Num(l), Val::Num(r)) => Val::Num(l + r),
                    (l, r) => Val::Str(l.text() + r.text().as_str()),
                }
            }
            Expr::Tpl(t) => {
                let mut out = String::new();
                for (i, q) in t.quasis.iter().enumerate() {
                    out.push_str(q.cooked.as_ref().unwrap());
                    if let Some(e) = t.exprs.get(i) {
                        out.push_str(&eval(e, env).text());
                    }
                }
                Val::Str(out)
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn interleaves_literals_and_expressions() {
        let out = convert(r#""/api/" + id + "/items?page=" + page"#);
        let Expr::Tpl(tpl) = *out else { panic!("expected template") };
        assert_eq!(cooked(&tpl), vec!["/api/", "/items?page=", ""]);
        assert_eq!(tpl.exprs.len(), 2);
        assert!(tpl.quasis.last().unwrap().tail);
        assert!(!tpl.quasis[0].tail);
    }

    #[test]
    fn leading_expression_gets_empty_head() {
        let out = convert(r#"base + "/x""#);
        let Expr::Tpl(tpl) = *out else { panic!("expected template") };
        assert_eq!(cooked(&tpl), vec!["", "/x"]);
    }

    #[test]
    fn chain_without_string_literal_is_untouched() {
        let out = convert("a + b + 1");
        assert!(matches!(*out, Expr::Bin(_)));
    }

    #[test]
    fn non_add_operator_is_untouched() {
        let out = convert(r#""a" - b"#);
        assert!(matches!(*out, Expr::Bin(BinExpr { op: BinaryOp::Sub, .. })));
    }

    #[test]
    fn all_literal_chain_folds_to_plain_string() {
        let out = convert(r#""a" + 'b' + 3"#);
        match *out {
            Expr::Lit(Lit::Str(s)) => {
                assert_eq!(&*s.value, "ab3");
                assert_eq!(s.raw.as_deref(), Some("'ab3'"));
            }
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn numeric_prefix_stays_one_interpolation() {
        let out = convert(r#"a + b + "px""#);
        let Expr::Tpl(tpl) = *out else { panic!("expected template") };
        assert_eq!(tpl.exprs.len(), 1);
        assert!(matches!(&*tpl.exprs[0], Expr::Bin(_)));
        assert_eq!(cooked(&tpl), vec!["", "px"]);
    }

    #[test]
    fn splices_template_operands() {
        let out = convert(r#"`/a/${x}` + "/b/" + y"#);
        let Expr::Tpl(tpl) = *out else { panic!("expected template") };
        assert_eq!(cooked(&tpl), vec!["/a/", "/b/", ""]);
        assert_eq!(tpl.exprs.len(), 2);
    }

    #[test]
    fn escapes_template_metacharacters() {
        let out = convert(r#""cost: ${" + n + "} `q` \\""#);
        let Expr::Tpl(tpl) = *out else { panic!("expected template") };
        assert_eq!(&*tpl.quasis[0].raw, "cost: \\${");
        assert_eq!(&*tpl.quasis[1].raw, "} \\`q\\` \\\\");
        assert_eq!(cooked(&tpl), vec!["cost: ${", "} `q` \\"]);
    }

    #[test]
    fn dollar_and_brace_from_separate_literals_stay_text() {
        let out = convert(r#"`a$` + "{b" + c"#);
        let Expr::Tpl(tpl) = *out else { panic!("expected template") };
        assert_eq!(&*tpl.quasis[0].raw, "a$\\{b");
        assert_eq!(cooked(&tpl)[0], "a${b");
    }

    #[test]
    fn long_chains_do_not_recurse() {
        let mut src = String::from("\"s\"");
        for i in 0..500 {
            src.push_str(&format!(" + v{i}"));
        }
        let out = convert(&src);
        let Expr::Tpl(tpl) = *out else { panic!("expected template") };
        assert_eq!(tpl.exprs.len(), 500);
        assert_eq!(tpl.quasis.len(), 501);
    }

    #[test]
    fn conversion_preserves_evaluation() {
        let fixtures = [
            r#""/a/" + x + "/b" + y"#,
            r#"x + y + "z""#,
            r#""z" + x + y"#,
            r#""z" + (x + y)"#,
            r#"x + ("m" + y) + 1"#,
            r#"1 + 2 + "k" + 3 + 4"#,
            r#"x + "" + y"#,
        ];
        let envs = [
            HashMap::from([("x", Val::Num(1.0)), ("y", Val::Num(2.0))]),
            HashMap::from([("x", Val::Str("p".into())), ("y", Val::Num(7.0))]),
            HashMap::from([("x", Val::Num(10.0)), ("y", Val::Str("q".into()))]),
        ];
        for src in fixtures {
            let original = parse_expr(src);
            let converted = convert(src);
            for env in &envs {
                assert_eq!(
                    eval(&original, env).text(),
                    eval(&converted, env).text(),
                    "{src} with {env:?}"
                );
            }
        }
    }
}
