use swc_core::ecma::ast::*;

use crate::{config::CallTarget, nodes};

/// Whether `expr` is a call to one of `roots`, or a call chained off one,
/// e.g. `$.ajax(opts).done(a)` for the root `$.ajax`.
pub fn originates_from(expr: &Expr, roots: &[CallTarget]) -> bool {
    let mut cur = expr;
    loop {
        let Expr::Call(call) = nodes::unparen(cur) else {
            return false;
        };
        let Callee::Expr(callee) = &call.callee else {
            return false;
        };
        let Expr::Member(member) = nodes::unparen(callee) else {
            return false;
        };
        if let (Expr::Ident(obj), MemberProp::Ident(prop)) = (&*member.obj, &member.prop) {
            if roots.iter().any(|r| r.matches(&obj.sym, &prop.sym)) {
                return true;
            }
        }
        cur = &*member.obj;
    }
}
