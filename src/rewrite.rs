use swc_core::ecma::{
    ast::*,
    visit::{VisitMut, VisitMutWith},
};
use tracing::{debug, trace};

use crate::{
    config::{CallTarget, TransformConfig},
    nodes, options, synth,
};

/// Replaces every `target(settings)` call with the equivalent request chain.
/// Calls whose settings have an unsupported shape are left as written.
pub struct CallSiteRewriter<'a> {
    target: &'a CallTarget,
    cfg: &'a TransformConfig,
    pub rewritten: usize,
    pub skipped: usize,
}

impl<'a> CallSiteRewriter<'a> {
    pub fn new(target: &'a CallTarget, cfg: &'a TransformConfig) -> Self {
        Self {
            target,
            cfg,
            rewritten: 0,
            skipped: 0,
        }
    }

    fn is_target(&self, call: &CallExpr) -> bool {
        let Callee::Expr(callee) = &call.callee else {
            return false;
        };
        let Expr::Member(member) = nodes::unparen(callee) else {
            return false;
        };
        match (&*member.obj, &member.prop) {
            (Expr::Ident(obj), MemberProp::Ident(prop)) => self.target.matches(&obj.sym, &prop.sym),
            _ => false,
        }
    }
}

impl VisitMut for CallSiteRewriter<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        // Inner call sites (e.g. inside a success callback) are rewritten before
        // the enclosing one captures them.
        expr.visit_mut_children_with(self);

        let Expr::Call(call) = &*expr else {
            return;
        };
        if !self.is_target(call) {
            return;
        }

        match options::decompose(&call.args) {
            Ok(request) => {
                let parts = request.into_parts(self.cfg);
                *expr = *synth::synthesize(parts, self.cfg).expr;
                self.rewritten += 1;
                debug!(target = %self.target, "rewrote call site");
            }
            Err(reason) => {
                self.skipped += 1;
                trace!(target = %self.target, %reason, "left call site unchanged");
            }
        }
    }
}

/// Returns `(rewritten, skipped)` for one target over the whole program.
pub fn rewrite_call_sites(
    program: &mut Program,
    target: &CallTarget,
    cfg: &TransformConfig,
) -> (usize, usize) {
    let mut rewriter = CallSiteRewriter::new(target, cfg);
    program.visit_mut_with(&mut rewriter);
    (rewriter.rewritten, rewriter.skipped)
}
