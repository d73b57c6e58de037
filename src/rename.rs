use swc_core::ecma::{
    ast::*,
    visit::{VisitMut, VisitMutWith},
};
use tracing::{debug, trace};

use crate::{
    config::{CallTarget, ContinuationRename},
    provenance,
};

/// Renames `.from(...)` to `.to(...)` on call chains that start at one of the
/// provenance roots, e.g. `$.ajax(o).done(f)` becomes `$.ajax(o).then(f)`.
pub struct ContinuationRenamer<'a> {
    rename: &'a ContinuationRename,
    roots: &'a [CallTarget],
    pub renamed: usize,
}

impl<'a> ContinuationRenamer<'a> {
    pub fn new(rename: &'a ContinuationRename, roots: &'a [CallTarget]) -> Self {
        Self {
            rename,
            roots,
            renamed: 0,
        }
    }
}

impl VisitMut for ContinuationRenamer<'_> {
    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        call.visit_mut_children_with(self);

        let Callee::Expr(callee) = &mut call.callee else {
            return;
        };
        let Expr::Member(member) = &mut **callee else {
            return;
        };
        let MemberProp::Ident(prop) = &mut member.prop else {
            return;
        };
        if &*prop.sym != self.rename.from.as_str() {
            return;
        }
        if !provenance::originates_from(&member.obj, self.roots) {
            trace!(name = %prop.sym, "continuation on an unrelated chain");
            return;
        }

        prop.sym = self.rename.to.as_str().into();
        self.renamed += 1;
        debug!(from = %self.rename.from, to = %self.rename.to, "renamed continuation");
    }
}

/// Runs one rename over the whole program and returns how many calls changed.
pub fn rename_continuations(
    program: &mut Program,
    rename: &ContinuationRename,
    roots: &[CallTarget],
) -> usize {
    let mut renamer = ContinuationRenamer::new(rename, roots);
    program.visit_mut_with(&mut renamer);
    renamer.renamed
}
