//! Ordered stages: for each target, every continuation rename, then the call-site
//! rewrite. The text entry points re-parse and re-print between stages.

use swc_core::ecma::ast::Program;
use tracing::debug;

use crate::{
    config::TransformConfig,
    error::Result,
    rename::rename_continuations,
    rewrite::rewrite_call_sites,
    source,
};

/// Counters accumulated over all stages.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub renamed: usize,
    pub rewritten: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct TransformOutput {
    pub code: String,
    pub report: PassReport,
}

pub fn transform(source: &str, cfg: &TransformConfig) -> Result<String> {
    transform_with_report(source, cfg).map(|out| out.code)
}

pub fn transform_with_report(source: &str, cfg: &TransformConfig) -> Result<TransformOutput> {
    let mut code = source.to_string();
    let mut report = PassReport::default();

    for target in &cfg.targets {
        for rename in &cfg.continuations {
            code = run_pass(&code, cfg, |program| {
                report.renamed += rename_continuations(program, rename, &cfg.provenance_roots);
            })?;
        }
        code = run_pass(&code, cfg, |program| {
            let (rewritten, skipped) = rewrite_call_sites(program, target, cfg);
            report.rewritten += rewritten;
            report.skipped += skipped;
        })?;
        debug!(%target, ?report, "target done");
    }

    Ok(TransformOutput { code, report })
}

/// Same stages over an already parsed program, without intermediate printing.
pub fn transform_program(program: &mut Program, cfg: &TransformConfig) -> PassReport {
    let mut report = PassReport::default();
    for target in &cfg.targets {
        for rename in &cfg.continuations {
            report.renamed += rename_continuations(program, rename, &cfg.provenance_roots);
        }
        let (rewritten, skipped) = rewrite_call_sites(program, target, cfg);
        report.rewritten += rewritten;
        report.skipped += skipped;
    }
    debug!(?report, "program transformed");
    report
}

fn run_pass(code: &str, cfg: &TransformConfig, stage: impl FnOnce(&mut Program)) -> Result<String> {
    let mut unit = source::parse(code)?;
    stage(&mut unit.program);
    source::print(&unit, &cfg.print)
}
