//! Parser/printer service: source text in, `Program` out, and back.

use regex::{Captures, Regex};
use swc_core::{
    common::{
        comments::{Comments, SingleThreadedComments},
        sync::Lrc,
        FileName, Globals, SourceMap, Spanned, GLOBALS,
    },
    ecma::{
        ast::*,
        codegen::{text_writer::JsWriter, Config, Emitter},
        parser::{error::Error as ParserError, lexer::Lexer, EsSyntax, Parser, StringInput, Syntax},
        visit::{Visit, VisitWith},
    },
};
use tracing::{trace, warn};

use crate::{
    config::PrintOptions,
    error::{CodemodError, Result},
};

const EMITTER_INDENT: usize = 4;

/// A parsed program together with the source map and comments needed to print it.
pub struct SourceUnit {
    pub program: Program,
    cm: Lrc<SourceMap>,
    comments: SingleThreadedComments,
}

pub fn parse(source: &str) -> Result<SourceUnit> {
    GLOBALS.set(&Globals::new(), || {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());
        let comments = SingleThreadedComments::default();

        let lexer = Lexer::new(
            Syntax::Es(EsSyntax {
                jsx: true,
                ..Default::default()
            }),
            EsVersion::latest(),
            StringInput::from(&*fm),
            Some(&comments as &dyn Comments),
        );
        let mut parser = Parser::new_from(lexer);

        let base = fm.start_pos.0;
        let to_error = |e: ParserError| {
            let span = e.span();
            CodemodError::Parse {
                message: e.kind().msg().to_string(),
                lo: span.lo.0.saturating_sub(base),
                hi: span.hi.0.saturating_sub(base),
            }
        };

        let program = parser.parse_program().map_err(to_error)?;
        if let Some(recovered) = parser.take_errors().into_iter().next() {
            return Err(to_error(recovered));
        }

        Ok(SourceUnit {
            program,
            cm,
            comments,
        })
    })
}

pub fn print(unit: &SourceUnit, opts: &PrintOptions) -> Result<String> {
    let mut buf = vec![];
    GLOBALS.set(&Globals::new(), || -> Result<()> {
        let mut emitter = Emitter {
            cfg: Config::default()
                .with_target(EsVersion::latest())
                .with_minify(false),
            cm: unit.cm.clone(),
            comments: Some(&unit.comments as &dyn Comments),
            wr: JsWriter::new(unit.cm.clone(), "\n", &mut buf, None),
        };
        emitter.emit_program(&unit.program)?;
        Ok(())
    })?;
    let code = String::from_utf8(buf)?;
    Ok(apply_layout(code, &unit.program, opts))
}

// -----------------------------------------------------------------------------
// Layout options the emitter has no setting for
// -----------------------------------------------------------------------------

fn apply_layout(code: String, program: &Program, opts: &PrintOptions) -> String {
    if opts.trailing_comma {
        trace!("trailing commas requested; the swc emitter never writes them");
    }
    if opts.tab_width == EMITTER_INDENT {
        return code;
    }

    let mut finder = MultilineLiteralFinder::default();
    program.visit_with(&mut finder);
    if finder.found {
        warn!(
            tab_width = opts.tab_width,
            "program has multi-line string literals; keeping emitter indentation"
        );
        return code;
    }

    let Ok(leading) = Regex::new(r"(?m)^(?: {4})+") else {
        return code;
    };
    leading
        .replace_all(&code, |caps: &Captures| {
            " ".repeat(caps[0].len() / EMITTER_INDENT * opts.tab_width)
        })
        .into_owned()
}

#[derive(Default)]
struct MultilineLiteralFinder {
    found: bool,
}

impl Visit for MultilineLiteralFinder {
    fn visit_str(&mut self, s: &Str) {
        if s.raw.as_ref().is_some_and(|raw| raw.contains('\n')) {
            self.found = true;
        }
    }

    fn visit_tpl_element(&mut self, t: &TplElement) {
        if t.raw.contains('\n') {
            self.found = true;
        }
    }
}

// -----------------------------------------------------------------------------
// Test helpers
// -----------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn parse_expr(src: &str) -> Box<Expr> {
    let unit = parse(&format!("({src});")).unwrap();
    let stmt = match unit.program {
        Program::Script(s) => s.body.into_iter().next(),
        Program::Module(m) => match m.body.into_iter().next() {
            Some(ModuleItem::Stmt(s)) => Some(s),
            _ => None,
        },
    };
    match stmt {
        Some(Stmt::Expr(ExprStmt { expr, .. })) => match *expr {
            Expr::Paren(p) => p.expr,
            other => Box::new(other),
        },
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[cfg(test)]
pub(crate) fn print_expr(expr: Box<Expr>) -> String {
    use swc_core::common::DUMMY_SP;
    let unit = SourceUnit {
        program: Program::Script(Script {
            span: DUMMY_SP,
            body: vec![Stmt::Expr(ExprStmt {
                span: DUMMY_SP,
                expr,
            })],
            shebang: None,
        }),
        cm: Default::default(),
        comments: Default::default(),
    };
    print(&unit, &PrintOptions::default()).unwrap()
}

/// Output with all whitespace removed, for layout-independent assertions.
#[cfg(test)]
pub(crate) fn squash(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}
