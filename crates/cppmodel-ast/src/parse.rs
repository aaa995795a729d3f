//! Entry points from source text to a lowered [`TranslationUnitAst`].

use std::path::Path;

use cppmodel_core::LiteralTable;
use cppmodel_error::{Error, ErrorKind, Result};
use tracing::debug;

use crate::ast::{Arena, TranslationUnitAst};
use crate::lower::Lower;
use crate::unit::TranslationUnit;

/// Configuration for the front end.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Nesting ceiling for declarations, statements, expressions and
    /// declarators. Deeper subtrees are cut and
    /// [`TranslationUnitAst::depth_exceeded`] is set.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse the source of `unit` with tree-sitter-cpp and lower it into `arena`.
///
/// Syntax errors are not fatal: tree-sitter recovers, and the lowering keeps
/// whatever declarations survive around the damaged region.
#[tracing::instrument(skip_all, fields(file = unit.file_name()))]
pub fn parse_source<'tcx>(
    arena: &'tcx Arena<'tcx>,
    unit: &TranslationUnit,
    options: &ParseOptions,
) -> Result<&'tcx TranslationUnitAst<'tcx>> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_cpp::LANGUAGE.into())
        .map_err(|err| {
            Error::new(ErrorKind::GrammarError, err.to_string())
                .with_operation("ast::parse_source")
        })?;
    let tree = parser.parse(unit.source(), None).ok_or_else(|| {
        Error::parse_failed("tree-sitter produced no tree")
            .with_operation("ast::parse_source")
            .with_context("file", unit.file_name())
    })?;

    let root = tree.root_node();
    if root.has_error() {
        debug!("source has syntax errors, lowering what parsed");
    }
    let ast = Lower::new(arena, unit, options.max_depth).translation_unit(root)?;
    debug!(
        declarations = ast.declarations.len(),
        nodes = arena.node_count(),
        depth_exceeded = ast.depth_exceeded,
        "lowered translation unit"
    );
    Ok(ast)
}

/// Read `path`, then [`parse_source`] it. The returned unit interns into
/// `literals`.
pub fn parse_file<'tcx>(
    arena: &'tcx Arena<'tcx>,
    literals: &LiteralTable,
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<(TranslationUnit, &'tcx TranslationUnitAst<'tcx>)> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| {
        Error::from(err)
            .with_operation("ast::parse_file")
            .with_context("path", path.display().to_string())
    })?;
    let unit = TranslationUnit::new(literals, path.display().to_string(), source);
    let ast = parse_source(arena, &unit, options)?;
    Ok((unit, ast))
}
