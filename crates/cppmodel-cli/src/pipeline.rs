//! Core processing pipeline: parse, bind, render.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use cppmodel_ast::{Arena, ParseOptions, parse_file};
use cppmodel_bind::Bind;
use cppmodel_core::{Control, LiteralTable, SourceLocation};
use cppmodel_error::Result;

use crate::CppModelOptions;
use crate::output::render_symbols;

/// The rendered symbols of one bound file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileModel {
    pub path: String,
    /// Symbols allocated while binding, the global namespace included.
    pub symbol_count: usize,
    /// Whether part of the file nested past the front end's or the binder's
    /// ceiling.
    pub depth_exceeded: bool,
    pub rendered: String,
}

/// Parse and bind one file into its own `Control`, then render it.
pub fn bind_file(opts: &CppModelOptions, path: &str) -> Result<FileModel> {
    let literals = LiteralTable::new();
    let arena = Arena::default();
    let (unit, ast) = parse_file(&arena, &literals, path, &ParseOptions::default())?;

    let mut control = Control::with_literals(literals.clone());
    let global = control.new_namespace(SourceLocation::default(), None);
    let mut bind = Bind::with_options(&mut control, &unit, opts.processing.bind_options());
    bind.bind_translation_unit(ast, global);
    let depth_exceeded = ast.depth_exceeded || bind.depth_exceeded();

    if depth_exceeded {
        warn!(path, "nesting ceiling reached, output is partial");
    }
    debug!(path, symbols = control.symbol_count(), "bound");

    Ok(FileModel {
        path: path.to_string(),
        symbol_count: control.symbol_count(),
        depth_exceeded,
        rendered: render_symbols(&control, global, path, opts.format),
    })
}

/// Bind every file. Each file gets its own `Control`, so files are
/// independent and `--parallel` only changes the scheduling; results stay in
/// input order. The first failure aborts the run.
pub fn process_files(opts: &CppModelOptions, files: &[String]) -> Result<Vec<FileModel>> {
    let bind_start = Instant::now();
    info!(files = files.len(), parallel = opts.processing.parallel, "binding");

    let models = if opts.processing.parallel {
        files
            .par_iter()
            .map(|path| bind_file(opts, path))
            .collect::<Result<Vec<_>>>()?
    } else {
        files
            .iter()
            .map(|path| bind_file(opts, path))
            .collect::<Result<Vec<_>>>()?
    };

    let symbols: usize = models.iter().map(|m| m.symbol_count).sum();
    info!(
        "Parse + bind: {:.2}s ({} symbols)",
        bind_start.elapsed().as_secs_f64(),
        symbols
    );

    Ok(models)
}
