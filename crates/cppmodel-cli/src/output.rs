//! Output rendering.

use std::fmt::Write;

use cppmodel_core::{Control, Overview, SymbolId, SymbolVisitor, walk_symbols};

use crate::OutputFormat;
use crate::pipeline::FileModel;

/// Render every symbol below `global`, the global namespace itself excluded.
///
/// Tree output starts with a `path` header and indents members under their
/// scope; flat output prefixes each line with `path:line:column`.
pub fn render_symbols(ctl: &Control, global: SymbolId, path: &str, format: OutputFormat) -> String {
    let mut renderer = Renderer {
        overview: Overview::new(),
        path,
        format,
        out: String::new(),
    };
    if format == OutputFormat::Tree {
        let _ = writeln!(renderer.out, "{path}");
    }
    walk_symbols(ctl, global, &mut renderer);
    renderer.out
}

struct Renderer<'a> {
    overview: Overview,
    path: &'a str,
    format: OutputFormat,
    out: String,
}

impl SymbolVisitor for Renderer<'_> {
    fn visit_symbol(&mut self, ctl: &Control, symbol: SymbolId, depth: usize) -> bool {
        if depth == 0 {
            return true;
        }
        let sym = ctl.symbol(symbol);
        let signature = self.overview.symbol_signature(ctl, symbol);
        let kind = sym.kind.kind_name();
        let (line, column) = (sym.line(), sym.column());
        let _ = match self.format {
            OutputFormat::Tree => writeln!(
                self.out,
                "{}{signature}  [{kind} {} {line}:{column}]",
                "  ".repeat(depth),
                sym.visibility
            ),
            OutputFormat::Flat => writeln!(self.out, "{}:{line}:{column}: {kind} {signature}", self.path),
        };
        true
    }
}

/// Concatenate per-file output in file order.
pub fn merge_outputs(models: &[FileModel]) -> String {
    models.iter().map(|model| model.rendered.as_str()).collect()
}
