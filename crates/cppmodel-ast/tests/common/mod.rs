use cppmodel_ast::{Arena, NameAst, NameKind, ParseOptions, TranslationUnit, TranslationUnitAst, parse_source};
use cppmodel_core::LiteralTable;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_test_writer()
        .try_init();
}

/// Lower `source`, dedented, as `test.cpp`.
#[allow(dead_code)]
pub fn lower<'tcx>(
    arena: &'tcx Arena<'tcx>,
    literals: &LiteralTable,
    source: &str,
) -> (TranslationUnit, &'tcx TranslationUnitAst<'tcx>) {
    init_tracing();
    let unit = TranslationUnit::new(literals, "test.cpp", textwrap::dedent(source));
    let ast = parse_source(arena, &unit, &ParseOptions::default()).expect("lowering failed");
    (unit, ast)
}

/// The last identifier of a name, through qualification and template ids.
#[allow(dead_code)]
pub fn spelling(literals: &LiteralTable, name: &NameAst<'_>) -> String {
    match &name.kind {
        NameKind::Simple(id) => literals.spelling(*id),
        NameKind::TemplateId { identifier, .. } => literals.spelling(*identifier),
        NameKind::Qualified { unqualified, .. } => spelling(literals, unqualified),
        NameKind::Destructor(inner) => format!("~{}", spelling(literals, inner)),
        NameKind::Operator(op) => format!("operator{}", op),
        NameKind::Conversion(_) => "operator <conversion>".to_string(),
        NameKind::Selector { parts, .. } => parts.iter().map(|p| literals.spelling(*p)).collect::<Vec<_>>().join(":"),
    }
}
