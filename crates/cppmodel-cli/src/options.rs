//! Shared CLI options for the cppmodel dumper.

use clap::{Args, ValueEnum};
use cppmodel_bind::BindOptions;

/// How the bound symbols are printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented by scope nesting.
    #[default]
    Tree,
    /// One `file:line:column` line per symbol.
    Flat,
}

/// Options that control parsing and binding.
#[derive(Args, Debug, Clone)]
pub struct ProcessingOptions {
    /// Bind function signatures but not their bodies.
    #[arg(long = "skip-bodies")]
    pub skip_bodies: bool,

    /// Nesting ceiling of the binder. Deeper constructs are left unbound.
    #[arg(long = "max-depth", default_value_t = cppmodel_bind::Bind::MAX_DEPTH)]
    pub max_depth: usize,

    /// Bind files in parallel. Output keeps the input order either way.
    #[arg(long)]
    pub parallel: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            skip_bodies: false,
            max_depth: cppmodel_bind::Bind::MAX_DEPTH,
            parallel: false,
        }
    }
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_bodies(mut self, skip_bodies: bool) -> Self {
        self.skip_bodies = skip_bodies;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn bind_options(&self) -> BindOptions {
        BindOptions::new()
            .with_skip_function_bodies(self.skip_bodies)
            .with_max_depth(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        processing: ProcessingOptions,
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    }

    #[test]
    fn flags_map_to_bind_options() {
        let harness = Harness::parse_from(["cppmodel", "--skip-bodies", "--max-depth", "12", "--format", "flat"]);
        let bind = harness.processing.bind_options();
        assert!(bind.skip_function_bodies);
        assert_eq!(bind.max_depth, 12);
        assert_eq!(harness.format, OutputFormat::Flat);
    }

    #[test]
    fn defaults_follow_the_binder() {
        let harness = Harness::parse_from(["cppmodel"]);
        assert_eq!(harness.processing.bind_options(), BindOptions::default());
        assert!(!harness.processing.parallel);
        assert_eq!(harness.format, OutputFormat::Tree);
    }
}
