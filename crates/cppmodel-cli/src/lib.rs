//! cppmodel command-line interface.
//!
pub mod discovery;
pub mod options;
pub mod output;
pub mod pipeline;

use cppmodel_error::Result;

pub use options::{OutputFormat, ProcessingOptions};
pub use pipeline::{FileModel, bind_file, process_files};

/// File extensions treated as C/C++ sources and headers.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "inl"];

/// Options for running cppmodel.
#[derive(Debug, Clone, Default)]
pub struct CppModelOptions {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
    pub output: Option<String>,
    pub format: OutputFormat,
    pub processing: ProcessingOptions,
}

/// Main entry point. `None` when no input file was found.
pub fn run_main(opts: &CppModelOptions) -> Result<Option<String>> {
    let extensions: std::collections::HashSet<&str> = SOURCE_EXTENSIONS.iter().copied().collect();

    let files = discovery::discover_files(opts, &extensions)?;

    if files.is_empty() {
        return Ok(None);
    }

    let models = process_files(opts, &files)?;
    Ok(Some(output::merge_outputs(&models)))
}
