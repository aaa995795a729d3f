//! Source file discovery.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use ignore::WalkBuilder;
use tracing::info;

use cppmodel_error::{Error, ErrorKind, Result};

use crate::CppModelOptions;

/// Directories to skip during file discovery.
fn should_skip_dir(name: &str) -> bool {
    matches!(
        name,
        "test"
            | "tests"
            | "testing"
            | "example"
            | "examples"
            | "doc"
            | "docs"
            | "bench"
            | "benches"
            // Build output directories
            | "target"
            | "build"
            | "cmake-build-debug"
            | "cmake-build-release"
            | "out"
            // Vendor/dependency directories
            | "vendor"
            | "third_party"
            | "3rdparty"
    )
}

/// Generated code: protobuf, gRPC, FlatBuffers, Qt moc.
fn is_generated_file(path: &Path) -> bool {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    file_name.ends_with(".pb.h")
        || file_name.ends_with(".pb.cc")
        || file_name.ends_with(".grpc.pb.h")
        || file_name.ends_with(".grpc.pb.cc")
        || file_name.ends_with("_generated.h")
        || (file_name.starts_with("moc_") && file_name.ends_with(".cpp"))
}

/// Discover files matching any of the given extensions.
///
/// Explicit `opts.files` come first, in the order given, followed by the
/// matching files under each of `opts.dirs` sorted by path. Duplicates and
/// generated files are dropped.
pub fn discover_files(opts: &CppModelOptions, extensions: &HashSet<&str>) -> Result<Vec<String>> {
    let discovery_start = Instant::now();

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut skipped_count = 0usize;

    let mut add_path = |path: &str| {
        if seen.contains(path) {
            return;
        }
        if is_generated_file(Path::new(path)) {
            skipped_count += 1;
            return;
        }
        seen.insert(path.to_string());
        files.push(path.to_string());
    };

    for file in &opts.files {
        if !Path::new(file).is_file() {
            return Err(Error::file_not_found(file.as_str()).with_operation("cli::discover_files"));
        }
        add_path(file);
    }

    for dir in &opts.dirs {
        let mut builder = WalkBuilder::new(dir);
        builder
            .standard_filters(true)
            .follow_links(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let Some(file_type) = entry.file_type() else {
                    return true;
                };
                if !file_type.is_dir() {
                    return true;
                }
                let Some(name) = entry.file_name().to_str() else {
                    return true;
                };
                !should_skip_dir(&name.to_ascii_lowercase())
            });

        for entry in builder.build() {
            let entry = entry.map_err(|e| {
                Error::new(ErrorKind::TraversalFailed, e.to_string())
                    .with_operation("cli::discover_files")
                    .with_context("dir", dir.as_str())
            })?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };

            if extensions.contains(ext.to_ascii_lowercase().as_str()) {
                add_path(&path.to_string_lossy());
            }
        }
    }

    if skipped_count > 0 {
        info!(skipped_count, "skipped generated files");
    }

    info!(
        "File discovery: {:.2}s ({} files)",
        discovery_start.elapsed().as_secs_f64(),
        files.len()
    );

    Ok(files)
}
