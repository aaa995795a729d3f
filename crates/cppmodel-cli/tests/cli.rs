use std::fs;
use std::path::Path;

use cppmodel::{CppModelOptions, OutputFormat, ProcessingOptions, bind_file, discovery, run_main};
use cppmodel_error::ErrorKind;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fixture_source() -> String {
    textwrap::dedent(
        r#"
        namespace geo {
        class Point {
        public:
            int x() const;
        private:
            int x_;
        };
        }

        int main() {
            int answer = 42;
            return answer;
        }
        "#,
    )
}

fn write(dir: &Path, relative: &str, source: &str) -> String {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, source).expect("write fixture");
    path.display().to_string()
}

fn base_options(files: Vec<String>) -> CppModelOptions {
    CppModelOptions {
        files,
        ..Default::default()
    }
}

fn signatures(output: &str) -> Vec<&str> {
    output
        .lines()
        .skip(1)
        .map(|line| line.split("  [").next().unwrap_or(line).trim())
        .collect()
}

#[test]
fn tree_output_nests_members() {
    let dir = tempdir().expect("tempdir");
    let file = write(dir.path(), "fixture.cpp", &fixture_source());

    let output = run_main(&base_options(vec![file.clone()]))
        .expect("run")
        .expect("output");

    assert_eq!(output.lines().next(), Some(file.as_str()));
    assert_eq!(
        signatures(&output),
        vec!["namespace geo", "class Point", "int x() const", "int x_", "int main()", "{...}", "int answer"]
    );
    assert!(output.contains("\n      int x_  [Declaration private "), "{output}");
}

#[test]
fn skip_bodies_drops_locals() {
    let dir = tempdir().expect("tempdir");
    let file = write(dir.path(), "fixture.cpp", &fixture_source());

    let mut opts = base_options(vec![file]);
    opts.processing = ProcessingOptions::new().with_skip_bodies(true);
    let output = run_main(&opts).expect("run").expect("output");

    assert!(output.contains("int main()"), "{output}");
    assert!(!output.contains("int answer"), "{output}");
}

#[test]
fn flat_output_prefixes_paths() {
    let dir = tempdir().expect("tempdir");
    let file = write(dir.path(), "fixture.cpp", &fixture_source());

    let mut opts = base_options(vec![file.clone()]);
    opts.format = OutputFormat::Flat;
    let output = run_main(&opts).expect("run").expect("output");

    assert!(output.lines().all(|line| line.starts_with(&file)), "{output}");
    assert!(output.contains(": Class class Point"), "{output}");
}

#[test]
fn parallel_run_keeps_input_order() {
    let dir = tempdir().expect("tempdir");
    let files: Vec<String> = (0..8)
        .map(|i| write(dir.path(), &format!("f{i}.cpp"), &format!("int value{i};\n")))
        .collect();

    let sequential = run_main(&base_options(files.clone())).expect("run").expect("output");
    let mut opts = base_options(files);
    opts.processing = ProcessingOptions::new().with_parallel(true);
    let parallel = run_main(&opts).expect("run").expect("output");

    assert_eq!(sequential, parallel);
    assert!(sequential.find("int value0").unwrap() < sequential.find("int value7").unwrap());
}

#[test]
fn directories_are_walked_for_sources() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "src/a.cpp", "int a;\n");
    write(dir.path(), "include/b.hpp", "int b;\n");
    write(dir.path(), "src/notes.txt", "not c++\n");
    write(dir.path(), "build/gen.cpp", "int generated;\n");
    write(dir.path(), "src/msg.pb.h", "int proto;\n");

    let opts = CppModelOptions {
        dirs: vec![dir.path().display().to_string()],
        ..Default::default()
    };
    let extensions = cppmodel::SOURCE_EXTENSIONS.iter().copied().collect();
    let files = discovery::discover_files(&opts, &extensions).expect("discover");
    let names: Vec<&str> = files
        .iter()
        .filter_map(|f| Path::new(f).file_name().and_then(|n| n.to_str()))
        .collect();

    assert_eq!(names, vec!["b.hpp", "a.cpp"]);
}

#[test]
fn deep_file_is_truncated_not_fatal() {
    let dir = tempdir().expect("tempdir");
    let terms: Vec<String> = (0..600).map(|i| format!("a{i}")).collect();
    let file = write(
        dir.path(),
        "sum.cpp",
        &format!("int y;\nint total = {};\nint z;\n", terms.join(" + ")),
    );

    let opts = base_options(vec![file.clone()]);
    let model = bind_file(&opts, &file).expect("bind");
    assert!(model.depth_exceeded);
    assert_eq!(signatures(&model.rendered), vec!["int y", "int total", "int z"]);
}

#[test]
fn empty_directory_yields_no_output() {
    let dir = tempdir().expect("tempdir");
    let opts = CppModelOptions {
        dirs: vec![dir.path().display().to_string()],
        ..Default::default()
    };
    assert!(run_main(&opts).expect("run").is_none());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("missing.cpp").display().to_string();

    let err = run_main(&base_options(vec![missing])).expect_err("missing file");
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}
