//! Expansion and merge against files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use unify::{
    CommitMode, ExpandError, Expander, FsLineSource, Merger, SourceError, UnifyConfig,
};

/// Write `contents` to `dir/name` and return the full path.
fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn include(path: &Path) -> String {
    format!("#include \"{}\"", path.display())
}

fn expand(path: &Path) -> Result<String, ExpandError> {
    let mut out = Vec::new();
    Expander::new(&FsLineSource).expand(path, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_plain_file_gets_trailing_newline() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "plain.c", "int a;\nint b;");
    assert_eq!(expand(&file).unwrap(), "int a;\nint b;\n");
}

#[test]
fn test_local_header_inlined() {
    let dir = TempDir::new().unwrap();
    let b = write(dir.path(), "b.h", "lineB\n");
    let a = write(dir.path(), "a.h", &format!("line1\n{}\nline2\n", include(&b)));
    assert_eq!(expand(&a).unwrap(), "line1\nlineB\nline2\n");
}

#[test]
fn test_system_header_untouched() {
    let dir = TempDir::new().unwrap();
    let x = write(dir.path(), "x.c", "#include <stdio.h>\n");
    assert_eq!(expand(&x).unwrap(), "#include <stdio.h>\n");
}

#[test]
fn test_nested_chain() {
    let dir = TempDir::new().unwrap();
    let c = write(dir.path(), "c.h", "C\n");
    let b = write(dir.path(), "b.h", &format!("B1\n{}\nB2\n", include(&c)));
    let a = write(dir.path(), "a.c", &format!("A1\n{}\nA2\n", include(&b)));
    assert_eq!(expand(&a).unwrap(), "A1\nB1\nC\nB2\nA2\n");
}

#[test]
fn test_missing_header_fails_expansion() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.h");
    let a = write(dir.path(), "a.h", &format!("before\n{}\nafter\n", include(&missing)));

    let mut out = Vec::new();
    let err = Expander::new(&FsLineSource)
        .expand(&a, &mut out)
        .unwrap_err();
    assert!(matches!(err, ExpandError::Source(SourceError::Open { .. })));
    assert_eq!(out, b"before\n");
}

#[test]
fn test_empty_include_path_fails_expansion() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "e.c", "x\n#include \"\"\ny\n");

    let mut out = Vec::new();
    let err = Expander::new(&FsLineSource).expand(&file, &mut out).unwrap_err();
    match err {
        ExpandError::Source(e @ SourceError::Open { .. }) => assert_eq!(e.path(), Path::new("")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(out, b"x\n");
}

#[cfg(target_os = "linux")]
#[test]
fn test_latin1_header_name_inlined() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let header = dir.path().join(OsStr::from_bytes(b"caf\xe9.h"));
    fs::write(&header, "int cafe;\n").unwrap();

    let mut main = b"#include \"".to_vec();
    main.extend_from_slice(header.as_os_str().as_bytes());
    main.extend_from_slice(b"\"\nint main;\n");
    let main_c = dir.path().join("main.c");
    fs::write(&main_c, main).unwrap();

    assert_eq!(expand(&main_c).unwrap(), "int cafe;\nint main;\n");
}

#[test]
fn test_cycle_through_different_spelling() {
    let dir = TempDir::new().unwrap();
    let loop_h = dir.path().join("loop.h");
    let dotted = dir.path().join(".").join("loop.h");
    fs::write(&loop_h, format!("x\n{}\n", include(&dotted))).unwrap();

    let err = expand(&loop_h).unwrap_err();
    assert!(matches!(err, ExpandError::InclusionCycle { .. }), "{err}");
}

#[test]
fn test_crlf_passes_through() {
    let dir = TempDir::new().unwrap();
    let b = write(dir.path(), "b.h", "b\r\n");
    let a = write(dir.path(), "a.c", &format!("{}\r\na\r\n", include(&b)));
    assert_eq!(expand(&a).unwrap(), "b\r\na\r\n");
}

#[test]
fn test_merge_reports_failed_file_and_continues() {
    let dir = TempDir::new().unwrap();
    let f1 = dir.path().join("f1.c");
    let h = write(dir.path(), "f2.h", "int h;\n");
    let f2 = write(dir.path(), "f2.c", &format!("{}\nint main;\n", include(&h)));
    let files = vec![f1, f2];

    let mut out = Vec::new();
    let mut diag = Vec::new();
    let report = Merger::new(&FsLineSource)
        .merge(&mut out, &mut diag, files.as_slice())
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "int h;\nint main;\n");
    let diag = String::from_utf8(diag).unwrap();
    assert!(diag.contains("[ERROR] Unable to expand"));
    assert!(diag.contains("f1.c"));
    assert_eq!(report.failure_count(), 1);
}

#[test]
fn test_merge_buffered_from_config() {
    let dir = TempDir::new().unwrap();
    let bad = write(
        dir.path(),
        "bad.c",
        &format!("partial\n{}\n", include(&dir.path().join("nope.h"))),
    );
    let good = write(dir.path(), "good.c", "good\n");
    let config_path = write(dir.path(), "unify.toml", "commit = \"buffered\"\n");
    let config = UnifyConfig::load(Some(config_path.as_path())).unwrap();
    assert_eq!(config.commit, CommitMode::Buffered);

    let files = [bad, good];
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let report = Merger::from_config(&FsLineSource, &config)
        .merge(&mut out, &mut diag, files.as_slice())
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "good\n");
    assert!(!report.all_succeeded());
}
