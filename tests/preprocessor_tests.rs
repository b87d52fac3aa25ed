//! Preprocessing real files on disk.

use fsm_relay::config::PreprocessorConfig;
use fsm_relay::preprocessor::{PreprocessError, Preprocessor, Record, Transcript};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write(root: &Path, name: &str, text: &str) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

fn preprocessor(include_paths: Vec<PathBuf>) -> (Preprocessor, Arc<Transcript>) {
    init_tracing();
    let transcript = Arc::new(Transcript::new());
    let config = PreprocessorConfig {
        include_paths,
        ..PreprocessorConfig::default()
    };
    let pp = Preprocessor::builder()
        .config(config)
        .observer(transcript.clone())
        .build()
        .unwrap();
    (pp, transcript)
}

#[test]
fn quoted_includes_resolve_against_the_including_file() {
    let dir = TempDir::new().unwrap();
    let main = write(dir.path(), "main.c", "int a;\n#include \"inc/first.h\"\nint c;\n");
    write(dir.path(), "inc/first.h", "#include \"second.h\"\nint b;\n");
    write(dir.path(), "inc/second.h", "#define SECOND\n");
    let (pp, transcript) = preprocessor(Vec::new());

    pp.run(&main).unwrap();

    assert_eq!(
        transcript.tokens(),
        vec!["int", "a", ";", "int", "b", ";", "int", "c", ";"]
    );
    assert!(pp.ifdef("SECOND"));

    let includes: Vec<_> = transcript
        .records()
        .into_iter()
        .filter_map(|record| match record {
            Record::Include { path, depth } => Some((path, depth)),
            _ => None,
        })
        .collect();
    let first = fs::canonicalize(dir.path().join("inc/first.h")).unwrap();
    let second = fs::canonicalize(dir.path().join("inc/second.h")).unwrap();
    assert_eq!(includes, vec![(first.clone(), 1), (second, 2)]);

    let b_file = transcript.records().into_iter().find_map(|record| match record {
        Record::Token { file, token } if token.text == "b" => file,
        _ => None,
    });
    assert_eq!(b_file, Some(first));
}

#[test]
fn headers_with_invalid_utf8_are_still_processed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("latin1.h"), b"int a; /* caf\xe9 */\n").unwrap();
    let main = write(dir.path(), "main.c", "#include \"latin1.h\"\nint b;\n");
    let (pp, transcript) = preprocessor(Vec::new());

    pp.run(&main).unwrap();

    assert_eq!(
        transcript.tokens(),
        vec!["int", "a", ";", "/", "*", "caf\u{fffd}", "*", "/", "int", "b", ";"]
    );
}

#[test]
fn angle_includes_use_the_search_path_in_order() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    write(&second, "lib/api.h", "from_second\n");
    write(&first, "lib/other.h", "unused\n");
    let main = write(dir.path(), "main.c", "#include <lib/api.h>\nmain_body\n");
    let (pp, transcript) = preprocessor(vec![first, second]);

    pp.run(&main).unwrap();

    assert_eq!(transcript.tokens(), vec!["from_second", "main_body"]);
}

#[test]
fn definitions_from_a_file_persist() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "defs.h",
        "#define ALPHA\n#define BETA\n#undef ALPHA\n#ifdef BETA\nkept\n#endif\n",
    );
    let (pp, transcript) = preprocessor(Vec::new());

    pp.run(&main).unwrap();

    assert!(!pp.ifdef("ALPHA"));
    assert!(pp.ifdef("BETA"));
    assert_eq!(pp.symbols().names(), vec!["BETA"]);
    assert_eq!(transcript.tokens(), vec!["kept"]);
}

#[test]
fn missing_includes_do_not_stop_the_file() {
    let dir = TempDir::new().unwrap();
    let main = write(dir.path(), "main.c", "#include <nowhere.h>\nrest\n");
    let (pp, transcript) = preprocessor(vec![dir.path().join("sys")]);

    let result = pp.run(&main);

    assert!(matches!(result, Err(PreprocessError::IncludeNotFound { name, .. }) if name == "nowhere.h"));
    assert_eq!(transcript.tokens(), vec!["rest"]);
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let (pp, _) = preprocessor(Vec::new());

    let result = pp.run(dir.path().join("absent.c"));

    assert!(matches!(result, Err(PreprocessError::Io { .. })));
}

#[test]
fn preprocessor_is_reusable_after_an_error() {
    let dir = TempDir::new().unwrap();
    let bad = write(dir.path(), "bad.c", "#undef NEVER\n");
    let good = write(dir.path(), "good.c", "fine\n");
    let (pp, transcript) = preprocessor(Vec::new());

    assert!(matches!(
        pp.run(&bad),
        Err(PreprocessError::UndefinedSymbol(name)) if name == "NEVER"
    ));
    pp.run(&good).unwrap();

    assert_eq!(transcript.tokens(), vec!["fine"]);
}
