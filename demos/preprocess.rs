//! Preprocess
//!
//! This example runs the preprocessor over a file given on the command line,
//! or over a built-in snippet, and prints what the observer saw.
//!
//! Key concepts:
//! - A tokenizer relaying tokens into the preprocessor engine
//! - `#include` processed in place by a child preprocessor
//! - `#define` / `#undef` updating the shared symbol table
//! - `INCLUDE` environment variable as the `<...>` search path
//!
//! Run with: cargo run --example preprocess -- path/to/file.c

use fsm_relay::preprocessor::{PreprocessError, Preprocessor, Record, Transcript};
use std::sync::Arc;

fn main() -> Result<(), PreprocessError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let transcript = Arc::new(Transcript::new());
    let pp = Preprocessor::builder().observer(transcript.clone()).build()?;

    let result = match std::env::args().nth(1) {
        Some(path) => pp.run(path),
        None => pp.run_source("#define DEBUG\n#define VERBOSE\n#undef VERBOSE\nint main ( ) { return 0 ; }\n"),
    };

    println!("=== Observed ===");
    for record in transcript.records() {
        match record {
            Record::Token { token, .. } => println!("  token   {token}"),
            Record::Include { path, depth } => println!("  include {} (depth {depth})", path.display()),
            Record::Unresolved { name } => println!("  missing {name}"),
        }
    }

    println!("\n=== Symbols ===");
    for name in pp.symbols().names() {
        println!("  {name}");
    }

    result
}
