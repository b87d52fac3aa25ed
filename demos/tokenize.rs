//! Tokenize
//!
//! This example tokenizes a C-like snippet with the C-family grammar and
//! prints each token with its position and numeric value.
//!
//! Key concepts:
//! - Tokenizer built over the `CFamily` grammar
//! - Longest-match operators (`<<=`, `->`)
//! - Numeric literals in every base
//! - Lexical errors reported with their position
//!
//! Run with: cargo run --example tokenize

use fsm_relay::lexical::CFamily;
use fsm_relay::tokenizer::{TokenizeError, Tokenizer};

fn main() -> Result<(), TokenizeError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let tokenizer = Tokenizer::builder().grammar(CFamily).build()?;

    let source = "flags <<= 0x1f;\nmask = 0b1010 | 017;\nratio = 1.5e-3 * \"scale\";\nnode->next";
    println!("=== Tokens ===");
    for token in tokenizer.tokenize(source)? {
        match token.value() {
            Some(value) => println!("{token}  value={value:?}"),
            None => println!("{token}"),
        }
    }

    println!("\n=== Error ===");
    match tokenizer.tokenize("1234.6789.2") {
        Err(TokenizeError::Lexical(error)) => println!("{error}"),
        other => println!("unexpected: {other:?}"),
    }

    Ok(())
}
