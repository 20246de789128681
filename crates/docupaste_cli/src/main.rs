//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `docupaste_core` linkage.
//! - Print text statistics for a file passed as the first argument.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("docupaste_core ping={}", docupaste_core::ping());
    println!("docupaste_core version={}", docupaste_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("failed to read `{path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stats = docupaste_core::analyze(&content);
    println!("words={}", stats.word_count);
    println!("chars={}", stats.char_count);
    println!("paragraphs={}", stats.paragraph_count);
    println!("sentences={}", stats.sentence_count);
    println!("reading_time_minutes={}", stats.reading_time_minutes);
    for entry in docupaste_core::word_frequency(&content) {
        println!("top_word {}={}", entry.word, entry.count);
    }
    ExitCode::SUCCESS
}
