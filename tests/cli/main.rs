//! CLI integration tests for roundmark.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (parse, html, check, lint)
//! - Stdin/stdout handling
//! - Exit codes
//! - File I/O operations

mod check;
mod common;
mod html;
mod lint;
mod parse;
