use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use rayon::prelude::*;
use similar::{ChangeTag, TextDiff};

use roundmark::linter::{self, Diagnostic};
use roundmark::{Config, html, parse};
use roundmark_parser::{TokenStream, rehydrate, render_tokens};

mod cli;
use cli::{Cli, Commands};

const STDIN_NAME: &str = "<stdin>";

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: Option<&Path>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn load_config(explicit: Option<&Path>, file: Option<&Path>) -> io::Result<Config> {
    let start_dir = start_dir_for(file)?;
    let (cfg, cfg_path) = roundmark::config::load(explicit, &start_dir)?;
    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }
    Ok(cfg)
}

fn display_name(file: Option<&PathBuf>) -> String {
    file.map_or_else(|| STDIN_NAME.to_string(), |p| p.display().to_string())
}

fn print_diff(file_path: &str, original: &str, rehydrated: &str) {
    let diff = TextDiff::from_lines(original, rehydrated);

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("---");
        }

        println!("Diff in {}:{}:", file_path, group[0].old_range().start + 1);

        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("-", "\x1b[31m"), // red
                    ChangeTag::Insert => ("+", "\x1b[32m"), // green
                    ChangeTag::Equal => (" ", "\x1b[0m"),   // normal
                };

                print!("{}{}{}", style, sign, change.value());

                if change.tag() != ChangeTag::Equal {
                    print!("\x1b[0m");
                }
                if change.missing_newline() {
                    println!();
                }
            }
        }
    }
}

fn print_diagnostics(file_name: &str, diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        println!(
            "{}:{}:{}: {} {}",
            file_name, diag.location.line, diag.location.column, diag.code, diag.message
        );
    }
}

/// Stdin stands in for an empty file list.
fn inputs(files: Vec<PathBuf>) -> Vec<Option<PathBuf>> {
    if files.is_empty() {
        vec![None]
    } else {
        files.into_iter().map(Some).collect()
    }
}

enum CheckOutcome {
    Identical,
    Differs { input: String, output: String },
    Failed(String),
}

fn check_one(explicit: Option<&Path>, file: Option<&PathBuf>) -> CheckOutcome {
    let run = || -> io::Result<CheckOutcome> {
        let cfg = load_config(explicit, file.map(PathBuf::as_path))?;
        let input = read_all(file)?;
        let tokens = parse(&input, Some(cfg));
        let output = rehydrate(&tokens).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if output == input {
            Ok(CheckOutcome::Identical)
        } else {
            Ok(CheckOutcome::Differs { input, output })
        }
    };
    run().unwrap_or_else(|e| CheckOutcome::Failed(e.to_string()))
}

struct LintOutcome {
    diagnostics: Vec<Diagnostic>,
    fixed: usize,
    /// Fixed text of stdin input, printed instead of written.
    stdout: Option<String>,
}

fn lint_one(explicit: Option<&Path>, file: Option<&PathBuf>, fix: bool) -> io::Result<LintOutcome> {
    let cfg = load_config(explicit, file.map(PathBuf::as_path))?;
    let input = read_all(file)?;
    let tokens: TokenStream = parse(&input, Some(cfg.clone()));
    let diagnostics = linter::lint(&tokens, &input, &cfg);

    if !fix {
        return Ok(LintOutcome {
            diagnostics,
            fixed: 0,
            stdout: None,
        });
    }

    let (fixable, remaining): (Vec<Diagnostic>, Vec<Diagnostic>) =
        diagnostics.into_iter().partition(|d| d.fix.is_some());
    let output = linter::fix(&tokens, &fixable)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let stdout = match file {
        Some(path) => {
            if !fixable.is_empty() {
                fs::write(path, &output)?;
            }
            None
        }
        None => Some(output),
    };
    Ok(LintOutcome {
        diagnostics: remaining,
        fixed: fixable.len(),
        stdout,
    })
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let explicit = cli.config.as_deref();

    match cli.command {
        Commands::Parse { file, json } => {
            let cfg = load_config(explicit, file.as_deref())?;
            let input = read_all(file.as_ref())?;
            let tokens = parse(&input, Some(cfg));
            if json {
                let out = serde_json::to_string_pretty(&tokens)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                println!("{out}");
            } else {
                print!("{}", render_tokens(&tokens));
            }
            Ok(())
        }
        Commands::Html { file } => {
            let cfg = load_config(explicit, file.as_deref())?;
            let input = read_all(file.as_ref())?;
            let options = cfg.parser_options();
            let tokens = parse(&input, Some(cfg));
            print!("{}", html::to_html(&tokens, options));
            Ok(())
        }
        Commands::Check { files } => {
            let inputs = inputs(files);
            let outcomes: Vec<CheckOutcome> = inputs
                .par_iter()
                .map(|file| check_one(explicit, file.as_ref()))
                .collect();

            let mut failures = 0;
            for (file, outcome) in inputs.iter().zip(outcomes) {
                let name = display_name(file.as_ref());
                match outcome {
                    CheckOutcome::Identical => log::info!("{name} round-trips"),
                    CheckOutcome::Differs { input, output } => {
                        failures += 1;
                        print_diff(&name, &input, &output);
                    }
                    CheckOutcome::Failed(message) => {
                        failures += 1;
                        eprintln!("Error: {name}: {message}");
                    }
                }
            }

            if failures > 0 {
                eprintln!("{failures} file(s) failed the round trip check");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Lint { files, fix } => {
            let inputs = inputs(files);
            let outcomes: Vec<io::Result<LintOutcome>> = inputs
                .par_iter()
                .map(|file| lint_one(explicit, file.as_ref(), fix))
                .collect();

            let mut issues = 0;
            let mut failed = false;
            let mut printed_document = false;
            for (file, outcome) in inputs.iter().zip(outcomes) {
                let name = display_name(file.as_ref());
                match outcome {
                    Ok(outcome) => {
                        if let Some(fixed) = &outcome.stdout {
                            print!("{fixed}");
                            printed_document = true;
                            for diag in &outcome.diagnostics {
                                eprintln!(
                                    "{}:{}:{}: {} {}",
                                    name,
                                    diag.location.line,
                                    diag.location.column,
                                    diag.code,
                                    diag.message
                                );
                            }
                        } else {
                            print_diagnostics(&name, &outcome.diagnostics);
                            if outcome.fixed > 0 {
                                println!("Fixed {} issue(s) in {}", outcome.fixed, name);
                            }
                        }
                        issues += outcome.diagnostics.len();
                    }
                    Err(e) => {
                        failed = true;
                        eprintln!("Error: {name}: {e}");
                    }
                }
            }

            if issues > 0 {
                eprintln!("Found {issues} issue(s)");
            } else if !failed && !printed_document {
                println!("No issues found");
            }
            if failed || issues > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
