use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roundmark")]
#[command(author, version)]
#[command(about = "A lossless CommonMark and GFM parser, renderer, and linter")]
#[command(
    long_about = "Roundmark parses CommonMark and GitHub Flavored Markdown into a flat token \
    stream that can be rendered to HTML, linted, and written back to the exact source text."
)]
#[command(after_help = "\
EXAMPLES:

    # Show the token stream of a file
    roundmark parse document.md

    # Render HTML from stdin
    cat document.md | roundmark html

    # Verify that files survive a parse/rehydrate round trip
    roundmark check docs/*.md

    # Lint and fix files in place
    roundmark lint --fix README.md

CONFIGURATION:

Roundmark looks for configuration files in this order:
  1. Explicit --config path
  2. roundmark.toml or .roundmark.toml in current/parent directories
  3. Built-in defaults

Example roundmark.toml:

    flavor = \"gfm\"

    [extensions]
    extended_autolinks = false

    [lint]
    disable = [\"MD042\"]")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, roundmark will \
        search for roundmark.toml or .roundmark.toml in the current directory and its parents."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a document and print its token stream
    #[command(after_help = "\
Each token is printed on its own line as [name(line,column):fields]; close tokens are \
prefixed with `end-`.")]
    Parse {
        /// Input file (stdin if not provided)
        file: Option<PathBuf>,

        /// Print the tokens as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a document to HTML
    Html {
        /// Input file (stdin if not provided)
        file: Option<PathBuf>,
    },
    /// Check that documents rehydrate to their exact source
    #[command(
        long_about = "Parse each document and write it back from its tokens. Any difference \
        from the original is printed as a diff and the command exits with code 1."
    )]
    Check {
        /// Input files (stdin if none provided)
        files: Vec<PathBuf>,
    },
    /// Lint documents
    #[command(after_help = "\
RULES:

  MD039 no-space-in-links  Spaces inside link text (fixable)
  MD042 no-empty-links     Links with an empty or `#` destination
  MD045 no-alt-text        Images without alternate text")]
    Lint {
        /// Input files (stdin if none provided)
        files: Vec<PathBuf>,

        /// Apply fixes and write files back (stdin input is printed fixed)
        #[arg(long)]
        fix: bool,
    },
}
