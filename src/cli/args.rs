//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::SchemeType;

/// Derive, validate and analyze words from triliteral roots
#[derive(Parser, Debug)]
#[command(name = "sarf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file (in addition to the global one)
    #[arg(short = 'c', long = "config", global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// State file (overrides `state_file` from config)
    #[arg(short, long, global = true, env = "SARF_STATE", value_hint = ValueHint::FilePath)]
    pub state: Option<PathBuf>,

    /// Reverse words for right-to-left display in plain terminals
    #[arg(long, global = true)]
    pub rtl: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage roots
    Root {
        #[command(subcommand)]
        command: RootCommands,
    },

    /// Manage schemes
    Scheme {
        #[command(subcommand)]
        command: SchemeCommands,
    },

    /// Apply a scheme to a root and record the word
    Generate {
        /// Three-letter root
        root: String,
        /// Scheme name
        scheme: String,
    },

    /// Check whether a word derives from a root
    Validate {
        /// Three-letter root
        root: String,
        /// Word to check
        word: String,
    },

    /// Find the root and scheme that produce a word
    Analyze {
        /// Word to analyze
        word: String,
    },

    /// List words recorded for a root
    Derivations {
        /// Three-letter root
        root: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum RootCommands {
    /// Add one or more roots
    Add {
        /// Roots (exactly 3 letters each)
        #[arg(required = true)]
        roots: Vec<String>,
    },

    /// List roots in order
    List,

    /// Show a root and its derivations
    Show {
        /// Three-letter root
        root: String,
    },

    /// Load roots from a file, one per line
    Load {
        /// Roots file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the balanced tree
    Tree,

    /// Print the number of roots
    Count,
}

#[derive(Subcommand, Debug)]
pub enum SchemeCommands {
    /// Add a scheme; its name is its pattern (e.g. مفعول)
    Add {
        /// Pattern containing the three placeholder letters
        pattern: String,
        /// Scheme type
        #[arg(short = 't', long = "type", default_value = "custom", value_parser = parse_scheme_type)]
        scheme_type: SchemeType,
    },

    /// Replace a scheme's pattern, keeping its name
    Modify {
        /// Scheme name
        name: String,
        /// New pattern
        pattern: String,
    },

    /// Remove a scheme
    Remove {
        /// Scheme name
        name: String,
    },

    /// List schemes
    List {
        /// Only schemes of this type
        #[arg(short = 't', long = "type", value_parser = parse_scheme_type)]
        scheme_type: Option<SchemeType>,
    },

    /// List the most used schemes
    Popular {
        /// How many to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}

fn parse_scheme_type(s: &str) -> Result<SchemeType, String> {
    s.parse()
}
