// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the stemdex command-line interface.
//!
//! `build` turns a word list and a template-group file into a `.stemdex`
//! store, `inspect` describes one, and the remaining subcommands load a store
//! and run a single kind of query against it.

pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stemdex",
    about = "Template-driven stemming and tokenized fuzzy lookup",
    version
)]
pub struct Cli {
    /// Log at debug level (otherwise STEMDEX_LOG, default warn)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand that loads a store.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Path to .stemdex file
    pub file: PathBuf,

    /// Tokenizer model (tokenizer.json or newline-delimited pieces)
    ///
    /// Without one, every character of the vocabulary becomes a piece.
    #[arg(short, long)]
    pub tokenizer: Option<PathBuf>,

    /// Store config JSON; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a store from a word list and template groups
    Build {
        /// Newline-delimited word list
        #[arg(short, long)]
        words: PathBuf,

        /// Template groups JSON: [{"length": 4, "templates": ["*хэри"]}, ...]
        #[arg(short = 'T', long)]
        templates: PathBuf,

        /// Output .stemdex file
        #[arg(short, long)]
        output: PathBuf,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Inspect a .stemdex file structure
    Inspect {
        /// Path to .stemdex file
        file: PathBuf,
    },

    /// Stem words through the stored templates
    Stem {
        #[command(flatten)]
        store: StoreArgs,

        /// Words to stem
        #[arg(required = true)]
        words: Vec<String>,

        /// Stem with these template groups instead of the stored ones
        #[arg(short = 'T', long)]
        templates: Option<PathBuf>,

        /// Depth bound for recursive stems
        #[arg(long)]
        max_level: Option<usize>,

        /// Most common stems to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Fuzzy lookup through the tokenized inverted index
    Search {
        #[command(flatten)]
        store: StoreArgs,

        /// Word to look up
        word: String,

        /// Minimum similarity (0-100)
        #[arg(long)]
        min_ratio: Option<f64>,

        /// Use only the N rarest tokens
        #[arg(long)]
        token_limit: Option<usize>,

        /// Score once the candidate set shrinks below this size
        #[arg(long)]
        step_limit: Option<usize>,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Prefix, wildcard-suffix, and sub-word queries
    Affix {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        query: AffixQuery,

        /// Arbitrary chars before --suffix
        #[arg(long, default_value = "0", requires = "suffix")]
        prefix_len: usize,

        /// End the word right after --suffix
        #[arg(long, requires = "suffix")]
        exact: bool,
    },

    /// Propose a vocabulary sub-word as the stem of a (possibly unknown) word
    CalcStem {
        #[command(flatten)]
        store: StoreArgs,

        /// Word to analyse
        word: String,

        /// Shortest sub-word to propose
        #[arg(long)]
        min_length: Option<usize>,
    },
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct AffixQuery {
    /// Words starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Words with this suffix after --prefix-len chars
    #[arg(long)]
    pub suffix: Option<String>,

    /// Vocabulary words that are prefixes of this word
    #[arg(long)]
    pub sub_words: Option<String>,
}
