// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the ngramdex command-line interface.
//!
//! Four subcommands: `index` builds a store directory from JSON, `search`
//! queries one, `inspect` examines a single `.ngx` snapshot, and `tokenize`
//! shows the n-grams (and scores) a string turns into.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ngramdex",
    about = "Typo-tolerant n-gram search over short text fields",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a store directory from a documents file and a manifest
    Index {
        /// Documents JSON: {"documents": [{"id", "class", "fields", "filters"}]}
        #[arg(short, long)]
        input: PathBuf,

        /// Manifest JSON: {"version": 1, "indexes": {name: {fields, filters, config}}}
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output store directory (created if missing)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Search a store directory
    Search {
        /// Store directory written by `index`
        dir: PathBuf,

        /// Query text
        query: String,

        /// Index to search (required when the manifest defines several)
        #[arg(long)]
        index: Option<String>,

        /// Maximum results; 0 returns every match
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Filter as name=value (repeatable); value is JSON or a bare string
        #[arg(short, long = "filter", value_name = "NAME=VALUE")]
        filters: Vec<String>,

        /// Full filter map as JSON, e.g. '{"colors": {"any": ["red"]}}'
        #[arg(long)]
        filter_json: Option<String>,

        /// Restrict to these document classes (repeatable)
        #[arg(long = "class")]
        classes: Vec<String>,

        /// Show scores
        #[arg(long)]
        scores: bool,
    },

    /// Inspect a .ngx snapshot
    Inspect {
        /// Path to .ngx file
        file: PathBuf,
    },

    /// Show the n-grams a string produces
    Tokenize {
        /// Text to tokenize
        text: String,

        /// Use this manifest's index config instead of the defaults
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Index within the manifest
        #[arg(long, requires = "manifest")]
        index: Option<String>,

        /// Produce a bounded query probe instead of index-time n-grams
        #[arg(long)]
        bounded: bool,
    },
}
