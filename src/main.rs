// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ngramdex::build::{run_index, Manifest, MANIFEST_FILE};
use ngramdex::store::snapshot;
use ngramdex::{
    extract, FileStore, FilterQuery, IndexConfig, SearchOptions, TableStats,
};

mod cli;
use cli::display::*;
use cli::{Cli, Commands};

/// Log filter env var; falls back to `warn`.
const LOG_ENV: &str = "NGRAMDEX_LOG";

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Index {
            input,
            manifest,
            output,
        } => cmd_index(&input, &manifest, &output),
        Commands::Search {
            dir,
            query,
            index,
            limit,
            filters,
            filter_json,
            classes,
            scores,
        } => {
            let options = SearchOptions {
                index,
                max_results: (limit > 0).then_some(limit),
                return_scores: scores,
                filters: FilterQuery::new(),
                classes: (!classes.is_empty()).then_some(classes),
            };
            parse_filters(&filters, filter_json.as_deref())
                .and_then(|filters| cmd_search(&dir, &query, SearchOptions { filters, ..options }))
        }
        Commands::Inspect { file } => cmd_inspect(&file),
        Commands::Tokenize {
            text,
            manifest,
            index,
            bounded,
        } => cmd_tokenize(&text, manifest.as_deref(), index.as_deref(), bounded),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn cmd_index(input: &Path, manifest: &Path, output: &Path) -> Result<()> {
    let report = run_index(input, manifest, output)?;

    eprintln!();
    eprintln!("✅ Build complete");
    for (name, summary) in &report.indexes {
        eprintln!(
            "   {} │ {} indexed │ {} empty │ {} skipped │ {} postings",
            name, summary.indexed, summary.empty, summary.skipped, summary.postings
        );
    }
    eprintln!(
        "   {} documents │ {} snapshots written to {}",
        report.documents,
        report.files_written,
        output.display()
    );
    Ok(())
}

/// `name=value` pairs plus an optional JSON map. Values that parse as JSON are
/// used as such, anything else is a plain string.
fn parse_filters(pairs: &[String], json: Option<&str>) -> Result<FilterQuery> {
    let mut filters = match json {
        Some(json) => serde_json::from_str::<FilterQuery>(json).context("invalid --filter-json")?,
        None => FilterQuery::new(),
    };
    for pair in pairs {
        let Some((name, raw)) = pair.split_once('=') else {
            bail!("filter '{}' is not NAME=VALUE", pair);
        };
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        filters.insert(name.to_string(), value);
    }
    Ok(filters)
}

fn cmd_search(dir: &Path, query: &str, options: SearchOptions) -> Result<()> {
    let manifest = Manifest::load(&dir.join(MANIFEST_FILE))?;
    let store = FileStore::open(dir).with_context(|| format!("failed to open {}", dir.display()))?;
    let engine = manifest.engine(store);
    let hits = engine.search(query, &options)?;

    section_top(&format!("\"{}\"", query));
    if hits.is_empty() {
        row(&dim("  no matches"));
    }
    for (rank, hit) in hits.iter().enumerate() {
        let score = if options.return_scores {
            format!("{}  ", score_value(hit.score))
        } else {
            String::new()
        };
        row(&format!(
            "  {}  {}{}  {}",
            pad_left(&(rank + 1).to_string(), 3),
            score,
            pad_right(&class_label(&hit.document_class), 12),
            bold(hit.document_id.as_str()),
        ));
    }
    section_bot();
    Ok(())
}

fn cmd_inspect(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let info = snapshot::read_info(&bytes)?;

    section_top(&file.display().to_string());
    row(&format!("  format version   {}", info.version));
    row(&format!("  file size        {}", format_size(info.total_len)));
    row(&format!("  body (brotli)    {}", format_size(info.body_len)));
    row(&format!(
        "  crc32            {:08x}  {}",
        info.stored_crc,
        status_badge(info.checksum_ok())
    ));

    match snapshot::decode(&bytes) {
        Ok(postings) => {
            let raw = serde_json::to_vec(&postings)?.len();
            let stats = TableStats::of(&postings);
            section_mid("POSTINGS");
            row(&format!("  postings         {}", stats.postings));
            row(&format!("  distinct n-grams {}", stats.ngrams));
            row(&format!("  documents        {}", stats.documents));
            let classes: Vec<String> = stats.classes.iter().map(|c| class_label(c)).collect();
            row(&format!("  classes          {}", classes.join(", ")));
            row(&format!(
                "  compression      {} → {} {}",
                format_size(raw),
                format_size(info.body_len),
                savings(raw, info.body_len)
            ));
            section_bot();
            Ok(())
        }
        Err(e) => {
            section_bot();
            Err(e).context("snapshot failed verification")
        }
    }
}

fn cmd_tokenize(text: &str, manifest: Option<&Path>, index: Option<&str>, bounded: bool) -> Result<()> {
    let config = match manifest {
        Some(path) => {
            let manifest = Manifest::load(path)?;
            let definition = match index {
                Some(name) => manifest
                    .indexes
                    .get(name)
                    .with_context(|| format!("manifest has no index '{}'", name))?,
                None if manifest.indexes.len() == 1 => manifest
                    .indexes
                    .values()
                    .next()
                    .context("manifest defines no indexes")?,
                None => bail!(
                    "manifest defines several indexes ({}); pass --index",
                    manifest.indexes.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            };
            definition.config.clone()
        }
        None => IndexConfig::default(),
    };

    let mut grams: Vec<(String, f64)> = extract(Some(text), &config, bounded).into_iter().collect();
    grams.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let label = if bounded { "PROBE" } else { "N-GRAMS" };
    section_top(&format!("{} ({})", label, grams.len()));
    for (gram, score) in &grams {
        row(&format!("  {}  {}", score_value(*score), pad_right(&format!("{:?}", gram), 24)));
    }
    section_bot();
    Ok(())
}
