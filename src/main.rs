// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stemdex::binary::{self, StemdexHeader};
use stemdex::build::build_store_from_files;
use stemdex::config::StoreConfig;
use stemdex::rules::{StemRule, TemplateGroupSpec};
use stemdex::stemmer::Stemmer;
use stemdex::store::StemmerStore;
use stemdex::tokenize::UnigramTokenizer;

mod cli;
use cli::display::{
    field, format_size, row, score_value, section_bot, section_top, status, template_badge,
    title, word_label,
};
use cli::{AffixQuery, Cli, Commands, StoreArgs};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("STEMDEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            words,
            templates,
            output,
            quiet,
        } => run_build(&words, &templates, &output, !quiet),
        Commands::Inspect { file } => run_inspect(&file),
        Commands::Stem {
            store,
            words,
            templates,
            max_level,
            limit,
        } => run_stem(&store, &words, templates.as_deref(), max_level, limit),
        Commands::Search {
            store,
            word,
            min_ratio,
            token_limit,
            step_limit,
            limit,
        } => {
            let store = load_store(&store, |config| {
                if let Some(min_ratio) = min_ratio {
                    config.fuzzy.min_ratio = min_ratio;
                }
                if token_limit.is_some() {
                    config.fuzzy.token_limit = token_limit;
                }
                if let Some(step_limit) = step_limit {
                    config.fuzzy.step_candidate_limit = step_limit;
                }
            })?;
            run_search(&store, &word, limit);
            Ok(())
        }
        Commands::Affix {
            store,
            query,
            prefix_len,
            exact,
        } => {
            let store = load_store(&store, |_| {})?;
            run_affix(&store, &query, prefix_len, exact);
            Ok(())
        }
        Commands::CalcStem {
            store,
            word,
            min_length,
        } => {
            let store = load_store(&store, |_| {})?;
            let min_length = min_length.unwrap_or(store.config().min_subword_length);
            match store.calc_stem(&word, min_length) {
                Some((stem, votes)) => println!("{}\t{}", word_label(&stem, true), votes),
                None => println!("{}", word_label("(no sub-word)", false)),
            }
            Ok(())
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Config file (if any), then flag overrides, then store + tokenizer.
fn load_store(
    args: &StoreArgs,
    overrides: impl FnOnce(&mut StoreConfig),
) -> Result<StemmerStore<UnigramTokenizer>> {
    let start = Instant::now();
    let mut config = match &args.config {
        Some(path) => StoreConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    overrides(&mut config);

    let data = binary::read_store(&args.file)
        .with_context(|| format!("Failed to read store {}", args.file.display()))?;

    let tokenizer = match &args.tokenizer {
        Some(path) => UnigramTokenizer::from_file(path)
            .with_context(|| format!("Failed to load tokenizer {}", path.display()))?,
        None => UnigramTokenizer::from_alphabet(data.vocabulary.keys())
            .context("Failed to derive a tokenizer from the vocabulary")?,
    };

    let store = StemmerStore::load(data, tokenizer, config).context("Failed to load store")?;
    tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "store ready");
    Ok(store)
}

// ============================================================================
// BUILD / INSPECT
// ============================================================================

fn run_build(words: &Path, templates: &Path, output: &Path, show_progress: bool) -> Result<()> {
    let start = Instant::now();
    let data = build_store_from_files(words, templates, show_progress).with_context(|| {
        format!(
            "Failed to build from {} and {}",
            words.display(),
            templates.display()
        )
    })?;
    binary::write_store(&data, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let size = fs::metadata(output).map(|m| m.len() as usize).unwrap_or(0);
    println!(
        "✓ {} words, {} templates, {} pairs → {} ({}) in {:.2?}",
        data.vocabulary.len(),
        data.templates.len(),
        data.associations.pair_count(),
        output.display(),
        format_size(size),
        start.elapsed()
    );
    Ok(())
}

fn run_inspect(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = binary::inspect(&bytes)
        .with_context(|| format!("{} is not a valid store", file.display()))?;
    let valid = binary::decode_store(&bytes);

    title(&file.display().to_string());

    section_top("HEADER");
    field("version", &summary.version.to_string());
    field("words", &summary.word_count.to_string());
    field("templates", &summary.template_count.to_string());
    field("word/template", &summary.pair_count.to_string());
    section_bot();

    section_top("SECTIONS");
    field("header", &format_size(StemdexHeader::SIZE));
    field("vocabulary", &format_size(summary.vocab_bytes));
    field("templates", &format_size(summary.template_bytes));
    field("associations", &format_size(summary.assoc_bytes));
    field("total", &format_size(summary.file_size));
    section_bot();

    section_top("INTEGRITY");
    field("crc32", &format!("{:#010x}", summary.crc32));
    match &valid {
        Ok(_) => row(&format!(" {}", status(true, "checksum and store invariants hold"))),
        Err(e) => row(&format!(" {}", status(false, &e.to_string()))),
    }
    section_bot();

    valid.map(|_| ()).context("Store failed validation")
}

// ============================================================================
// QUERIES
// ============================================================================

fn run_stem(
    args: &StoreArgs,
    words: &[String],
    templates: Option<&Path>,
    max_level: Option<usize>,
    limit: usize,
) -> Result<()> {
    let store = load_store(args, |config| {
        if let Some(max_level) = max_level {
            config.max_level = max_level;
        }
    })?;

    let regex_stemmer = match templates {
        Some(path) => {
            let rules = TemplateGroupSpec::from_json_file(path)
                .and_then(|spec| spec.compile())
                .with_context(|| format!("Failed to compile templates {}", path.display()))?;
            Some(Stemmer::new(rules.into_iter().map(StemRule::from).collect()))
        }
        None => None,
    };

    for word in words {
        section_top(word);
        let known = store.lookup(word).is_some();
        field("known", &word_label(if known { "yes" } else { "no" }, known));

        match &regex_stemmer {
            Some(stemmer) => {
                field("stem", &word_label(&stemmer.stem(word), true));
                let found = stemmer.find_suitable_templates(word);
                let badges: Vec<String> = found.iter().map(|t| template_badge(t)).collect();
                field("templates", &badges.join(" "));
            }
            None => {
                field("stem", &word_label(&store.stem(word), true));
                let badges: Vec<String> = store
                    .get_templates(word)
                    .into_iter()
                    .map(template_badge)
                    .collect();
                field("templates", &badges.join(" "));
            }
        }

        let stems: Vec<String> = store
            .find_possible_stems(word, false)
            .iter()
            .map(|s| word_label(s, store.lookup(s).is_some()))
            .collect();
        field("possible stems", &stems.join(", "));

        let mut walk = store.find_possible_stems_recursive(word);
        for (level, (from, stem)) in walk.by_ref() {
            field(
                &format!("  level {}", level),
                &format!("{} → {}", from, word_label(&stem, store.lookup(&stem).is_some())),
            );
        }
        field("distinct pairs", &walk.seen_pairs().to_string());

        let common: Vec<String> = store
            .get_most_common_stems(word, limit)
            .into_iter()
            .map(|(stem, count)| format!("{} ×{}", stem, count))
            .collect();
        field("most common", &common.join(", "));
        section_bot();
    }
    Ok(())
}

fn run_search(store: &StemmerStore<UnigramTokenizer>, word: &str, limit: usize) {
    let start = Instant::now();
    let found = store.search(word);
    let elapsed = start.elapsed();

    section_top(&format!("SEARCH {}", word));
    if found.is_empty() {
        row(" no candidates above the ratio threshold");
    }
    for m in found.iter().take(limit) {
        row(&format!(
            " {}  {}  {}",
            score_value(m.score),
            word_label(&m.word, true),
            m.word_id
        ));
    }
    section_bot();
    println!(
        "  {} of {} shown in {:.2?}",
        found.len().min(limit),
        found.len(),
        elapsed
    );
}

fn run_affix(
    store: &StemmerStore<UnigramTokenizer>,
    query: &AffixQuery,
    prefix_len: usize,
    exact: bool,
) {
    let (label, found) = if let Some(prefix) = &query.prefix {
        (format!("PREFIX {}", prefix), store.find_by_prefix(prefix))
    } else if let Some(suffix) = &query.suffix {
        let pattern = format!("{}{}", "?".repeat(prefix_len), suffix);
        (
            format!("SUFFIX {}{}", pattern, if exact { "" } else { "…" }),
            store.find_by_suffix(suffix, prefix_len, exact),
        )
    } else if let Some(word) = &query.sub_words {
        (format!("SUB-WORDS {}", word), store.find_sub_words(word))
    } else {
        return;
    };

    section_top(&label);
    for (word, id) in &found {
        row(&format!(" {}  {}", word_label(word, true), id));
    }
    section_bot();
    println!("  {} words", found.len());
}
