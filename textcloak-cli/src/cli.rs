use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use textcloak_core::{
    CanonicalizeOptions, CipherVariant, PlaintextPrompt, TextCloak,
};
use tracing::info;

use crate::corpus;
use crate::scoring::{self, ModelResponse};

#[derive(Parser)]
#[command(name = "textcloak-cli")]
#[command(about = "TextCloak CLI: corpus authoring, catalog encoding, and response scoring")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the built-in base prompt corpus as JSON
    Corpus {
        #[arg(short, long, default_value = "data/corpus.json")]
        output: PathBuf,
    },
    /// Encode a corpus into the full ten-variant cipher catalog
    Encode {
        /// Corpus JSON; defaults to the built-in prompts
        #[arg(short, long)]
        corpus: Option<PathBuf>,
        #[arg(short, long, default_value = "data/encoded_prompts.json")]
        output: PathBuf,
    },
    /// Re-derive a stored catalog against the pinned key material
    Verify {
        #[arg(short, long)]
        catalog: PathBuf,
    },
    /// Classify text or a file
    Classify {
        #[arg(short, long)]
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Canonicalize text or a file
    Canonicalize {
        #[arg(short, long)]
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Run the defensive gate over text or a file
    Guard {
        #[arg(short, long)]
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Score model responses by severity and merge two result sets
    Score {
        #[arg(short, long)]
        primary: PathBuf,
        #[arg(short, long)]
        secondary: Option<PathBuf>,
        #[arg(short, long, default_value = "results/scored_results.json")]
        output: PathBuf,
    },
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (Some(t), None) => Ok(t),
        (None, Some(f)) => {
            fs::read_to_string(&f).with_context(|| format!("reading {}", f.display()))
        }
        _ => bail!("provide exactly one of --text or --file"),
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    // serde_json emits non-ASCII codepoints raw, so invisible and
    // homoglyph characters round-trip byte-for-byte.
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn corpus_command(output: PathBuf) -> Result<()> {
    let prompts = corpus::base_prompts();
    write_json(&output, &prompts)?;
    info!(prompts = prompts.len(), "corpus written to {}", output.display());
    println!("Corpus written to {}", output.display());
    Ok(())
}

pub fn encode_command(corpus_path: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let prompts: Vec<PlaintextPrompt> = match corpus_path {
        Some(path) => read_json(&path)?,
        None => corpus::base_prompts(),
    };

    let variants = TextCloak::shared().encode_corpus(&prompts);
    write_json(&output, &variants)?;
    println!(
        "Encoded {} prompts into {} variants at {}",
        prompts.len(),
        variants.len(),
        output.display()
    );
    Ok(())
}

pub fn verify_command(catalog: PathBuf) -> Result<()> {
    let variants: Vec<CipherVariant> = read_json(&catalog)?;
    TextCloak::shared().engine().verify_catalog(&variants)?;
    println!("Catalog re-derives cleanly: {} variants", variants.len());
    Ok(())
}

pub fn classify_command(text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let input = read_input(text, file)?;
    println!("{}", TextCloak::shared().classify(&input));
    Ok(())
}

pub fn canonicalize_command(text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let input = read_input(text, file)?;
    println!(
        "{}",
        TextCloak::shared().canonicalize(Some(&input), &CanonicalizeOptions::new())
    );
    Ok(())
}

pub fn guard_command(text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let input = read_input(text, file)?;
    let decision = TextCloak::shared().guard(Some(&input));
    info!(class = %decision.class, outcome = ?decision.outcome, "gate decision");
    println!("{}", decision.response);
    Ok(())
}

pub fn score_command(
    primary: PathBuf,
    secondary: Option<PathBuf>,
    output: PathBuf,
) -> Result<()> {
    let primary_results: Vec<ModelResponse> = read_json(&primary)?;
    let secondary_results: Vec<ModelResponse> = match secondary {
        Some(path) => read_json(&path)?,
        None => Vec::new(),
    };

    let merged = scoring::merge_results(&primary_results, &secondary_results);
    write_json(&output, &merged)?;
    println!(
        "Scored {} results to {}",
        merged.len(),
        output.display()
    );
    Ok(())
}
