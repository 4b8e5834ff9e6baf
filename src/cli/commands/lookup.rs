//! Lookup command: the typed candidates of one n-gram

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use super::super::output::{table_row, write_output};
use super::super::parser::{OutputFormat, TypeArgs};
use super::super::utils::load_gazetteer;

use crate::Gazetteer;

/// Show the typed candidates of one n-gram
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// N-gram candidate table
    #[arg(long, value_name = "PATH")]
    pub candidates: PathBuf,

    /// Knowledge base with entity types
    #[arg(long, value_name = "PATH")]
    pub kb: PathBuf,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Type configuration
    #[command(flatten)]
    pub types: TypeArgs,

    /// N-gram to look up (words are joined with single spaces)
    #[arg(required = true, num_args = 1..)]
    pub ngram: Vec<String>,
}

/// A candidate with its resolved type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedCandidate {
    /// Rank, starting at 1.
    pub rank: usize,
    /// Entity identifier.
    pub entity_id: String,
    /// Candidate weight.
    pub weight: f64,
    /// Type label, or `None` if the knowledge base does not type the entity.
    #[serde(rename = "type")]
    pub type_label: Option<String>,
}

/// Candidates of `ngram` in rank order; empty if the n-gram is unknown.
pub fn typed_candidates(gazetteer: &Gazetteer, ngram: &str) -> Vec<TypedCandidate> {
    let Some(list) = gazetteer.lookup(ngram) else {
        return Vec::new();
    };
    list.iter()
        .enumerate()
        .map(|(i, candidate)| TypedCandidate {
            rank: i + 1,
            entity_id: candidate.entity_id.clone(),
            weight: candidate.weight,
            type_label: gazetteer
                .type_of(candidate)
                .and_then(|code| gazetteer.registry().label(code))
                .map(str::to_string),
        })
        .collect()
}

fn render(ngram: &str, typed: &[TypedCandidate], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            let doc = serde_json::json!({ "ngram": ngram, "candidates": typed });
            serde_json::to_string_pretty(&doc)
                .map(|s| s + "\n")
                .map_err(|e| format!("Failed to serialize candidates: {}", e))
        }
        OutputFormat::Human if typed.is_empty() => Ok(format!("No candidates for '{}'.\n", ngram)),
        OutputFormat::Human => {
            let widths = [4, 16, 8];
            let mut out = format!("{} candidates for '{}':\n\n", typed.len(), ngram);
            out.push_str(&table_row(&["rank", "entity", "weight", "type"], &widths));
            for c in typed {
                out.push_str(&table_row(
                    &[
                        &c.rank.to_string(),
                        &c.entity_id,
                        &format!("{:.4}", c.weight),
                        c.type_label.as_deref().unwrap_or("-"),
                    ],
                    &widths,
                ));
            }
            Ok(out)
        }
    }
}

/// Print the candidates of the joined n-gram.
pub fn cmd_lookup(args: LookupArgs) -> Result<(), String> {
    let config = args.types.resolve()?;
    let gazetteer = load_gazetteer(&config, &args.kb, &args.candidates)?;
    let ngram = args.ngram.join(" ");
    let typed = typed_candidates(&gazetteer, &ngram);
    write_output(&render(&ngram, &typed, args.format)?)
}
