//! CLI argument parsing and structure definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{FeatureConfig, TypeAlias};

/// Soft-gazetteer features for NER
#[derive(Parser, Debug)]
#[command(name = "softgaz")]
#[command(
    author,
    version,
    about = "Soft-gazetteer features for NER",
    long_about = r#"
softgaz - knowledge-base features for named entity recognition

Every token gets a fixed-width vector built from the entity candidates of
the 1-, 2- and 3-grams around it: best-candidate weights, top-3 type counts
and weights, top-30 type counts, and weight margins.

INPUTS:
  candidates  ngram ||| Q1 | 0.9 || Q2 | 0.4
  kb          Q1 ||| name ||| LOC ||| ...
  conll       one token per line, blank line between sentences

EXAMPLES:
  softgaz features --candidates cands.txt --kb kb.txt --conll test.conll --output-dir out
  softgaz layout --ner-types LOC,PER,ORG
  softgaz lookup --candidates cands.txt --kb kb.txt "New York"
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Default log filter; `RUST_LOG` takes precedence.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute token features for a CoNLL file
    #[command(visible_alias = "f")]
    Features(crate::cli::commands::FeaturesArgs),

    /// Show the column layout of the feature vector
    Layout(crate::cli::commands::LayoutArgs),

    /// Show the typed candidates of one n-gram
    #[command(visible_alias = "l")]
    Lookup(crate::cli::commands::LookupArgs),
}

/// Output format for inspection commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable text (default)
    #[default]
    Human,
    /// JSON
    Json,
}

/// Type configuration shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct TypeArgs {
    /// TOML configuration file; flags below override it
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Comma-separated NER types, in code order
    #[arg(long, value_name = "LIST")]
    pub ner_types: Option<String>,

    /// Fold a label into another type's code (fails if TARGET is missing)
    #[arg(long, value_name = "LABEL=TARGET", conflicts_with = "no_alias")]
    pub alias: Option<TypeAlias>,

    /// Disable the default GPE=LOC alias
    #[arg(long)]
    pub no_alias: bool,
}

impl TypeArgs {
    /// Configuration file (or defaults) with the flags applied.
    pub fn resolve(&self) -> Result<FeatureConfig, String> {
        let mut config = match &self.config {
            Some(path) => FeatureConfig::from_toml_file(path).map_err(|e| e.to_string())?,
            None => FeatureConfig::default(),
        };
        if let Some(csv) = &self.ner_types {
            config = config.with_ner_types_csv(csv);
        }
        if let Some(alias) = &self.alias {
            config.alias = Some(alias.clone());
        }
        if self.no_alias {
            config.alias = None;
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_features_command() {
        let cli = Cli::try_parse_from([
            "softgaz",
            "features",
            "--candidates",
            "c.txt",
            "--kb",
            "kb.txt",
            "--conll",
            "t.conll",
            "--output-dir",
            "out",
            "--feats",
            "top1,margin",
            "--alias",
            "FAC=ORG",
            "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.log_level(), "warn");
        let Commands::Features(args) = cli.command else {
            panic!("expected features command");
        };
        assert_eq!(args.feats, ["top1", "margin"]);
        assert_eq!(args.types.alias, Some(TypeAlias::new("FAC", "ORG")));
    }

    #[test]
    fn rejects_malformed_alias() {
        assert!(Cli::try_parse_from(["softgaz", "layout", "--alias", "GPE"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["softgaz", "layout", "-q", "-v"]).is_err());
    }

    #[test]
    fn type_args_override_defaults() {
        let args = TypeArgs {
            ner_types: Some("PER,LOC".into()),
            no_alias: true,
            ..TypeArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.ner_types, ["PER", "LOC"]);
        assert_eq!(config.alias, None);
    }

    #[test]
    fn required_alias_without_target_fails() {
        let args = TypeArgs {
            ner_types: Some("PER,ORG".into()),
            alias: Some(TypeAlias::new("GPE", "LOC")),
            ..TypeArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
