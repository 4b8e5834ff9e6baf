//! Features command: CoNLL file in, one feature matrix per sentence out

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use super::super::output::log_info;
use super::super::parser::TypeArgs;
use super::super::utils::{ensure_dir, load_gazetteer, require_file};

use crate::diagnostics::LogSink;
use crate::{conll, output, FeatureConfig, FeatureSet, SentenceFeatureBuilder};

/// Compute token features for a CoNLL file
#[derive(Parser, Debug)]
pub struct FeaturesArgs {
    /// N-gram candidate table
    #[arg(long, value_name = "PATH")]
    pub candidates: PathBuf,

    /// Knowledge base with entity types
    #[arg(long, value_name = "PATH")]
    pub kb: PathBuf,

    /// CoNLL input (first column is the token)
    #[arg(long, value_name = "PATH")]
    pub conll: PathBuf,

    /// Directory for the `.softgazfeats.jsonl` output
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Divide accumulators by the number of windows
    #[arg(long)]
    pub normalize: bool,

    /// Feature families: top1, top3, top30, margin, all
    #[arg(long, value_name = "NAME", num_args = 1.., value_delimiter = ',')]
    pub feats: Vec<String>,

    /// Type configuration
    #[command(flatten)]
    pub types: TypeArgs,
}

impl FeaturesArgs {
    /// Resolved configuration: file, then flags.
    pub fn config(&self) -> Result<FeatureConfig, String> {
        let mut config = self.types.resolve()?;
        if !self.feats.is_empty() {
            config.features = FeatureSet::from_names(&self.feats).map_err(|e| e.to_string())?;
        }
        config.normalize |= self.normalize;
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

/// Run the full pipeline and write `<conll>.softgazfeats.jsonl`.
pub fn cmd_features(args: FeaturesArgs, quiet: bool) -> Result<(), String> {
    let config = args.config()?;
    require_file(&args.conll, "CoNLL")?;
    let gazetteer = load_gazetteer(&config, &args.kb, &args.candidates)?;
    let sentences = conll::read_sentences_from_path(&args.conll).map_err(|e| e.to_string())?;

    log::info!(
        "Types: {} | features: {} | normalize: {}",
        gazetteer.registry().labels().join(","),
        config.features,
        config.normalize
    );

    let start = Instant::now();
    let builder = SentenceFeatureBuilder::new(&gazetteer, config.options());
    let corpus = builder.build_corpus(&sentences, &LogSink);
    let elapsed = start.elapsed();

    ensure_dir(&args.output_dir)?;
    let path = output::output_path(&args.conll, &args.output_dir);
    output::write_to_path(&path, &corpus).map_err(|e| e.to_string())?;

    let summary = corpus.summary();
    if summary.all_zero() && summary.sentences > 0 {
        log::warn!("Every sentence has all-zero features; check that the candidate table matches the input");
    }
    log_info(
        &format!(
            "{}\nElapsed:          {:.2}ms\nOutput:           {}",
            summary,
            elapsed.as_secs_f64() * 1000.0,
            path.display()
        ),
        quiet,
    );
    Ok(())
}
