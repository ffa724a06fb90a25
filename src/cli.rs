use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agent-judge",
    version,
    about = "Intent-aware article judge: scores news articles on 11 journalistic criteria"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding judge.toml and the result cache
    #[arg(long, global = true, default_value = ".")]
    pub config_root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score an article file, a directory of articles, or stdin (`-`)
    Analyze(AnalyzeCommand),
    /// Print the detected intent of an article
    Classify(ClassifyCommand),
    /// Print the necessity weight table
    Weights(WeightsCommand),
    /// Describe how a mode scores
    Explain(ExplainCommand),
    /// Manage cached results
    Cache(CacheCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    #[value(name = "editors_bench")]
    EditorsBench,
    #[value(name = "intent_accrual")]
    IntentAccrual,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
    Summary,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum IntentArg {
    #[value(name = "hard_news")]
    HardNews,
    Explainer,
    Opinion,
    Brief,
    Feature,
    #[value(name = "live_blog")]
    LiveBlog,
}

#[derive(Args)]
pub struct AnalyzeCommand {
    pub path: PathBuf,
    #[arg(long, value_enum, default_value = "editors_bench")]
    pub mode: ModeArg,
    /// Re-run the engine even when a cached result exists
    #[arg(long)]
    pub force: bool,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Neither read nor write the cache
    #[arg(long)]
    pub no_cache: bool,
    #[command(flatten)]
    pub overrides: MetaOverrides,
}

/// Metadata that takes precedence over what the article file carries.
#[derive(Args, Default)]
pub struct MetaOverrides {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub thumbnail: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Args)]
pub struct ClassifyCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct WeightsCommand {
    #[arg(long, value_enum)]
    pub intent: Option<IntentArg>,
    /// Print the weights as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ExplainCommand {
    #[arg(long, value_enum, default_value = "intent_accrual")]
    pub mode: ModeArg,
}

#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Remove every cached result
    Clear,
}
