mod analyze;
mod article;
mod cache;
mod cli;
mod config;
mod error;
mod extract;
mod report;
mod service;
mod types;

use crate::analyze::necessity::{necessity_map, NECESSITY_MATRIX_VERSION};
use crate::article::Article;
use crate::error::JudgeError;
use crate::types::config::JudgeConfig;
use crate::types::scoring::{Intent, Mode};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn mode_from(arg: cli::ModeArg) -> Mode {
    match arg {
        cli::ModeArg::EditorsBench => Mode::EditorsBench,
        cli::ModeArg::IntentAccrual => Mode::IntentAccrual,
    }
}

fn intent_from(arg: cli::IntentArg) -> Intent {
    match arg {
        cli::IntentArg::HardNews => Intent::HardNews,
        cli::IntentArg::Explainer => Intent::Explainer,
        cli::IntentArg::Opinion => Intent::Opinion,
        cli::IntentArg::Brief => Intent::Brief,
        cli::IntentArg::Feature => Intent::Feature,
        cli::IntentArg::LiveBlog => Intent::LiveBlog,
    }
}

fn load_input(path: &Path) -> Result<Article, JudgeError> {
    if path.as_os_str() == "-" {
        article::read_article(std::io::stdin().lock())
    } else {
        article::load_article(path)
    }
}

fn apply_overrides(article: &mut Article, overrides: &cli::MetaOverrides) {
    for (slot, value) in [
        (&mut article.title, &overrides.title),
        (&mut article.author, &overrides.author),
        (&mut article.thumbnail, &overrides.thumbnail),
        (&mut article.url, &overrides.url),
    ] {
        if value.is_some() {
            slot.clone_from(value);
        }
    }
}

fn run() -> Result<i32, JudgeError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let loaded = config::load_config(&cli.config_root)?;
    if loaded.is_none() {
        warn!(
            root = %cli.config_root.display(),
            "no {} found; using defaults",
            config::DEFAULT_CONFIG_FILE
        );
    }
    let settings = loaded
        .as_ref()
        .map(JudgeConfig::engine_settings)
        .unwrap_or_default();

    match cli.command {
        cli::Commands::Analyze(cmd) => {
            let analyzer =
                service::Analyzer::from_config(loaded.as_ref(), &cli.config_root, !cmd.no_cache);
            let mode = mode_from(cmd.mode);
            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
                cli::ReportFormat::Summary => report::OutputFormat::Summary,
            };

            let mut unavailable = 0;
            let rendered = if cmd.path.is_dir() {
                let mut responses = Vec::new();
                for path in article::discover_articles(&cmd.path) {
                    let mut article = match article::load_article(&path) {
                        Ok(article) => article,
                        Err(JudgeError::ArticleUnavailable(reason)) => {
                            warn!(path = %path.display(), %reason, "skipping article");
                            unavailable += 1;
                            continue;
                        }
                        Err(err) => return Err(err),
                    };
                    apply_overrides(&mut article, &cmd.overrides);
                    responses.push(analyzer.analyze(&article, mode, cmd.force)?);
                }
                if responses.is_empty() {
                    return Err(JudgeError::ArticleUnavailable(format!(
                        "no readable articles under {}",
                        cmd.path.display()
                    )));
                }
                info!(
                    analyzed = responses.len(),
                    skipped = unavailable,
                    "batch complete"
                );
                report::render_batch(&responses, output_format)?
            } else {
                let mut article = load_input(&cmd.path)?;
                apply_overrides(&mut article, &cmd.overrides);
                let response = analyzer.analyze(&article, mode, cmd.force)?;
                report::render(&response, output_format)?
            };

            match &cmd.output {
                Some(path) => {
                    std::fs::write(path, format!("{rendered}\n"))?;
                    info!(path = %path.display(), "report written");
                }
                None => println!("{rendered}"),
            }

            if unavailable > 0 {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Classify(cmd) => {
            let mut article = load_input(&cmd.path)?;
            if cmd.title.is_some() {
                article.title = cmd.title;
            }
            let doc = extract::text::Document::parse(&article.text);
            let intent = analyze::intent::classify(&article, &doc, settings.default_intent);
            println!("{intent}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Weights(cmd) => {
            let intents = match cmd.intent {
                Some(intent) => vec![intent_from(intent)],
                None => Intent::ALL.to_vec(),
            };
            let rows = intents
                .into_iter()
                .map(|intent| Ok((intent, necessity_map(intent, &settings.overrides)?)))
                .collect::<Result<Vec<_>, JudgeError>>()?;

            if cmd.json {
                let weights = rows
                    .iter()
                    .map(|(intent, map)| Ok((intent.as_str().to_string(), serde_json::to_value(map)?)))
                    .collect::<Result<serde_json::Map<_, _>, JudgeError>>()?;
                let payload = serde_json::json!({
                    "version": NECESSITY_MATRIX_VERSION,
                    "weights": weights,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("necessity matrix {NECESSITY_MATRIX_VERSION}\n");
                print!("{}", report::md::necessity_table(&rows));
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Explain(cmd) => {
            print!("{}", report::md::explain(mode_from(cmd.mode), &settings.params));
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Cache(cmd) => match cmd.action {
            cli::CacheAction::Clear => {
                let dir = loaded
                    .clone()
                    .unwrap_or_default()
                    .cache_dir(&cli.config_root);
                let removed = cache::AnalysisCache::new(dir).clear()?;
                println!("removed {removed} cached result(s)");
                Ok(exit_code::SUCCESS)
            }
        },
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
