//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use seopress_core::{EnrichmentProgress, SeoEnricher, TaskKind, TaskOutcome};
use seopress_provider::ProviderChain;
use seopress_shared::{
    AppConfig, ContentRecord, SeoConfig, init_config, load_config, validate_base_url,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// seopress: generated SEO metadata for static-site content.
#[derive(Parser)]
#[command(
    name = "seopress",
    version,
    about = "Enrich content records with generated SEO metadata.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Enrich one content record.
    Enrich {
        /// Path to the normalized content record (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the enriched record (defaults to stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Site base URL for canonical links.
        #[arg(long, env = "WEBSITE_URL")]
        base_url: Option<String>,

        /// Generate a competitive analysis (`--competitive-analysis=false`
        /// turns it off when the config file enables it).
        #[arg(
            long,
            env = "ENABLE_COMPETITIVE_ANALYSIS",
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = "true",
            value_parser = clap::builder::BoolishValueParser::new(),
        )]
        competitive_analysis: Option<bool>,

        /// Per-call generation budget in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// carries only the enriched record.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "seopress=info",
        1 => "seopress=debug",
        _ => "seopress=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Enrich {
            input,
            output,
            base_url,
            competitive_analysis,
            timeout_secs,
        } => {
            let overrides = EnrichOverrides {
                base_url,
                competitive_analysis,
                timeout_secs,
            };
            cmd_enrich(&input, output.as_deref(), overrides).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Command-line values layered over the config file.
#[derive(Debug, Default)]
struct EnrichOverrides {
    base_url: Option<String>,
    competitive_analysis: Option<bool>,
    timeout_secs: Option<u64>,
}

fn resolve_seo_config(config: &AppConfig, overrides: &EnrichOverrides) -> Result<SeoConfig> {
    let mut seo = SeoConfig::from(config);

    if let Some(base_url) = overrides.base_url.as_deref() {
        validate_base_url(base_url)?;
        seo = seo.with_base_url(base_url);
    }
    if let Some(enabled) = overrides.competitive_analysis {
        seo = seo.with_competitive_analysis(enabled);
    }
    if let Some(secs) = overrides.timeout_secs {
        seo = seo.with_task_timeout(Duration::from_secs(secs.max(1)));
    }

    Ok(seo)
}

async fn cmd_enrich(input: &Path, output: Option<&Path>, overrides: EnrichOverrides) -> Result<()> {
    let config = load_config()?;
    let seo_config = resolve_seo_config(&config, &overrides)?;
    let providers = ProviderChain::from_config(&config, seo_config.task_timeout)?;

    let raw = tokio::fs::read_to_string(input)
        .await
        .wrap_err_with(|| format!("failed to read {}", input.display()))?;
    let record: ContentRecord = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("{} is not a valid content record", input.display()))?;
    record.validate()?;

    info!(
        title = %record.title,
        content_type = %record.content_type,
        providers = ?providers.provider_names(),
        competitive_analysis = seo_config.competitive_analysis,
        "enriching record"
    );

    let started = Instant::now();
    let enricher = SeoEnricher::new(Arc::new(providers), seo_config);
    let progress = CliProgress::new()?;
    let enriched = enricher.enrich_with_progress(&record, &progress).await;
    progress.finish();

    let json = serde_json::to_string_pretty(&enriched)?;
    match output {
        Some(path) => tokio::fs::write(path, format!("{json}\n"))
            .await
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    let status = if enriched.is_enriched() {
        "enriched"
    } else {
        "left unenriched"
    };
    eprintln!(
        "{status} \"{}\": {} generated, {} fell back, {:.1}s",
        record.title,
        progress.generated(),
        progress.fell_back(),
        started.elapsed().as_secs_f64()
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Enrichment progress on an indicatif spinner, with per-outcome counts.
struct CliProgress {
    spinner: ProgressBar,
    generated: AtomicUsize,
    fell_back: AtomicUsize,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Ok(Self {
            spinner,
            generated: AtomicUsize::new(0),
            fell_back: AtomicUsize::new(0),
        })
    }

    fn generated(&self) -> usize {
        self.generated.load(Ordering::Relaxed)
    }

    fn fell_back(&self) -> usize {
        self.fell_back.load(Ordering::Relaxed)
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl EnrichmentProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn task_finished(&self, kind: TaskKind, outcome: TaskOutcome) {
        let label = match outcome {
            TaskOutcome::Generated => {
                self.generated.fetch_add(1, Ordering::Relaxed);
                "done"
            }
            TaskOutcome::FellBack => {
                self.fell_back.fetch_add(1, Ordering::Relaxed);
                "fallback"
            }
        };
        self.spinner
            .set_message(format!("{} [{label}]", kind.as_str()));
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
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
    fn enrich_parses_flags() {
        let cli = Cli::try_parse_from([
            "seopress",
            "enrich",
            "--input",
            "record.json",
            "--output",
            "out.json",
            "--base-url",
            "https://example.edu",
            "--competitive-analysis",
            "--timeout-secs",
            "10",
        ])
        .expect("parse");

        match cli.command {
            Command::Enrich {
                input,
                output,
                base_url,
                competitive_analysis,
                timeout_secs,
            } => {
                assert_eq!(input, PathBuf::from("record.json"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert_eq!(base_url.as_deref(), Some("https://example.edu"));
                assert_eq!(competitive_analysis, Some(true));
                assert_eq!(timeout_secs, Some(10));
            }
            Command::Config { .. } => panic!("expected enrich"),
        }
    }

    #[test]
    fn overrides_layer_over_config() {
        let config = AppConfig::default();
        let overrides = EnrichOverrides {
            base_url: Some("https://example.edu/".into()),
            competitive_analysis: Some(true),
            timeout_secs: Some(5),
        };
        let seo = resolve_seo_config(&config, &overrides).expect("resolve");
        assert_eq!(seo.base_url, "https://example.edu");
        assert!(seo.competitive_analysis);
        assert_eq!(seo.task_timeout, Duration::from_secs(5));
    }

    #[test]
    fn no_overrides_keeps_config_values() {
        let config = AppConfig::default();
        let seo = resolve_seo_config(&config, &EnrichOverrides::default()).expect("resolve");
        assert_eq!(seo.base_url, SeoConfig::from(&config).base_url);
        assert!(!seo.competitive_analysis);
        assert_eq!(seo.task_timeout, Duration::from_secs(30));
    }

    fn parse_competitive_flag(args: &[&str]) -> Option<bool> {
        let argv = ["seopress", "enrich", "--input", "record.json"]
            .into_iter()
            .chain(args.iter().copied());
        match Cli::try_parse_from(argv).expect("parse").command {
            Command::Enrich {
                competitive_analysis,
                ..
            } => competitive_analysis,
            Command::Config { .. } => panic!("expected enrich"),
        }
    }

    #[test]
    fn competitive_flag_accepts_explicit_values() {
        assert_eq!(parse_competitive_flag(&["--competitive-analysis"]), Some(true));
        assert_eq!(
            parse_competitive_flag(&["--competitive-analysis=false"]),
            Some(false)
        );
        assert_eq!(
            parse_competitive_flag(&["--competitive-analysis=true"]),
            Some(true)
        );
    }

    #[test]
    fn competitive_flag_can_disable_config_setting() {
        let mut config = AppConfig::default();
        config.features.competitive_analysis = true;

        let keep = resolve_seo_config(&config, &EnrichOverrides::default()).expect("resolve");
        assert!(keep.competitive_analysis);

        let overrides = EnrichOverrides {
            competitive_analysis: Some(false),
            ..Default::default()
        };
        let off = resolve_seo_config(&config, &overrides).expect("resolve");
        assert!(!off.competitive_analysis);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let overrides = EnrichOverrides {
            base_url: Some("not a url".into()),
            ..Default::default()
        };
        assert!(resolve_seo_config(&AppConfig::default(), &overrides).is_err());
    }
}
