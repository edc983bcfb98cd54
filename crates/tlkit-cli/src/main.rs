use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod commands;
mod ui;

/// Exit status for requests the tool refuses to act on (e.g. an unknown language code).
const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "tlkit",
    version,
    about = "Localization toolkit: wrap UI literals for lookup, propagate translations"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log warnings and errors to the console
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Wrap text literals in the lookup call, drop stale const qualifiers, add the import
    Apply {
        /// Source tree to walk (default: lib)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// File defining the lookup function; never rewritten itself
        #[arg(long)]
        lookup_module: Option<PathBuf>,
        /// Name of the lookup function
        #[arg(long)]
        lookup_fn: Option<String>,
        /// Source file extension
        #[arg(long)]
        extension: Option<String>,
        /// Report what would change without writing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Keep `<file>.bak` copies of rewritten files
        #[arg(long, default_value_t = false)]
        backup: bool,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Translate the canonical mapping into one or all recognized languages
    Translate {
        /// Target language code; all recognized languages when omitted
        lang: Option<String>,
        /// Print recognized language codes and exit
        #[arg(short, long, default_value_t = false)]
        list: bool,
        /// Canonical mapping (default: assets/translations/en.json)
        #[arg(long)]
        source: Option<PathBuf>,
        /// Output directory (default: directory of the canonical mapping)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        source_lang: Option<String>,
        /// Translation provider: google or dummy
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
        /// Pause between strings, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Pause between languages, in milliseconds
        #[arg(long)]
        language_delay_ms: Option<u64>,
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long)]
        retries: Option<u32>,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Dump JSON Schemas of the summaries printed with `--format json`
    Schema {
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Apply { .. } => "apply",
            Commands::Translate { .. } => "translate",
            Commands::Schema { .. } => "schema",
        }
    }

    fn run(self, use_color: bool) -> Result<()> {
        match self {
            Commands::Apply {
                root,
                lookup_module,
                lookup_fn,
                extension,
                dry_run,
                backup,
                format,
            } => commands::apply::run_apply(
                commands::apply::ApplyArgs {
                    root,
                    lookup_module,
                    lookup_fn,
                    extension,
                    dry_run,
                    backup,
                },
                &format,
                use_color,
            ),
            Commands::Translate {
                lang,
                list,
                source,
                out_dir,
                source_lang,
                provider,
                endpoint,
                delay_ms,
                language_delay_ms,
                timeout_ms,
                retries,
                format,
            } => commands::translate::run_translate(
                commands::translate::TranslateArgs {
                    lang,
                    list,
                    source,
                    out_dir,
                    source_lang,
                    provider,
                    endpoint,
                    delay_ms,
                    language_delay_ms,
                    timeout_ms,
                    retries,
                },
                &format,
                use_color,
            ),
            Commands::Schema { out_dir } => commands::schema::run_schema(out_dir),
        }
    }
}

fn init_tracing(quiet: bool) -> WorkerGuard {
    let file_appender = rolling::daily("logs", "tlkit.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _guard = init_tracing(cli.quiet);

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let name = cli.cmd.name();
    tracing::debug!(event = "command_start", command = name);
    match cli.cmd.run(use_color) {
        Ok(()) => {
            tracing::debug!(event = "command_done", command = name);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => match err.downcast_ref::<tlkit_core::TlkitError>() {
            Some(tlkit_core::TlkitError::UnsupportedLanguage { code, supported }) => {
                crate::ui_err!("unsupported language: {code}");
                crate::ui_info!("supported: {}", supported.join(", "));
                Ok(ExitCode::from(EXIT_USAGE))
            }
            _ => {
                tracing::error!(event = "command_failed", command = name, error = %err);
                Err(err)
            }
        },
    }
}
