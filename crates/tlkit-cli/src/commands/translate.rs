use super::OutputFormat;
use color_eyre::eyre::eyre;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tlkit_config::TranslateCfg;
use tlkit_services::{TranslateOptions, TranslateSummary};
use tlkit_translate::{
    build_translator, GoogleOptions, Language, LanguageTable, Throttle, TranslateProvider,
};

pub struct TranslateArgs {
    pub lang: Option<String>,
    pub list: bool,
    pub source: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub source_lang: Option<String>,
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub delay_ms: Option<u64>,
    pub language_delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
}

const DEFAULT_SOURCE: &str = "assets/translations/en.json";

fn language_table(cfg: &TranslateCfg) -> LanguageTable {
    match &cfg.languages {
        Some(list) if !list.is_empty() => {
            LanguageTable::new(list.iter().map(|l| Language::new(&l.code, &l.name)).collect())
        }
        _ => LanguageTable::default(),
    }
}

fn resolve_options(args: &TranslateArgs, cfg: &TranslateCfg) -> TranslateOptions {
    let source_file = args
        .source
        .clone()
        .or_else(|| cfg.source_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));
    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| cfg.out_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| parent_dir(&source_file));
    let defaults = Throttle::default();
    let throttle = Throttle {
        between_strings: args
            .delay_ms
            .or(cfg.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.between_strings),
        between_languages: args
            .language_delay_ms
            .or(cfg.language_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.between_languages),
    };
    TranslateOptions {
        source_file,
        out_dir,
        source_lang: args
            .source_lang
            .clone()
            .or_else(|| cfg.source_lang.clone())
            .unwrap_or_else(|| "en".to_string()),
        throttle,
    }
}

fn parent_dir(p: &Path) -> PathBuf {
    match p.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn google_options(args: &TranslateArgs, cfg: &TranslateCfg) -> GoogleOptions {
    let defaults = GoogleOptions::default();
    GoogleOptions {
        endpoint: args
            .endpoint
            .clone()
            .or_else(|| cfg.endpoint.clone())
            .unwrap_or(defaults.endpoint),
        timeout_ms: args.timeout_ms.or(cfg.timeout_ms).unwrap_or(defaults.timeout_ms),
        retries: args.retries.or(cfg.retries).unwrap_or(defaults.retries),
        retry_delay_ms: defaults.retry_delay_ms,
        cache_size: cfg.cache_size.unwrap_or(defaults.cache_size),
    }
}

pub fn run_translate(args: TranslateArgs, format: &str, use_color: bool) -> color_eyre::Result<()> {
    let format = OutputFormat::parse(format)?;
    let cfg = tlkit_config::load_config().translate.unwrap_or_default();
    let table = language_table(&cfg);

    if args.list {
        for lang in table.iter() {
            crate::ui_out!("{}: {}", lang.code, lang.name);
        }
        return Ok(());
    }

    let opts = resolve_options(&args, &cfg);
    let provider: TranslateProvider = args
        .provider
        .as_deref()
        .or(cfg.provider.as_deref())
        .unwrap_or("google")
        .parse()
        .map_err(|e: String| eyre!(e))?;
    tracing::debug!(
        event = "translate_args",
        lang = ?args.lang,
        source = %opts.source_file.display(),
        out_dir = %opts.out_dir.display(),
        provider = ?provider
    );

    let mut translator = build_translator(provider, google_options(&args, &cfg))?;
    let summary = match args.lang.as_deref() {
        Some(code) => tlkit_services::translate_one(&opts, &table, code, translator.as_mut())?,
        None => tlkit_services::translate_all(&opts, &table, translator.as_mut())?,
    };

    if format == OutputFormat::Json {
        serde_json::to_writer(std::io::stdout().lock(), &summary)?;
        println!();
        return Ok(());
    }
    print_text(&summary, use_color);
    Ok(())
}

fn print_text(summary: &TranslateSummary, use_color: bool) {
    use owo_colors::OwoColorize;
    for report in &summary.languages {
        match (&report.output, &report.error) {
            (Some(path), None) => {
                let code = if use_color {
                    report.code.green().to_string()
                } else {
                    report.code.clone()
                };
                crate::ui_ok!(
                    "{} ({}): {} strings, {} kept untranslated -> {}",
                    code,
                    report.name,
                    report.strings,
                    report.failed,
                    path
                );
            }
            (_, Some(err)) => {
                let code = if use_color {
                    report.code.red().to_string()
                } else {
                    report.code.clone()
                };
                crate::ui_err!("{} ({}): {}", code, report.name, err);
            }
            (None, None) => {}
        }
    }
    let ok = summary.languages.iter().filter(|r| r.error.is_none()).count();
    crate::ui_out!(
        "Translated {} of {} languages ({} keys)",
        ok,
        summary.languages.len(),
        summary.keys
    );
}
