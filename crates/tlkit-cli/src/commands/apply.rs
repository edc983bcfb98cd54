use super::OutputFormat;
use std::path::PathBuf;
use tlkit_rewrite::RewriteRules;
use tlkit_services::ApplyOptions;

pub struct ApplyArgs {
    pub root: Option<PathBuf>,
    pub lookup_module: Option<PathBuf>,
    pub lookup_fn: Option<String>,
    pub extension: Option<String>,
    pub dry_run: bool,
    pub backup: bool,
}

/// Flags win over `[rewrite]` in tlkit.toml, which wins over built-in defaults.
fn resolve(
    args: ApplyArgs,
    cfg: tlkit_config::RewriteCfg,
) -> (PathBuf, RewriteRules, ApplyOptions) {
    let defaults = RewriteRules::default();
    let root = args
        .root
        .or_else(|| cfg.root.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("lib"));
    let rules = RewriteRules {
        lookup_fn: args.lookup_fn.or(cfg.lookup_fn).unwrap_or(defaults.lookup_fn),
        lookup_module: args
            .lookup_module
            .or_else(|| cfg.lookup_module.map(PathBuf::from))
            .unwrap_or(defaults.lookup_module),
        const_keyword: cfg.const_keyword.unwrap_or(defaults.const_keyword),
        text_calls: cfg.text_calls.unwrap_or(defaults.text_calls),
        const_parents: cfg.const_parents.unwrap_or(defaults.const_parents),
        extension: args.extension.or(cfg.extension).unwrap_or(defaults.extension),
    };
    let opts = ApplyOptions {
        dry_run: args.dry_run,
        backup: args.backup || cfg.backup.unwrap_or(false),
    };
    (root, rules, opts)
}

pub fn run_apply(args: ApplyArgs, format: &str, use_color: bool) -> color_eyre::Result<()> {
    let format = OutputFormat::parse(format)?;
    let cfg = tlkit_config::load_config().rewrite.unwrap_or_default();
    let (root, rules, opts) = resolve(args, cfg);
    tracing::debug!(
        event = "apply_args",
        root = %root.display(),
        lookup_module = %rules.lookup_module.display(),
        lookup_fn = %rules.lookup_fn,
        dry_run = opts.dry_run,
        backup = opts.backup
    );

    if !root.is_dir() {
        color_eyre::eyre::bail!("source root {} is not a directory", root.display());
    }

    let summary = tlkit_services::apply_tree(&root, &rules, &opts)?;

    if format == OutputFormat::Json {
        serde_json::to_writer(std::io::stdout().lock(), &summary)?;
        println!();
        return Ok(());
    }

    for f in &summary.failures {
        crate::ui_warn!("skipped {}: {}", f.path, f.error);
    }
    let verb = if summary.dry_run { "Would update" } else { "Updated" };
    if use_color {
        use owo_colors::OwoColorize;
        crate::ui_out!("{} {} files:", verb, summary.changed.len().green());
        for path in &summary.changed {
            crate::ui_out!("  {}", path.blue());
        }
    } else {
        crate::ui_out!("{} {} files:", verb, summary.changed.len());
        for path in &summary.changed {
            crate::ui_out!("  {}", path);
        }
    }
    Ok(())
}
