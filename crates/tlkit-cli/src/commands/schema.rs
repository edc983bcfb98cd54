use std::fs;
use std::path::PathBuf;

const DEFAULT_SCHEMA_DIR: &str = "./docs/assets/schemas";

pub fn run_schema(out_dir: Option<PathBuf>) -> color_eyre::Result<()> {
    let out_dir = match out_dir {
        Some(dir) => dir,
        None => PathBuf::from(
            tlkit_config::load_config()
                .schema
                .and_then(|s| s.out_dir)
                .unwrap_or_else(|| DEFAULT_SCHEMA_DIR.to_string()),
        ),
    };
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
            tracing::debug!(event = "schema_written", path = %path.display());
        }};
    }
    dump!(tlkit_domain::RewriteSummary, "rewrite_summary.schema.json");
    dump!(tlkit_domain::TranslateSummary, "translate_summary.schema.json");
    crate::ui_ok!("schemas written to {}", out_dir.display());
    Ok(())
}
