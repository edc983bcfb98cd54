pub mod apply;
pub mod schema;
pub mod translate;

use color_eyre::eyre::{bail, Result};

/// Output formats accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unsupported --format {other} (expected text|json)"),
        }
    }
}
