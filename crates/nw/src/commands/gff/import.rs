use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use nw_gff::Document;
use tracing::info;

use crate::commands::create_file;

#[derive(Args)]
pub struct ImportArgs {
    /// An input JSON file, as written by `gff json`
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target GFF file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        let text = std::fs::read_to_string(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", self.file.display()))?;
        let doc = Document::from_json(&text)
            .context(format!("reading {}", self.file.display()))?;

        info!("writing {}", self.output.display());
        let mut out = BufWriter::new(create_file(&self.output, self.overwrite)?);
        doc.write(&mut out).context("encoding GFF")?;
        out.flush().into_diagnostic()?;

        Ok(())
    }
}
