use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;

use crate::commands::create_file;
use crate::commands::gff::open_document;

#[derive(Args)]
pub struct JsonArgs {
    /// An input GFF file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target JSON file, stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl JsonArgs {
    pub fn handle(&self) -> Result<()> {
        let doc = open_document(&self.file)?;
        let json = doc.to_json().context("converting to json")?;

        match &self.output {
            Some(p) => {
                info!("writing {}", p.display());
                let mut out = create_file(p, self.overwrite)?;
                out.write_all(json.as_bytes())
                    .into_diagnostic()
                    .context(format!("writing {}", p.display()))?;
            }
            None => println!("{}", json),
        }

        Ok(())
    }
}
