use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;

use crate::commands::erf::open_archive;

#[derive(Args)]
pub struct InfoArgs {
    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let archive = open_archive(&self.file)?;

        println!("{}", self.file.display().bold());
        println!("  type:        {}", archive.file_type);
        println!("  version:     {}", archive.version);
        if let Some(date) = archive.build_date {
            println!("  built:       {} day {}", date.year(), date.day_of_year);
        }
        if archive.description_str_ref != u32::MAX {
            println!("  str_ref:     {}", archive.description_str_ref);
        }
        for (language, text) in &archive.localized_description {
            println!("  description: [{}] {}", language, text);
        }
        println!("  entries:     {}", archive.len());

        let rows = archive
            .iter()
            .sorted_by(|a, b| a.id.cmp(&b.id))
            .map(|entry| {
                format!(
                    "  {:<24} {:>5} {:>10}",
                    entry.id.filename(),
                    entry.id.res_type.dimmed(),
                    entry.size()
                )
            })
            .join("\n");

        if !rows.is_empty() {
            println!("{}", rows);
        }

        Ok(())
    }
}
