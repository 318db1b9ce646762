use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use miette::{miette, Context, IntoDiagnostic, Result};
use nw_erf::write::ErfWriterOptions;
use nw_erf::{Archive, ArchiveEntry, ErfVersion};
use nw_resource::restype::is_known_extension;
use nw_resource::{ResourceId, Tag};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::commands::create_file;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FileType {
    #[default]
    Erf,
    Mod,
    Hak,
    Sav,
}

impl FileType {
    fn tag(self) -> Tag {
        match self {
            FileType::Erf => Tag::from_static(b"ERF "),
            FileType::Mod => Tag::from_static(b"MOD "),
            FileType::Hak => Tag::from_static(b"HAK "),
            FileType::Sav => Tag::from_static(b"SAV "),
        }
    }
}

#[derive(Args)]
pub struct PackArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Archive type written in the header
    #[arg(long, value_enum, ignore_case = true, default_value_t = FileType::Erf)]
    file_type: FileType,

    /// Write the "E1.0" header used by the Enhanced Edition
    #[arg(long, default_value_t = false)]
    enhanced: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl PackArgs {
    pub fn handle(&self) -> Result<()> {
        info!("creating {}", &self.file.display());

        let files = WalkDir::new(&self.directory)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        let version = if self.enhanced {
            ErfVersion::E1_0
        } else {
            ErfVersion::V1_0
        };
        let mut archive = Archive::new(self.file_type.tag(), version);

        for file in files {
            let name = file.file_name().to_str().ok_or(miette!(
                "unable to convert {} to a string",
                file.path().display()
            ))?;

            let id = ResourceId::from_filename(name)
                .context(format!("naming {}", file.path().display()))?;

            if let Some(existing) = archive.get(&id) {
                return Err(miette!(
                    "{} collides with {}, resource names ignore case",
                    name,
                    existing.id
                ));
            }

            if !name
                .rsplit_once('.')
                .is_some_and(|(_, ext)| is_known_extension(ext))
            {
                warn!("{} has no known extension, storing it as {}", name, id);
            }

            let data = std::fs::read(file.path())
                .into_diagnostic()
                .context(format!("opening {}", file.path().display()))?;

            info!("packing {}", id);
            archive.add(ArchiveEntry::new(id, data));
        }

        let mut out = BufWriter::new(create_file(&self.file, self.overwrite)?);
        archive
            .write(&mut out, ErfWriterOptions::default())
            .context("finalizing archive")?;
        out.flush().into_diagnostic()?;

        Ok(())
    }
}
