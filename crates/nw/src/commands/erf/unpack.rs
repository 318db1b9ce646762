use std::io::Write;
use std::path::{Component, Path, PathBuf};

use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::info;

use crate::commands::create_file;
use crate::commands::erf::open_archive;

#[derive(Args)]
pub struct UnpackArgs {
    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Where a resource named `name` lands inside `directory`, refusing names that would leave it
fn entry_path(directory: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file)), None) => Ok(directory.join(file)),
        _ => Err(miette!("{:?} is not a plain file name", name)),
    }
}

impl UnpackArgs {
    pub fn handle(&self) -> Result<()> {
        let archive = open_archive(&self.file)?;

        std::fs::create_dir_all(&self.directory)
            .into_diagnostic()
            .context(format!("creating {}", &self.directory.display()))?;

        for entry in archive.iter() {
            let p = entry_path(&self.directory, &entry.id.filename())?;
            info!("writing {}", p.display());

            let mut out = create_file(&p, self.overwrite)?;
            out.write_all(&entry.data)
                .into_diagnostic()
                .context(format!("writing {}", &p.display()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use nw_resource::ResourceId;
    use pretty_assertions::assert_eq;

    use super::entry_path;

    #[test]
    fn entries_stay_inside_the_directory() {
        let id = ResourceId::new("module", 2014).unwrap();
        let path = entry_path(Path::new("out"), &id.filename()).unwrap();
        assert_eq!(path, Path::new("out").join("module.ifo"));
    }

    #[test]
    fn dot_names_are_plain_files() {
        let id = ResourceId::new("..", 2014).unwrap();
        let path = entry_path(Path::new("out"), &id.filename()).unwrap();
        assert_eq!(path, Path::new("out").join("...ifo"));
    }

    #[test]
    fn escaping_names_are_refused() {
        for name in ["../escaped.uti", "/etc/passwd", "a/b.uti", "..", ""] {
            assert!(entry_path(Path::new("out"), name).is_err(), "{name:?} was accepted");
        }
    }
}
