pub mod erf;
pub mod gff;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle ERF, MOD, HAK and SAV archives
    Erf {
        #[command(subcommand)]
        command: erf::ErfCommands,
    },
    /// Handle GFF files
    Gff {
        #[command(subcommand)]
        command: gff::GffCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Erf { command } => command.handle(),
            Commands::Gff { command } => command.handle(),
        }
    }
}

/// Create `path`, refusing to replace an existing file unless `overwrite` is set
pub(crate) fn create_file(
    path: &std::path::Path,
    overwrite: bool,
) -> miette::Result<std::fs::File> {
    use miette::{Context, IntoDiagnostic};

    let file = if overwrite {
        std::fs::File::create(path)
    } else {
        std::fs::File::create_new(path)
    };
    file.into_diagnostic()
        .context(format!("creating {}", path.display()))
}
