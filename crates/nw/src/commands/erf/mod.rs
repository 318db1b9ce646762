pub mod diff;
pub mod info;
pub mod pack;
pub mod unpack;

#[derive(clap::Subcommand)]
pub enum ErfCommands {
    /// Compare two archives
    Diff(diff::DiffArgs),
    /// Show the header and entries of an archive
    Info(info::InfoArgs),
    /// Pack a directory into an archive
    Pack(pack::PackArgs),
    /// Extract an archive into a directory
    Unpack(unpack::UnpackArgs),
}

impl ErfCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ErfCommands::Diff(diff) => diff.handle(),
            ErfCommands::Info(info) => info.handle(),
            ErfCommands::Pack(pack) => pack.handle(),
            ErfCommands::Unpack(unpack) => unpack.handle(),
        }
    }
}

/// Read a whole archive from disk
pub(crate) fn open_archive(path: &std::path::Path) -> miette::Result<nw_erf::Archive> {
    use miette::{Context, IntoDiagnostic};

    let f = std::fs::File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;
    nw_erf::Archive::read(std::io::BufReader::new(f))
        .context(format!("reading {}", path.display()))
}
