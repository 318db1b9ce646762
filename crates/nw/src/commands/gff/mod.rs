pub mod import;
pub mod info;
pub mod json;

#[derive(clap::Subcommand)]
pub enum GffCommands {
    /// Build a GFF file from its JSON export
    Import(import::ImportArgs),
    /// Show the header and fields of a GFF file
    Info(info::InfoArgs),
    /// Export a GFF file as JSON
    Json(json::JsonArgs),
}

impl GffCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            GffCommands::Import(import) => import.handle(),
            GffCommands::Info(info) => info.handle(),
            GffCommands::Json(json) => json.handle(),
        }
    }
}

/// Read and decode a GFF file from disk
pub(crate) fn open_document(path: &std::path::Path) -> miette::Result<nw_gff::Document> {
    use miette::{Context, IntoDiagnostic};

    let bytes = std::fs::read(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;
    nw_gff::decode_gff(&bytes).context(format!("reading {}", path.display()))
}
