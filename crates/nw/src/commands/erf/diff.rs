use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::Result;
use nw_erf::Archive;
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};

use crate::commands::erf::open_archive;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Report which entries changed
    #[default]
    Semantic,
    /// Also show line diffs of GFF and text entries
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String),
    Removed(String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, Vec<Change>),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(v) => writeln!(f, "✅ {}", v.green()),
            Change::Removed(v) => writeln!(f, "❌ {}", v.red()),
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(lines) => {
                writeln!(f, "{}", lines.iter().map(|l| format!(" {}", l)).join("\n"))
            }
            Change::Modified(v, related) => {
                writeln!(f, "🔃 {}", v.blue())?;
                let body = related.iter().map(|c| c.to_string()).join("");
                writeln!(
                    f,
                    "{}",
                    body.split('\n')
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| format!("  {}", l))
                        .join("\n")
                )
            }
        }
    }
}

/// Text form of a payload worth diffing line by line
fn as_text(data: &[u8]) -> Option<String> {
    if let Ok(doc) = nw_gff::decode_gff(data) {
        return doc.to_json().ok();
    }
    std::str::from_utf8(data).ok().map(str::to_owned)
}

fn inline_diff(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);
    let mut lines = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            if change.tag() == ChangeTag::Equal {
                continue;
            }

            let mut line = String::new();
            for (emphasized, value) in change.iter_strings_lossy() {
                let value = value.trim_end_matches('\n');
                match (emphasized, change.tag()) {
                    (true, ChangeTag::Insert) => {
                        line.push_str(&format!("{}", value.green().underline()))
                    }
                    (true, _) => line.push_str(&format!("{}", value.red().underline())),
                    (false, ChangeTag::Insert) => line.push_str(&format!("{}", value.green())),
                    (false, _) => line.push_str(&format!("{}", value.red())),
                }
            }
            lines.push(line);
        }
    }

    lines
}

#[derive(Args)]
pub struct DiffArgs {
    /// The old archive
    #[arg(value_name = "OLD")]
    left: PathBuf,

    /// The new archive
    #[arg(value_name = "NEW")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,
}

impl DiffArgs {
    fn header_changes(&self, left: &Archive, right: &Archive) -> Vec<Change> {
        let mut result = Vec::new();

        if left.file_type != right.file_type {
            result.push(Change::Comparison(
                "type".into(),
                left.file_type.to_string(),
                right.file_type.to_string(),
            ));
        }

        if left.version != right.version {
            result.push(Change::Comparison(
                "version".into(),
                left.version.to_string(),
                right.version.to_string(),
            ));
        }

        if left.localized_description != right.localized_description {
            result.push(Change::Comparison(
                "description".into(),
                left.localized_description.values().join(" / "),
                right.localized_description.values().join(" / "),
            ));
        }

        result
    }

    fn entry_changes(&self, name: String, left: &[u8], right: &[u8]) -> Option<Change> {
        if left == right {
            return None;
        }

        let mut related = Vec::new();
        if left.len() != right.len() {
            related.push(Change::Comparison(
                "size".into(),
                left.len().to_string(),
                right.len().to_string(),
            ));
        }

        if self.mode == Mode::Full {
            if let (Some(old), Some(new)) = (as_text(left), as_text(right)) {
                let lines = inline_diff(&old, &new);
                if !lines.is_empty() {
                    related.push(Change::Context(lines));
                }
            }
        }

        Some(Change::Modified(name, related))
    }

    fn changes(&self, left: &Archive, right: &Archive) -> Vec<Change> {
        let mut result = self.header_changes(left, right);

        let ids: BTreeSet<_> = left.ids().chain(right.ids()).collect();
        for id in ids {
            match (left.get(id), right.get(id)) {
                (None, Some(_)) => result.push(Change::Added(id.filename())),
                (Some(_), None) => result.push(Change::Removed(id.filename())),
                (Some(old), Some(new)) => result.extend(self.entry_changes(
                    id.filename(),
                    &old.data,
                    &new.data,
                )),
                (None, None) => {}
            }
        }

        result
    }

    pub fn handle(&self) -> Result<()> {
        let left = open_archive(&self.left)?;
        let right = open_archive(&self.right)?;

        let changes = self.changes(&left, &right);
        if changes.is_empty() {
            println!("{}", "no differences".dimmed());
            return Ok(());
        }

        for change in changes {
            print!("{}", change);
        }

        Ok(())
    }
}
