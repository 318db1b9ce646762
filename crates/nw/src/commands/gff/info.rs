use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use miette::Result;
use nw_gff::{Document, FieldValue, StructId, UNTYPED_TAG};
use owo_colors::OwoColorize;

use crate::commands::gff::open_document;

#[derive(Args)]
pub struct InfoArgs {
    /// An input GFF file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Print every field of the tree
    #[arg(long, default_value_t = false)]
    fields: bool,
}

fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::Float(v) => v.to_string(),
        FieldValue::Double(v) => v.to_string(),
        FieldValue::String(v) => format!("{:?}", v),
        FieldValue::ResRef(v) => format!("{:?}", v.as_str()),
        FieldValue::LocString(v) => v
            .iter()
            .map(|(language, text)| format!("[{}] {:?}", language, text))
            .join(", "),
        FieldValue::Void(v) => format!("{} bytes", v.len()),
        FieldValue::Struct(_) => String::new(),
        FieldValue::List(v) => format!("{} entries", v.len()),
        other => other.as_i64().map(|v| v.to_string()).unwrap_or_default(),
    }
}

fn tag(doc: &Document, id: StructId) -> String {
    match doc[id].tag() {
        UNTYPED_TAG => String::new(),
        tag => format!(" <{}>", tag),
    }
}

enum Work {
    Line(String),
    Struct(StructId, usize),
}

/// Render the fields under `start`, depth first
fn render(doc: &Document, start: StructId) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack = vec![Work::Struct(start, 1)];

    while let Some(work) = stack.pop() {
        let (id, depth) = match work {
            Work::Line(line) => {
                lines.push(line);
                continue;
            }
            Work::Struct(id, depth) => (id, depth),
        };

        let indent = "  ".repeat(depth);
        let mut pending = Vec::new();

        for (label, value) in doc[id].iter() {
            pending.push(Work::Line(format!(
                "{}{} {} {}",
                indent,
                label,
                value.kind().dimmed(),
                describe(value)
            )));

            match value {
                FieldValue::Struct(child) => {
                    pending.push(Work::Line(format!("{}  struct{}", indent, tag(doc, *child))));
                    pending.push(Work::Struct(*child, depth + 2));
                }
                FieldValue::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        pending.push(Work::Line(format!("{}  [{}]{}", indent, i, tag(doc, *item))));
                        pending.push(Work::Struct(*item, depth + 2));
                    }
                }
                _ => {}
            }
        }

        stack.extend(pending.into_iter().rev());
    }

    lines
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let doc = open_document(&self.file)?;

        println!("{}", self.file.display().bold());
        println!("  type:    {}", doc.file_type);
        println!("  version: {}", doc.file_version);
        println!("  structs: {}", doc.struct_count());
        println!("  fields:  {}", doc.structs().map(|(_, s)| s.len()).sum::<usize>());

        if self.fields {
            println!("{}", "root".bold());
            for line in render(&doc, StructId::ROOT) {
                println!("{}", line);
            }
        }

        Ok(())
    }
}
