use std::fmt::{self, Write};

use crate::error::RenderError;
use crate::resources::{Collection, Event, Item, ItemGroup, Node, ScriptBody};
use crate::tabwriter::tabbed_string;

const INDENT: &str = "  ";

/// Nesting depth, printed as that many [`INDENT`] units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Indent(usize);

impl Indent {
    fn deeper(self, levels: usize) -> Self {
        Indent(self.0 + levels)
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.0 {
            f.write_str(INDENT)?;
        }
        Ok(())
    }
}

/// Renders collections as one aligned report.
pub fn describe_collections(collections: &[Collection]) -> Result<String, RenderError> {
    tabbed_string(|out| -> Result<(), RenderError> {
        for c in collections {
            writeln!(out, "Info:")?;
            writeln!(out, "{INDENT}ID:\t{}", c.info.postman_id)?;
            writeln!(out, "{INDENT}Name:\t{}", c.info.name)?;
            writeln!(out, "{INDENT}Schema:\t{}", c.info.schema)?;
            write_nodes(out, &c.item, Indent(0))?;
        }
        Ok(())
    })
}

fn write_nodes(out: &mut dyn Write, nodes: &[Node], prefix: Indent) -> Result<(), RenderError> {
    if nodes.is_empty() {
        return Ok(());
    }

    writeln!(out, "{prefix}Items:")?;
    for (idx, node) in nodes.iter().enumerate() {
        match node {
            Node::Folder(folder) => write_folder(out, folder, prefix, idx)?,
            Node::Request(item) => write_request(out, item, prefix, idx)?,
        }
    }
    Ok(())
}

fn write_folder(
    out: &mut dyn Write,
    folder: &ItemGroup,
    prefix: Indent,
    idx: usize,
) -> Result<(), RenderError> {
    let entry = prefix.deeper(1);
    let field = prefix.deeper(2);

    writeln!(out, "{entry}{idx}:")?;
    writeln!(out, "{field}Type:\tfolder")?;
    writeln!(out, "{field}Name:\t{}", folder.name)?;
    write_nodes(out, &folder.item, field)?;
    write_events(out, &folder.event, field, &folder.name)
}

fn write_request(
    out: &mut dyn Write,
    item: &Item,
    prefix: Indent,
    idx: usize,
) -> Result<(), RenderError> {
    let entry = prefix.deeper(1);
    let field = prefix.deeper(2);

    writeln!(out, "{entry}{idx}:")?;
    writeln!(
        out,
        "{field}ID:\t{}",
        item.postman_id.as_deref().unwrap_or_default()
    )?;
    writeln!(out, "{field}Type:\trequest")?;
    writeln!(out, "{field}Name:\t{}", item.name)?;
    write_events(out, &item.event, field, &item.name)
}

fn write_events(
    out: &mut dyn Write,
    events: &[Event],
    prefix: Indent,
    owner: &str,
) -> Result<(), RenderError> {
    if events.is_empty() {
        return Ok(());
    }

    let entry = prefix.deeper(1);
    let field = prefix.deeper(2);
    let script = prefix.deeper(3);
    let body = prefix.deeper(4);

    writeln!(out, "{prefix}Events:")?;
    for (idx, ev) in events.iter().enumerate() {
        writeln!(out, "{entry}{idx}:")?;
        writeln!(out, "{field}Listen:\t{}", ev.listen)?;
        writeln!(out, "{field}Script:")?;
        writeln!(out, "{script}ID:\t{}", ev.script.id)?;
        writeln!(out, "{script}Type:\t{}", ev.script.script_type)?;
        writeln!(out, "{script}Exec:")?;

        match &ev.script.exec {
            Some(ScriptBody::Lines(lines)) => writeln!(out, "{body}\t{}", lines.join("\n\t"))?,
            Some(ScriptBody::Source(source)) => writeln!(out, "{body}\t{source}")?,
            Some(ScriptBody::Unsupported(value)) => {
                return Err(RenderError::UnsupportedScriptBody {
                    owner: owner.to_string(),
                    event: idx,
                    found: ScriptBody::shape(value),
                });
            }
            None => {}
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
