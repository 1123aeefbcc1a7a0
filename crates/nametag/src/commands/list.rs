//! `list`: every known tag.

use serde::Serialize;
use tabled::Tabled;

use nametag_core::Tag;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::runtime::Runtime;
use crate::terminal;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TagEntry {
    id: String,
    display: String,
    permission: String,
}

impl From<&Tag> for TagEntry {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id().to_owned(),
            display: tag.display().to_owned(),
            permission: tag.permission(),
        }
    }
}

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Display")]
    display: String,
    #[tabled(rename = "Permission")]
    permission: String,
}

impl From<&TagEntry> for TagRow {
    fn from(e: &TagEntry) -> Self {
        Self {
            id: e.id.clone(),
            display: terminal::strip(&e.display),
            permission: e.permission.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn render(runtime: &Runtime, global: &GlobalOpts) -> Result<String, CliError> {
    let entries: Vec<TagEntry> = runtime
        .system()
        .tags()
        .all_tags()
        .iter()
        .map(TagEntry::from)
        .collect();
    output::render_list(
        &global.output,
        &entries,
        |e| TagRow::from(e),
        |e| e.id.clone(),
    )
}

pub fn handle(runtime: &Runtime, global: &GlobalOpts) -> Result<(), CliError> {
    let out = render(runtime, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
