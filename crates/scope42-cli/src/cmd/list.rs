//! `scope42 list`: list items with filtering.

use crate::cmd::Context;
use crate::output::{pretty_rule, pretty_section, render_mode};
use clap::Args;
use scope42_core::selectors::{select_all_items, select_items_of_kind};
use scope42_core::{Item, ItemKind};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only items of this type: issue, risk, improvement or decision.
    #[arg(short, long)]
    pub kind: Option<ItemKind>,

    /// Only items carrying this tag. Repeat to require several tags.
    #[arg(short, long)]
    pub tag: Vec<String>,

    /// Only items in this status (case-insensitive).
    #[arg(short, long)]
    pub status: Option<String>,
}

/// One line of an item listing; also the JSON shape for created and updated
/// items.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemRow {
    pub id: String,
    pub kind: ItemKind,
    pub status: &'static str,
    pub title: String,
    pub tags: Vec<String>,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            kind: item.kind(),
            status: item.details.status_str(),
            title: item.title.clone(),
            tags: item.tags.clone(),
        }
    }
}

/// Tab-separated row: id, status, title.
pub fn write_row_text(row: &ItemRow, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}\t{}\t{}", row.id, row.status, row.title)
}

fn write_row_pretty(row: &ItemRow, w: &mut dyn Write) -> io::Result<()> {
    write!(w, "{:<16} {:<12} {}", row.id, row.status, row.title)?;
    if !row.tags.is_empty() {
        write!(w, "  [{}]", row.tags.join(", "))?;
    }
    writeln!(w)
}

fn matches(item: &Item, args: &ListArgs) -> bool {
    let status_ok = args
        .status
        .as_deref()
        .is_none_or(|s| item.details.status_str().eq_ignore_ascii_case(s.trim()));
    let tags_ok = args.tag.iter().all(|t| item.tags.contains(t));
    status_ok && tags_ok
}

pub fn run_list(args: &ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open(false)?;
    let items = session.store.items();
    let selected = match args.kind {
        Some(kind) => select_items_of_kind(items, kind),
        None => select_all_items(items),
    };
    let rows: Vec<ItemRow> = selected
        .into_iter()
        .filter(|item| matches(item, args))
        .map(ItemRow::from)
        .collect();

    render_mode(
        ctx.output,
        &rows,
        |rows, w| {
            for row in rows {
                write_row_text(row, w)?;
            }
            Ok(())
        },
        |rows, w| {
            if rows.is_empty() {
                return writeln!(w, "No items found");
            }
            pretty_section(w, &format!("Items ({})", rows.len()))?;
            let mut current = None;
            for row in rows {
                if current.is_some_and(|kind| kind != row.kind) {
                    pretty_rule(w)?;
                }
                current = Some(row.kind);
                write_row_pretty(row, w)?;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use scope42_core::model::item::{Details, NewItem};

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ListArgs,
    }

    fn args(argv: &[&str]) -> ListArgs {
        Wrapper::parse_from(std::iter::once("test").chain(argv.iter().copied())).args
    }

    fn risk(tags: &[&str]) -> Item {
        let mut new = NewItem::new("Vendor lock-in", Details::empty(ItemKind::Risk));
        new.tags = tags.iter().map(ToString::to_string).collect();
        new.into_item("risk-1".parse().expect("id"))
    }

    #[test]
    fn defaults() {
        let a = args(&[]);
        assert!(a.kind.is_none());
        assert!(a.tag.is_empty());
        assert!(a.status.is_none());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(args(&["--kind", "Decision"]).kind, Some(ItemKind::Decision));
    }

    #[test]
    fn filters_by_status_and_all_tags() {
        let item = risk(&["cost", "vendor"]);
        assert!(matches(&item, &args(&["--status", "POTENTIAL"])));
        assert!(!matches(&item, &args(&["--status", "mitigated"])));
        assert!(matches(&item, &args(&["-t", "cost", "-t", "vendor"])));
        assert!(!matches(&item, &args(&["-t", "cost", "-t", "security"])));
    }

    #[test]
    fn text_row_is_tab_separated() {
        let mut buf = Vec::new();
        write_row_text(&ItemRow::from(&risk(&[])), &mut buf).expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "risk-1\tpotential\tVendor lock-in\n"
        );
    }
}
