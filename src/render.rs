//! Console rendering of work item forests.
//!
//! Kinds and states are free text, so colors come from open lookups with a
//! neutral fallback instead of an exhaustive match.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use colored::{Color, Colorize};

use crate::config::AzDoConfig;
use crate::model::{Forest, TreeNode};

const ORANGE: Color = Color::TrueColor { r: 215, g: 135, b: 0 };
const PURPLE: Color = Color::TrueColor { r: 128, g: 0, b: 128 };
const PINK: Color = Color::TrueColor { r: 255, g: 175, b: 215 };

/// Fallback for kinds and states without a configured color.
pub const DEFAULT_COLOR: Color = Color::White;

pub static TYPE_COLORS: LazyLock<HashMap<&str, Color>> = LazyLock::new(|| {
    [
        ("Task", Color::Yellow),
        ("Feature", PURPLE),
        ("Epic", ORANGE),
        ("Bug", Color::Red),
        ("Tech", Color::BrightBlack),
        ("Impediment", PINK),
    ]
    .into_iter()
    .collect()
});

pub static STATE_COLORS: LazyLock<HashMap<&str, Color>> = LazyLock::new(|| {
    [
        ("Done", Color::Green),
        ("Closed", Color::Green),
        ("Active", Color::Yellow),
        ("Committed", Color::BrightCyan),
        ("Ready", ORANGE),
        ("To Do", Color::BrightBlack),
        ("In Progress", Color::BrightCyan),
        ("Removed", Color::Red),
        ("Implemented", PINK),
    ]
    .into_iter()
    .collect()
});

#[must_use]
pub fn type_color(kind: &str) -> Color {
    TYPE_COLORS.get(kind).copied().unwrap_or(DEFAULT_COLOR)
}

#[must_use]
pub fn state_color(state: &str) -> Color {
    STATE_COLORS.get(state).copied().unwrap_or(DEFAULT_COLOR)
}

/// Format an effort value; absent renders blank.
#[must_use]
pub fn format_effort(effort: Option<f64>) -> String {
    effort.map(|e| e.to_string()).unwrap_or_default()
}

/// Options controlling how a forest is drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    /// Used to turn ids into work item URLs.
    pub config: Option<&'a AzDoConfig>,
    /// Emit OSC-8 terminal hyperlinks on ids.
    pub hyperlinks: bool,
}

/// Wrap `text` in an OSC-8 hyperlink.
fn hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\")
}

/// One-line label for a node: `<id> <title> [<state>] (<effort>)`.
#[must_use]
pub fn node_label(node: &TreeNode, options: RenderOptions<'_>) -> String {
    let item = &node.item;

    let id = item.id.to_string();
    let id = match options.config {
        Some(config) if options.hyperlinks => hyperlink(&config.work_item_url(item.id), &id),
        _ => id,
    };

    format!(
        "{} {} {} {}",
        id.color(type_color(&item.kind)).bold(),
        item.title,
        format!("[{}]", item.state).color(state_color(&item.state)).bold(),
        format!("({})", format_effort(item.completed_work)).bright_black(),
    )
}

/// Render the header line and every tree below it.
#[must_use]
pub fn render_forest(forest: &Forest, total: f64, options: RenderOptions<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        "Work Items".bold(),
        format!("(Total Completed: {total})").bright_black()
    );

    let count = forest.roots.len();
    for (i, root) in forest.roots.iter().enumerate() {
        render_node(&mut out, root, "", i + 1 == count, options);
    }

    out
}

fn render_node(out: &mut String, node: &TreeNode, prefix: &str, last: bool, options: RenderOptions<'_>) {
    let branch = if last { "└── " } else { "├── " };
    let _ = writeln!(out, "{prefix}{branch}{}", node_label(node, options));

    let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        render_node(out, child, &child_prefix, i + 1 == count, options);
    }
}

/// Print a forest to stdout.
pub fn print_forest(forest: &Forest, total: f64, options: RenderOptions<'_>) {
    print!("{}", render_forest(forest, total, options));
}
