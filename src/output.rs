//! Table and JSON rendering for CLI output.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use conx::json::JsonNode;
use conx::upgrade::control_plane_version;
use conx::{Connection, Node, UpgradeSummary};

use crate::config::OutputFormat;

/// Row for the connection edge table.
#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "NODE ID")]
    node_id: String,
    #[tabled(rename = "CURSOR")]
    cursor: String,
}

/// Row for the upgrade candidate table.
#[derive(Tabled)]
struct UpgradeRow {
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "STEP")]
    step: String,
    #[tabled(rename = "NEXT")]
    next: String,
}

/// Print a connection's edges and page info.
pub fn print_connection(connection: &Connection<JsonNode>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(connection);
    }

    if connection.is_empty() {
        println!("No edges.");
    } else {
        let rows: Vec<EdgeRow> = connection
            .edges
            .iter()
            .enumerate()
            .map(|(i, edge)| EdgeRow {
                index: i + 1,
                node_id: edge.node.node_id().to_string(),
                cursor: edge.cursor.clone().unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        println!("{} ({} edges):", "Connection".bold(), connection.len());
        let mut table = Table::new(&rows);
        apply_table_style(&mut table);
        println!("{}", table);
    }

    let page_info = &connection.page_info;
    let has_next = if page_info.has_next_page {
        "true".green()
    } else {
        "false".yellow()
    };
    println!();
    println!(
        "Page info: endCursor={}, hasNextPage={}",
        page_info.end_cursor.as_deref().unwrap_or("-"),
        has_next
    );

    Ok(())
}

/// Print flattened nodes. Always JSON, since nodes are arbitrary objects.
pub fn print_nodes(nodes: &[JsonNode]) -> Result<()> {
    print_json(nodes)
}

/// Print upgrade candidates for a cluster.
pub fn print_upgrades(summary: &UpgradeSummary, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(summary);
    }

    let current = summary.current.as_deref().unwrap_or("unknown");
    let provider = summary.provider.as_deref().unwrap_or("-");
    println!(
        "{} (current: {}, provider: {}):",
        "Upgrade Candidates".bold(),
        current,
        provider
    );

    if !summary.has_upgrades() {
        println!("  {} No supported upgrades available", "✓".green());
        return Ok(());
    }

    let rows: Vec<UpgradeRow> = summary
        .candidates
        .iter()
        .map(|candidate| {
            let step = match summary.steps_to(candidate) {
                Some(0) => "patch".to_string(),
                Some(n) => format!("+{} minor", n),
                None => "-".to_string(),
            };
            let next = if summary.next.as_deref() == Some(candidate.as_str()) {
                "*".green().to_string()
            } else {
                String::new()
            };
            UpgradeRow {
                version: candidate.clone(),
                step,
                next,
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    apply_table_style(&mut table);
    println!("{}", table);

    if let Some(provider_next) = &summary.provider_next {
        println!();
        println!("Next version for provider API: {}", provider_next.cyan());
    }

    Ok(())
}

/// Print the control plane path from `current` to `target`.
pub fn print_upgrade_path(
    current: &str,
    target: &str,
    path: &[String],
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&json!({
            "current": current,
            "target": target,
            "path": path,
        }));
    }

    println!();
    println!(
        "{}",
        format!("Upgrade Path: {} -> {}", current, target).bold()
    );
    println!("{}", "=".repeat(40));

    if path.is_empty() {
        println!("  {} Already on target minor version", "✓".green());
        return Ok(());
    }

    let mut prev = control_plane_version(current).unwrap_or_else(|| current.to_string());
    for (i, version) in path.iter().enumerate() {
        println!("  Step {}: {} -> {}", i + 1, prev, version);
        prev = version.clone();
    }

    let word = if path.len() == 1 { "step" } else { "steps" };
    println!();
    println!("Total: {} {}", path.len(), word);

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// kubectl-style borderless table.
fn apply_table_style(table: &mut Table) {
    use tabled::settings::object::Columns;
    use tabled::settings::themes::Theme;
    use tabled::settings::{Modify, Padding};

    let mut theme = Theme::from_style(Style::empty());
    theme.remove_horizontal_lines();
    table.with(theme);
    table.with(Modify::new(Columns::new(..)).with(Padding::new(0, 2, 0, 0)));
}
