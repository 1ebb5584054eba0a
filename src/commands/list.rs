//! List deployment records with the active marker.

use std::sync::Arc;

use anyhow::Result;

use crate::deps::{MessageStyle, UserInterface};
use crate::envstate::EnvState;
use crate::model::Deployment;
use crate::store::DeploymentStore;

const HEADERS: [&str; 5] = ["uuid", "created_at", "name", "status", "active"];

/// Dependencies for the list command
pub struct ListDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
}

/// Execute the list command with injected dependencies
pub fn execute_with_deps(deps: &Arc<ListDependencies>) -> Result<()> {
    let mut records = deps.store.list()?;
    if records.is_empty() {
        deps.ui.print_styled(
            "No deployments found. Create one with `stratus deployment create`.",
            MessageStyle::Yellow,
        );
        return Ok(());
    }

    records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let active = deps.env_state.active_deployment();

    for line in render_table(&records, active.as_deref()) {
        deps.ui.print(&line);
    }
    Ok(())
}

/// Format the records as aligned rows under the fixed header set.
fn render_table(records: &[Deployment], active: Option<&str>) -> Vec<String> {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|record| {
            [
                record.uuid.clone(),
                record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.name.clone(),
                record.status.to_string(),
                if active == Some(record.uuid.as_str()) {
                    "*".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![format_row(&header), separator];
    lines.extend(rows.iter().map(|row| format_row(row)));
    lines
}

/// Execute the list command with production dependencies
pub fn execute() -> Result<()> {
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;

    let deps = Arc::new(ListDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(&deps)
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
