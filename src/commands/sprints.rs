use crate::config::{self, Config};
use crate::console;
use crate::engine::IssueTracker;
use crate::exceptions::StintError;
use crate::jira::client::JiraClient;
use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

/// Diagnostic helper: shows which sprints a pattern would select before
/// running the full report.
pub async fn run(board: u64, sprint_pattern: String) -> Result<(), StintError> {
    let config = Config::from_env()?;
    let pattern = config::parse_sprint_pattern(&sprint_pattern)?;

    let client = JiraClient::new(&config, board);
    let sprints = client.list_sprints_matching(&pattern).await?;

    if sprints.is_empty() {
        println!("No sprints on board {} match '{}'.", board, sprint_pattern);
        return Ok(());
    }

    let width = console::get_terminal_width();
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_width(width as u16)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("State").add_attribute(Attribute::Bold),
    ]);

    for sprint in &sprints {
        table.add_row(vec![
            Cell::new(sprint.id).set_alignment(CellAlignment::Right),
            Cell::new(&sprint.name),
            Cell::new(&sprint.state),
        ]);
    }

    println!("{}", table);
    Ok(())
}
