use crate::config::{self, Config};
use crate::console;
use crate::engine;
use crate::exceptions::StintError;
use crate::jira::client::JiraClient;
use crate::models::{CycleReport, DEFAULT_TRACKED_STATUSES, ReportOptions};
use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use crossterm::style::Stylize;
use std::io::Write;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    board: u64,
    sprint_pattern: String,
    tracked_statuses: Vec<String>,
    inflation_multiplier: f64,
    show_inflated: bool,
    exclude_inflated: bool,
    json_output: bool,
) -> Result<(), StintError> {
    let config = Config::from_env()?;
    let pattern = config::parse_sprint_pattern(&sprint_pattern)?;

    let options = ReportOptions {
        tracked_statuses: if tracked_statuses.is_empty() {
            DEFAULT_TRACKED_STATUSES.map(String::from).to_vec()
        } else {
            tracked_statuses
        },
        inflation_multiplier,
        include_inflated_report: show_inflated,
        exclude_inflated,
    };

    let client = JiraClient::new(&config, board);
    let report = engine::compute_report(&client, &pattern, &options).await?;

    if json_output {
        let mut stdout = std::io::stdout();
        if let Err(e) = serde_json::to_writer(&mut stdout, &report)
            && !e.is_io()
        {
            return Err(StintError::Serialization(e));
        }
        let _ = writeln!(stdout);
        return Ok(());
    }

    render(&report, &sprint_pattern, &options);
    Ok(())
}

fn format_estimate(estimate: f64) -> String {
    if estimate.fract() == 0.0 {
        format!("{}", estimate as i64)
    } else {
        format!("{}", estimate)
    }
}

fn render(report: &CycleReport, pattern: &str, options: &ReportOptions) {
    let width = console::get_terminal_width();

    let story_count: usize = report.groups.iter().map(|g| g.count).sum();
    let summary = format!(
        "{} estimated stories in {} groups, {} without estimate",
        story_count,
        report.groups.len(),
        report.without_estimate
    );

    console::draw_panel(
        &format!("Cycle time for sprints matching '{}'", pattern),
        &[summary],
        width,
    );
    println!();

    if report.groups.is_empty() {
        println!("No stories with estimates found.");
    } else {
        print_groups_table(report, width);
    }

    if let Some(inflated) = &report.inflated {
        println!();
        let title = format!(
            "Inflated stories (over {}x estimate)",
            format_estimate(options.inflation_multiplier)
        );
        if inflated.is_empty() {
            console::draw_panel(&title, &["none".to_string()], width);
        } else {
            console::draw_panel(&title, &[], width);
            println!();
            print_inflated_table(report, width);
        }
    }
}

fn print_groups_table(report: &CycleReport, width: usize) {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_width(width as u16)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, ' ');

    table.set_header(vec![
        Cell::new("Estimate")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Stories")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Mean")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Median")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Min")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Max")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Time in status").add_attribute(Attribute::Bold),
    ]);

    for group in &report.groups {
        let shares = group
            .status_share
            .iter()
            .map(|s| format!("{} {:.1}%", s.status, s.percent))
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(format_estimate(group.estimate)).set_alignment(CellAlignment::Right),
            Cell::new(group.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", group.mean_days)).set_alignment(CellAlignment::Right),
            Cell::new(group.median_days).set_alignment(CellAlignment::Right),
            Cell::new(group.min_days).set_alignment(CellAlignment::Right),
            Cell::new(group.max_days).set_alignment(CellAlignment::Right),
            Cell::new(shares),
        ]);
    }

    println!("{}", table);

    if report.without_estimate > 0 {
        let note = format!(
            "{} stories without estimate were left out of the groups.",
            report.without_estimate
        );
        if console::is_stdout_terminal() {
            println!("{}", note.dim());
        } else {
            println!("{}", note);
        }
    }
}

fn print_inflated_table(report: &CycleReport, width: usize) {
    let Some(inflated) = &report.inflated else {
        return;
    };

    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_width(width as u16)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, ' ');

    table.set_header(vec![
        Cell::new("Estimate")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Story").add_attribute(Attribute::Bold),
        Cell::new("Days")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Over")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new("Summary").add_attribute(Attribute::Bold),
    ]);

    for group in inflated {
        for story in &group.stories {
            table.add_row(vec![
                Cell::new(format_estimate(group.estimate)).set_alignment(CellAlignment::Right),
                Cell::new(&story.key),
                Cell::new(story.total_days).set_alignment(CellAlignment::Right),
                Cell::new(format!("+{}%", story.percent_over)).set_alignment(CellAlignment::Right),
                Cell::new(&story.summary),
            ]);
        }
    }

    println!("{}", table);
}
