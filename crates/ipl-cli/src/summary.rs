use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ipl_cli::pipeline::{PipelineState, RunReport, StageRecord};

pub fn print_run_summary(report: &RunReport) {
    println!("Run: {}", report.run_id);
    println!("State: {}", report.state);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Duration (ms)"),
        header_cell("Artifact"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for record in &report.stages {
        table.add_row(stage_row(record));
    }
    table.add_row(vec![
        Cell::new("notify")
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        notify_cell(report),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    if let Some(error) = &report.error {
        eprintln!("Errors:");
        eprintln!("- {error}");
    }
}

pub fn print_stage_record(record: &StageRecord) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Duration (ms)"),
        header_cell("Artifact"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table.add_row(stage_row(record));
    println!("{table}");
}

fn stage_row(record: &StageRecord) -> Vec<Cell> {
    vec![
        Cell::new(record.stage)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        status_cell(record.succeeded),
        record.rows.map_or_else(|| dim_cell("-"), Cell::new),
        Cell::new(record.duration_ms),
        record
            .artifact
            .as_ref()
            .map_or_else(|| dim_cell("-"), |info| Cell::new(info.path.display())),
        match (&record.detail, &record.error) {
            (_, Some(error)) => Cell::new(error).fg(Color::Red),
            (Some(detail), None) => Cell::new(detail),
            (None, None) => dim_cell("-"),
        },
    ]
}

fn status_cell(succeeded: bool) -> Cell {
    if succeeded {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn notify_cell(report: &RunReport) -> Cell {
    match (report.state, report.notified) {
        (_, true) => status_cell(true),
        (PipelineState::Done, false) => Cell::new("failed").fg(Color::Yellow),
        _ => dim_cell("skipped"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
