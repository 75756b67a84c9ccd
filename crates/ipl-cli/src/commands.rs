use std::fs;

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use ipl_cli::config::PipelineConfig;
use ipl_cli::pipeline::{RunReport, StageContext, StageKind, StageRecord, batting_pipeline};
use ipl_ingest::read_artifact;
use ipl_model::{cell_text, profile};
use polars::prelude::AnyValue;
use tracing::info;

use crate::cli::{Cli, InspectArgs, RunArgs, TaskArg};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

/// Defaults, then the config file, then command-line overrides.
pub fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    Ok(config)
}

pub fn run_pipeline(config: &PipelineConfig, args: &RunArgs) -> Result<RunReport> {
    let ctx = StageContext::for_config(config);
    let pipeline = batting_pipeline(config);
    let report = pipeline.run_from(&ctx, StageKind::from(args.from));
    if let Some(path) = &args.report {
        let json = report.to_json().context("serialize run report")?;
        fs::write(path, json).with_context(|| format!("write run report {}", path.display()))?;
        info!(path = %path.display(), "run report written");
    }
    Ok(report)
}

/// Run one task. Returns the stage record, or `None` for the notification.
pub fn run_task(config: &PipelineConfig, task: TaskArg) -> Result<Option<StageRecord>> {
    let ctx = StageContext::for_config(config);
    let pipeline = batting_pipeline(config);
    let kind = match task {
        TaskArg::Extract => StageKind::Extract,
        TaskArg::Transform => StageKind::Transform,
        TaskArg::Load => StageKind::Load,
        TaskArg::Notify => {
            pipeline.notify(&ctx, None).context("notify")?;
            return Ok(None);
        }
    };
    let record = pipeline
        .run_stage(&ctx, kind)
        .with_context(|| format!("{kind} stage"))?;
    Ok(Some(record))
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let df = read_artifact(&args.artifact)?;
    println!("Artifact: {}", args.artifact.display());
    println!("Rows: {}", df.height());

    let mut schema = Table::new();
    schema.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Values"),
    ]);
    apply_table_style(&mut schema);
    align_column(&mut schema, 2, CellAlignment::Right);
    for column in profile(&df) {
        schema.add_row(vec![
            Cell::new(&column.name),
            Cell::new(column.column_type),
            Cell::new(column.values),
        ]);
    }
    println!("{schema}");

    if args.limit == 0 || df.height() == 0 {
        return Ok(());
    }
    let head = df.head(Some(args.limit));
    let mut rows = Table::new();
    rows.set_header(
        head.get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut rows);
    for idx in 0..head.height() {
        let mut cells = Vec::with_capacity(head.width());
        for column in head.get_columns() {
            let cell = match column.get(idx)? {
                AnyValue::Null => dim_cell("null"),
                value => Cell::new(cell_text(value)),
            };
            cells.push(cell);
        }
        rows.add_row(cells);
    }
    println!("{rows}");
    if df.height() > args.limit {
        println!("... {} more rows", df.height() - args.limit);
    }
    Ok(())
}

pub fn show_config(config: &PipelineConfig) -> Result<()> {
    let text = config.to_toml().context("render config")?;
    print!("{text}");
    Ok(())
}
