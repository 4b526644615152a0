use crate::calc::calendar::{browsable_end, browsable_start, is_browsable};
use crate::calc::{header_date_text, render_grid, Cell, Grid};
use crate::state::{NavigationState, ViewMode};
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::io::Write;

pub fn run(view: ViewMode, date: Option<&str>, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let cursor = match date {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let grid = render_grid(&NavigationState::browsing(view, cursor, today));
    let mut out = std::io::stdout();
    if json {
        write_json(&grid, &mut out)
    } else {
        writeln!(out, "{}", header_date_text(today))?;
        write_grid(&grid, &mut out)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?;
    if !is_browsable(date) {
        bail!(
            "date '{}' is outside the supported range {} to {}",
            raw,
            browsable_start(),
            browsable_end().format("%Y-%m")
        );
    }
    Ok(date)
}

pub(crate) fn write_json<W: std::io::Write>(grid: &Grid, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, grid).context("failed to serialize grid")?;
    writeln!(out)?;
    Ok(())
}

/// Plain-text grid: `[n]` selected, `(n)` other period, `*` today.
pub(crate) fn write_grid<W: std::io::Write>(grid: &Grid, out: &mut W) -> Result<()> {
    let width = match grid.view_mode {
        ViewMode::Month => 6,
        ViewMode::Year | ViewMode::Decade => 9,
    };
    writeln!(out, "{}", grid.title)?;
    writeln!(out, "---")?;
    if grid.view_mode == ViewMode::Month {
        let header: String = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
            .iter()
            .map(|d| format!("{:>width$}", d))
            .collect();
        writeln!(out, "{}", header.trim_end())?;
    }
    for row in grid.cells.chunks(grid.columns()) {
        let line: String = row
            .iter()
            .map(|c| format!("{:>width$}", cell_text(c)))
            .collect();
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn cell_text(cell: &Cell) -> String {
    let mut text = if cell.is_selected {
        format!("[{}]", cell.label)
    } else if cell.is_other_period {
        format!("({})", cell.label)
    } else {
        cell.label.clone()
    };
    if cell.is_today {
        text.push('*');
    }
    text
}
