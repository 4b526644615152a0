//! Pure grid computation: navigation state in, cell list out.
//!
//! Nothing here touches the terminal. The ui layer turns a [`Grid`] into
//! widgets and maps clicks back to each cell's [`CellTarget`].

use crate::calc::calendar::{
    DECADE_CELLS, DECADE_LEAD, days_in_month, decade_start, first_of_month, first_weekday_offset,
    month_name, month_short_name,
};
use crate::state::{CellTarget, NavigationState, ViewMode};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub label: String,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_other_period: bool,
    pub target: CellTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub view_mode: ViewMode,
    pub title: String,
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn columns(&self) -> usize {
        match self.view_mode {
            ViewMode::Month => 7,
            ViewMode::Year | ViewMode::Decade => 4,
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len().div_ceil(self.columns())
    }

    /// Index of the first selected cell, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_selected)
    }
}

pub fn render_grid(state: &NavigationState) -> Grid {
    let cells = match state.view_mode() {
        ViewMode::Month => render_month_view(state),
        ViewMode::Year => render_year_view(state),
        ViewMode::Decade => render_decade_view(state),
    };
    Grid {
        view_mode: state.view_mode(),
        title: title_text(state),
        cells,
    }
}

/// "October 2026", "2026" or "2020 - 2029" depending on the view.
pub fn title_text(state: &NavigationState) -> String {
    let cursor = state.cursor();
    match state.view_mode() {
        ViewMode::Month => format!("{} {}", month_name(cursor.month()), cursor.year()),
        ViewMode::Year => cursor.year().to_string(),
        ViewMode::Decade => {
            let start = decade_start(cursor.year());
            format!("{} - {}", start, start + 9)
        }
    }
}

/// Long header date, e.g. "Saturday, October 17".
pub fn header_date_text(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

fn day_cell(date: NaiveDate, state: &NavigationState, is_other_period: bool) -> Cell {
    Cell {
        label: date.day().to_string(),
        is_today: date == state.today(),
        is_selected: date == state.selected(),
        is_other_period,
        target: CellTarget::Day(date),
    }
}

/// Sunday-first weeks: trailing days of the previous month, the whole month,
/// then leading days of the next month up to a multiple of 7.
pub fn render_month_view(state: &NavigationState) -> Vec<Cell> {
    let cursor = state.cursor();
    let offset = first_weekday_offset(cursor.year(), cursor.month());
    let days = days_in_month(cursor.year(), cursor.month());
    let total = (offset + days).div_ceil(7) * 7;

    let Some(first) = cursor.checked_sub_days(Days::new(offset as u64)) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take(total as usize)
        .map(|date| day_cell(date, state, first_of_month(date) != cursor))
        .collect()
}

pub fn render_year_view(state: &NavigationState) -> Vec<Cell> {
    let year = state.cursor().year();
    let today = state.today();
    (1..=12)
        .map(|month| Cell {
            label: month_short_name(month).to_string(),
            is_today: month == today.month() && year == today.year(),
            is_selected: month == state.cursor().month(),
            is_other_period: false,
            target: CellTarget::Month(month),
        })
        .collect()
}

/// Sixteen years starting two before the decade; the first two and last two
/// cells are marked as belonging to another period.
pub fn render_decade_view(state: &NavigationState) -> Vec<Cell> {
    let start = decade_start(state.cursor().year()) - DECADE_LEAD;
    (0..DECADE_CELLS)
        .map(|i| {
            let year = start + i as i32;
            Cell {
                label: year.to_string(),
                is_today: year == state.today().year(),
                is_selected: year == state.cursor().year(),
                is_other_period: i < DECADE_LEAD as usize || i >= DECADE_CELLS - 2,
                target: CellTarget::Year(year),
            }
        })
        .collect()
}
