use crate::calc::calendar::{
    add_months, add_years, clamp_browsable, first_of_month, with_month, with_year,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Year,
    Decade,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Year => "year",
            ViewMode::Decade => "decade",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

impl Step {
    fn sign(self) -> i32 {
        match self {
            Step::Prev => -1,
            Step::Next => 1,
        }
    }
}

/// What activating a grid cell does. Month view cells carry a full date,
/// year view cells a month number (1..=12), decade view cells a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellTarget {
    Day(NaiveDate),
    Month(u32),
    Year(i32),
}

/// Browsing state of the calendar.
///
/// `cursor` is the month being browsed. It always sits on day 1 inside the
/// browsable range. `selected` is the user's chosen day and `today` follows
/// the live clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    view_mode: ViewMode,
    cursor: NaiveDate,
    selected: NaiveDate,
    today: NaiveDate,
}

impl NavigationState {
    pub fn new(today: NaiveDate) -> Self {
        NavigationState {
            view_mode: ViewMode::Month,
            cursor: month_start(today),
            selected: today,
            today,
        }
    }

    /// Builds a state browsing `cursor` in `view_mode`, used by the `show` command.
    pub fn browsing(view_mode: ViewMode, cursor: NaiveDate, today: NaiveDate) -> Self {
        NavigationState {
            view_mode,
            cursor: month_start(cursor),
            selected: cursor,
            today,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn refresh_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    /// Zooms out one level. Decade is terminal: further activations stay there.
    pub fn activate_title(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Month => ViewMode::Year,
            ViewMode::Year | ViewMode::Decade => ViewMode::Decade,
        };
        debug!(view = self.view_mode.as_str(), "title activated");
    }

    /// Jumps back to the month view of `now`, selecting it.
    pub fn activate_header(&mut self, now: NaiveDate) {
        self.view_mode = ViewMode::Month;
        self.cursor = month_start(now);
        self.selected = now;
        debug!(%now, "header activated");
    }

    pub fn navigate(&mut self, step: Step) {
        let sign = step.sign();
        self.cursor = month_start(match self.view_mode {
            ViewMode::Month => add_months(self.cursor, sign),
            ViewMode::Year => add_years(self.cursor, sign),
            ViewMode::Decade => add_years(self.cursor, sign * 10),
        });
        debug!(cursor = %self.cursor, view = self.view_mode.as_str(), "navigated");
    }

    /// Applies a cell activation. Targets that do not belong to the current
    /// view are ignored.
    pub fn activate(&mut self, target: CellTarget) {
        match (self.view_mode, target) {
            (ViewMode::Month, CellTarget::Day(date)) => {
                self.selected = date;
            }
            (ViewMode::Year, CellTarget::Month(month)) if (1..=12).contains(&month) => {
                self.cursor = month_start(with_month(self.cursor, month));
                self.view_mode = ViewMode::Month;
            }
            (ViewMode::Decade, CellTarget::Year(year)) => {
                self.cursor = month_start(with_year(self.cursor, year));
                self.view_mode = ViewMode::Year;
            }
            (mode, target) => {
                debug!(view = mode.as_str(), ?target, "ignoring cell from another view");
                return;
            }
        }
        debug!(
            cursor = %self.cursor,
            selected = %self.selected,
            view = self.view_mode.as_str(),
            "cell activated"
        );
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    first_of_month(clamp_browsable(date))
}
