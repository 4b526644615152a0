pub mod calendar;
pub mod grid;

pub use grid::{header_date_text, render_grid, Cell, Grid};
