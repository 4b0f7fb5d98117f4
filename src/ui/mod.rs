//! Terminal rendering: thin display over filtered bucket sets

mod grid;
mod highlight;

pub use grid::{render_day, render_month, render_week};
pub use highlight::highlight_matches;
