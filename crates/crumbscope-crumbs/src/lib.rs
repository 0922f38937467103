//! Breadcrumb processing for crumbscope
//!
//! This crate provides event parsing, the breadcrumb store, the search
//! filter, and the row renderer that turns filtered breadcrumbs into
//! display descriptors.

mod data;
mod filter;
mod parser;
mod render;
mod state;
mod store;
mod time;

pub use data::{MAX_DATA_DEPTH, data_search_text};
pub use filter::{CrumbFilter, FilterPresets};
pub use parser::{EventParser, ParseError, ParsedEvent};
pub use render::{
    CrumbRow, EmptyState, Highlighted, RenderedCrumbs, RowKind, last_crumb, render_crumbs,
};
pub use state::FilterState;
pub use store::{BreadcrumbStore, LevelCounts};
pub use time::{TimeCell, format_time_cell};

// Re-export types used in our public API
pub use crumbscope_types::{Breadcrumb, BreadcrumbLevel, BreadcrumbType, EventSnapshot};
