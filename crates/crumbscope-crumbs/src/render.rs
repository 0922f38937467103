use crumbscope_types::{Breadcrumb, BreadcrumbLevel, BreadcrumbType, EventSnapshot};

use crate::data::data_search_text;
use crate::filter::CrumbFilter;
use crate::store::BreadcrumbStore;
use crate::time::{TimeCell, format_time_cell};

/// Text plus the byte ranges that matched the search term
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlighted {
    pub text: String,
    pub ranges: Vec<(usize, usize)>,
}

impl Highlighted {
    pub fn new(text: impl Into<String>, filter: &CrumbFilter) -> Self {
        let text = text.into();
        let ranges = filter.find_matches(&text);
        Self { text, ranges }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ranges: Vec::new(),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// Split into `(segment, is_match)` pairs covering the whole text
    pub fn segments(&self) -> Vec<(&str, bool)> {
        let mut out = Vec::new();
        let mut last_end = 0;

        for &(start, end) in &self.ranges {
            if start > last_end {
                out.push((&self.text[last_end..start], false));
            }
            out.push((&self.text[start..end], true));
            last_end = end;
        }
        if last_end < self.text.len() {
            out.push((&self.text[last_end..], false));
        }

        out
    }
}

/// Which kind of row this is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// A real breadcrumb; `index` points into the full sequence
    Crumb { index: usize },
    /// The synthetic current-state row
    LastCrumb,
}

/// Display descriptor for one breadcrumb row
#[derive(Clone, Debug, PartialEq)]
pub struct CrumbRow {
    pub kind: RowKind,
    pub level: BreadcrumbLevel,
    pub crumb_type: BreadcrumbType,
    pub category: Highlighted,
    pub message: Highlighted,
    pub level_label: Highlighted,
    pub data: Option<Highlighted>,
    /// None renders as an empty placeholder cell
    pub time: Option<TimeCell>,
    pub time_display: Option<Highlighted>,
}

impl CrumbRow {
    pub fn is_last_crumb(&self) -> bool {
        self.kind == RowKind::LastCrumb
    }
}

/// Why the row list is empty
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    /// The event has no breadcrumbs at all
    NoBreadcrumbs,
    /// There are breadcrumbs but the search hides all of them
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoBreadcrumbs => "There are no breadcrumbs to display",
            Self::NoMatches => "Sorry, no breadcrumbs match your search query",
        }
    }
}

/// Output of one render pass
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedCrumbs {
    /// Visible breadcrumb rows, in original order
    pub rows: Vec<CrumbRow>,
    /// Always present, never filtered
    pub last_crumb: CrumbRow,
    pub empty: Option<EmptyState>,
    /// Size of the unfiltered sequence
    pub total: usize,
}

impl RenderedCrumbs {
    /// All rows including the trailing last crumb
    pub fn iter(&self) -> impl Iterator<Item = &CrumbRow> {
        self.rows.iter().chain(std::iter::once(&self.last_crumb))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }
}

/// Build row descriptors for the visible breadcrumbs plus the last crumb.
///
/// `visible` holds indices into `store` as produced by the filter; indices
/// that fall outside the store are ignored.
pub fn render_crumbs(
    store: &BreadcrumbStore,
    visible: &[usize],
    filter: &CrumbFilter,
    snapshot: &EventSnapshot,
    display_relative: bool,
) -> RenderedCrumbs {
    let reference = snapshot.date_created.as_deref();

    let rows: Vec<CrumbRow> = visible
        .iter()
        .filter_map(|&index| store.get(index).map(|crumb| (index, crumb)))
        .map(|(index, crumb)| {
            build_row(
                RowKind::Crumb { index },
                crumb,
                filter,
                reference,
                display_relative,
            )
        })
        .collect();

    let last = last_crumb(snapshot);
    let last_crumb = build_row(
        RowKind::LastCrumb,
        &last,
        filter,
        reference,
        display_relative,
    );

    let empty = if store.is_empty() {
        Some(EmptyState::NoBreadcrumbs)
    } else if rows.is_empty() {
        Some(EmptyState::NoMatches)
    } else {
        None
    };

    RenderedCrumbs {
        rows,
        last_crumb,
        empty,
        total: store.len(),
    }
}

/// Synthesize the current-state breadcrumb from the event
pub fn last_crumb(snapshot: &EventSnapshot) -> Breadcrumb {
    let (category, level) = if snapshot.is_exception {
        ("exception", BreadcrumbLevel::Error)
    } else {
        ("message", snapshot.level)
    };

    let kind = if snapshot.is_exception || level.severity() >= BreadcrumbLevel::Error.severity() {
        BreadcrumbType::Error
    } else {
        BreadcrumbType::Info
    };

    Breadcrumb {
        message: snapshot.message.clone().or_else(|| snapshot.title.clone()),
        category: Some(category.to_string()),
        level,
        kind,
        timestamp: snapshot.date_created.clone(),
        data: None,
        event_id: snapshot.event_id.clone(),
    }
}

fn build_row(
    kind: RowKind,
    crumb: &Breadcrumb,
    filter: &CrumbFilter,
    reference: Option<&str>,
    display_relative: bool,
) -> CrumbRow {
    let time = format_time_cell(crumb.timestamp.as_deref(), reference, display_relative);
    let time_display = time.as_ref().map(|cell| Highlighted::new(cell.display.clone(), filter));

    CrumbRow {
        kind,
        level: crumb.level,
        crumb_type: crumb.kind,
        category: Highlighted::new(crumb.category.clone().unwrap_or_default(), filter),
        message: Highlighted::new(crumb.message.clone().unwrap_or_default(), filter),
        level_label: Highlighted::new(crumb.level.label(), filter),
        data: crumb
            .data
            .as_ref()
            .map(data_search_text)
            .filter(|text| !text.is_empty())
            .map(|text| Highlighted::new(text, filter)),
        time,
        time_display,
    }
}
