//! Cross-references between collections that share no structured key.
//!
//! Action ledger entries are grouped by a free-text sheet label such as
//! `"Poland 10-15-2023"` or `"Lesotho 6- 2017"`. Parsing such a label is an
//! ordered, total function with named tiers:
//!
//! 1. [`LabelTier::Dated`] – `<text> <month>-<day>-<year>` or `<text> <month>-<year>`,
//!    whitespace allowed around the dashes.
//! 2. [`LabelTier::Loose`] – `<text> <month><optional dash><optional space><year>`.
//!    Every dashed shape it accepts is already dated, so in practice this tier
//!    catches labels like `"Chad 4 2021"` with no dash at all.
//! 3. [`LabelTier::Verbatim`] – anything else; the whole label is the country text.
//!
//! A tier only succeeds when its month lies in 1..=12. The country text
//! recovered from a label is then matched against the hand-coded summaries,
//! first by exact name and then by case-insensitive containment in either
//! direction. No match is a valid outcome and is reported as `None`.

use chrono::Month;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use std::collections::BTreeMap;

use crate::construct::{ActionSummaryRecord, Candidate, ElectionDetailRecord, RecordStore};
use crate::datatype::{percent, Outcome};
use crate::lookup::{normalize_label, KeyIndex};

lazy_static! {
    static ref DATED_LABEL: Regex =
        Regex::new(r"^(.+?)\s+(\d{1,2})\s*-\s*(?:(\d{1,2})\s*-\s*)*(\d{4})$").unwrap();
    static ref LOOSE_LABEL: Regex = Regex::new(r"^(.+?)\s+(\d{1,2})-?\s*(\d{4})$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelTier {
    Dated,
    Loose,
    Verbatim,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetLabel {
    pub country: String,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub year: Option<i32>,
    pub tier: LabelTier,
}

impl SheetLabel {
    fn verbatim(label: &str) -> Self {
        Self { country: label.to_string(), month: None, day: None, year: None, tier: LabelTier::Verbatim }
    }
    pub fn month_name(&self) -> Option<&'static str> {
        let month = Month::try_from(u8::try_from(self.month?).ok()?).ok()?;
        Some(month.name())
    }
}

fn valid_month(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|m| (1..=12).contains(m))
}

pub fn parse_sheet_label(label: &str) -> SheetLabel {
    let trimmed = label.trim();
    if let Some(caps) = DATED_LABEL.captures(trimmed) {
        if let Some(month) = valid_month(&caps[2]) {
            return SheetLabel {
                country: caps[1].to_string(),
                month: Some(month),
                day: caps.get(3).and_then(|d| d.as_str().parse().ok()),
                year: caps[4].parse().ok(),
                tier: LabelTier::Dated,
            };
        }
    }
    if let Some(caps) = LOOSE_LABEL.captures(trimmed) {
        if let Some(month) = valid_month(&caps[2]) {
            return SheetLabel {
                country: caps[1].to_string(),
                month: Some(month),
                day: None,
                year: caps[3].parse().ok(),
                tier: LabelTier::Loose,
            };
        }
    }
    SheetLabel::verbatim(label)
}

/// "Country (Month YYYY)" when the label parses, otherwise the label unchanged.
pub fn format_sheet_label(label: &str) -> String {
    let parsed = parse_sheet_label(label);
    match (parsed.month_name(), parsed.year) {
        (Some(month), Some(year)) => format!("{} ({} {})", parsed.country, month, year),
        _ => label.to_string(),
    }
}

/// Position of the summary a sheet label refers to, if any.
pub fn resolve_summary(label: &str, summaries: &[ActionSummaryRecord]) -> Option<usize> {
    let candidate = parse_sheet_label(label).country;
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    if let Some(position) = summaries.iter().position(|s| s.country() == candidate) {
        return Some(position);
    }
    let lowered = candidate.to_lowercase();
    summaries.iter().position(|s| {
        let name = s.country().to_lowercase();
        !name.is_empty() && (lowered.contains(&name) || name.contains(&lowered))
    })
}

// ------------- Election detail -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateView {
    pub name: String,
    pub party: String,
    pub share: String,
}
impl From<&Candidate> for CandidateView {
    fn from(c: &Candidate) -> Self {
        Self {
            name: c.name.clone().unwrap_or_default(),
            party: c.party.clone().unwrap_or_default(),
            share: percent(c.share),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub heading: String,
    pub election_type: Option<String>,
    pub outcome: Outcome,
    pub outcome_label: &'static str,
    pub incumbent: CandidateView,
    pub challenger: CandidateView,
    pub electoral_system: String,
    pub notes: Option<String>,
    pub source: Option<String>,
}
impl From<&ElectionDetailRecord> for DetailView {
    fn from(d: &ElectionDetailRecord) -> Self {
        Self {
            heading: format!("{} {}", d.country(), d.year()),
            election_type: d.election_type().map(str::to_string),
            outcome: d.outcome(),
            outcome_label: d.outcome().detail_label(),
            incumbent: CandidateView::from(d.incumbent()),
            challenger: CandidateView::from(d.challenger()),
            electoral_system: d.electoral_system().unwrap_or_default().to_string(),
            notes: d.notes().map(str::to_string),
            source: d.source().map(str::to_string),
        }
    }
}

/// Exact (country, year) lookup. `None` means no detail is available.
pub fn election_detail(store: &RecordStore, index: &KeyIndex, country: &str, year: i64) -> Option<DetailView> {
    index
        .detail(country, year)
        .map(|position| DetailView::from(&store.details()[position]))
}

// ------------- Datasheet -------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOption {
    pub label: String,
    pub display: String,
}

/// One option per sheet, ordered by normalized label. Labels differing only in
/// case or spacing open the same sheet and are offered once, under the first
/// spelling met in the ledger.
pub fn sheet_options(store: &RecordStore) -> Vec<SheetOption> {
    let mut sheets: BTreeMap<String, &str> = BTreeMap::new();
    for entry in store.ledger() {
        sheets.entry(normalize_label(entry.sheet())).or_insert(entry.sheet());
    }
    sheets
        .into_values()
        .map(|label| SheetOption { label: label.to_string(), display: format_sheet_label(label) })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    Visible,
    Subtle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasheetEntry {
    pub year: Option<i64>,
    pub action: String,
    pub target: String,
    pub code: String,
    pub kind: Option<ActionKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMatch {
    pub country: String,
    pub year: i64,
    pub outcome: Outcome,
    pub regime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datasheet {
    pub label: String,
    pub title: String,
    pub entries: Vec<DatasheetEntry>,
    pub visible_count: usize,
    pub subtle_count: usize,
    pub summary: Option<SummaryMatch>,
}
impl Datasheet {
    pub fn action_count(&self) -> usize {
        self.entries.len()
    }
}

/// The coded actions of one sheet. A blank selection yields no datasheet.
pub fn datasheet(store: &RecordStore, index: &KeyIndex, label: &str) -> Option<Datasheet> {
    if label.trim().is_empty() {
        return None;
    }
    let ledger = store.ledger();
    let rows = index.ledger_rows(label);
    let entries: Vec<DatasheetEntry> = rows
        .iter()
        .map(|r| &ledger[r as usize])
        .map(|l| DatasheetEntry {
            year: l.year(),
            action: l.action().unwrap_or_default().to_string(),
            target: l.target().unwrap_or_default().to_string(),
            code: l.code().unwrap_or_default().to_string(),
            kind: if l.visible() {
                Some(ActionKind::Visible)
            } else if l.subtle() {
                Some(ActionKind::Subtle)
            } else {
                None
            },
        })
        .collect();
    let visible_count = rows.iter().filter(|&r| ledger[r as usize].visible()).count();
    let subtle_count = rows.iter().filter(|&r| ledger[r as usize].subtle()).count();
    let summary = resolve_summary(label, store.summaries()).map(|position| {
        let s = &store.summaries()[position];
        SummaryMatch {
            country: s.country().to_string(),
            year: s.year(),
            outcome: s.outcome(),
            regime_type: s.regime_type().map(str::to_string),
        }
    });
    Some(Datasheet {
        label: label.to_string(),
        title: format_sheet_label(label),
        entries,
        visible_count,
        subtle_count,
        summary,
    })
}
