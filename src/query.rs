//! Filtering, searching and sorting of the election panel for the table view.
//!
//! The engine holds no selection state. The caller owns a [`SortState`],
//! updates it with [`SortState::select`] on every header click and passes it
//! in with each query, so every call is a pure function of its parameters and
//! the loaded data.
//!
//! Filters are conjunctive. Each active filter contributes a row set taken from
//! the [`KeyIndex`] and the sets are intersected, which leaves the surviving
//! rows in load order. Sorting is stable, so rows with equal keys keep that
//! order. Missing values form their own trailing tier in both directions.

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use std::cmp::Ordering;
use std::str::FromStr;

use crate::construct::{ElectionRecord, RecordStore};
use crate::datatype::{two_decimals, Outcome, RegimeBucket, PLACEHOLDER};
use crate::error::ExplorerError;
use crate::lookup::KeyIndex;

fn unknown(what: &str, value: &str) -> ExplorerError {
    ExplorerError::Parse { message: format!("unknown {what} '{value}'"), line: None, col: None }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegimeFilter {
    #[default]
    All,
    Democracy,
    Autocracy,
}
impl FromStr for RegimeFilter {
    type Err = ExplorerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(RegimeFilter::All),
            "democracy" => Ok(RegimeFilter::Democracy),
            "autocracy" => Ok(RegimeFilter::Autocracy),
            _ => Err(unknown("regime filter", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutcomeFilter {
    #[default]
    All,
    Won,
    Lost,
}
impl FromStr for OutcomeFilter {
    type Err = ExplorerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(OutcomeFilter::All),
            "won" => Ok(OutcomeFilter::Won),
            "lost" => Ok(OutcomeFilter::Lost),
            _ => Err(unknown("outcome filter", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SortKey {
    Country,
    Year,
    Regime,
    Outcome,
    Polyarchy,
    Visibility,
    Scope,
    Horizontal,
}
impl FromStr for SortKey {
    type Err = ExplorerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "country" => Ok(SortKey::Country),
            "year" => Ok(SortKey::Year),
            "regime" => Ok(SortKey::Regime),
            "outcome" => Ok(SortKey::Outcome),
            "polyarchy" => Ok(SortKey::Polyarchy),
            "visibility" => Ok(SortKey::Visibility),
            "scope" => Ok(SortKey::Scope),
            "horizontal" => Ok(SortKey::Horizontal),
            _ => Err(unknown("sort key", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}
impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The caller-held sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}
impl Default for SortState {
    fn default() -> Self {
        Self { key: SortKey::Year, direction: SortDirection::Descending }
    }
}
impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
    /// Selecting the active key again inverts the direction; a different key
    /// starts out ascending.
    pub fn select(self, key: SortKey) -> Self {
        if key == self.key {
            Self { key, direction: self.direction.reverse() }
        } else {
            Self { key, direction: SortDirection::Ascending }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub regime: RegimeFilter,
    pub outcome: OutcomeFilter,
    pub search: String,
    pub sort: SortState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub country: String,
    pub iso3: Option<String>,
    pub year: i64,
    pub regime: Option<String>,
    pub regime_full: String,
    pub outcome: Outcome,
    pub polyarchy: String,
    pub visibility: String,
    pub scope: String,
    pub horizontal: String,
    pub has_detail: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub rows: Vec<DisplayRow>,
    pub filtered_count: usize,
    pub total_count: usize,
}
impl QueryResult {
    pub fn summary_line(&self) -> String {
        format!("Showing {} of {} elections", self.filtered_count, self.total_count)
    }
}

// ------------- Comparison -------------
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Text(String),
    Number(f64),
}
impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => locale_compare(a, b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

// Letters carrying a stroke or other mark that canonical decomposition keeps.
fn base_letter(c: char) -> char {
    match c {
        'ł' => 'l',
        'ø' => 'o',
        'đ' | 'ð' => 'd',
        'ħ' => 'h',
        'ı' => 'i',
        'ŧ' => 't',
        _ => c,
    }
}

fn folded(s: &str) -> Vec<char> {
    s.nfd()
        .filter(|&c| !is_combining_mark(c))
        .flat_map(char::to_lowercase)
        .map(base_letter)
        .collect()
}

/// Approximates locale collation: letters compare by their base letter first,
/// ignoring accents and case, then by accent, then lowercase before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let lower = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<Vec<char>>();
    folded(a)
        .cmp(&folded(b))
        .then_with(|| lower(a).cmp(&lower(b)))
        .then_with(|| b.cmp(a))
}

/// Missing values sort after present ones whatever the direction.
fn compare_nullable(a: &Option<SortValue>, b: &Option<SortValue>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => x.compare(y),
            SortDirection::Descending => x.compare(y).reverse(),
        },
    }
}

/// Bucket name when the label falls in one, otherwise the label itself.
fn simplified_regime(e: &ElectionRecord) -> Option<String> {
    e.regime().map(|label| match RegimeBucket::classify(label) {
        Some(bucket) => bucket.name().to_string(),
        None => label.to_string(),
    })
}

fn sort_value(e: &ElectionRecord, key: SortKey) -> Option<SortValue> {
    match key {
        SortKey::Country => Some(SortValue::Text(e.country().to_string())),
        SortKey::Year => Some(SortValue::Number(e.year() as f64)),
        SortKey::Regime => simplified_regime(e).map(SortValue::Text),
        SortKey::Outcome => Some(SortValue::Text(e.outcome().label().to_string())),
        SortKey::Polyarchy => e.polyarchy().map(SortValue::Number),
        SortKey::Visibility => e.visibility().map(SortValue::Number),
        SortKey::Scope => e.scope().map(SortValue::Number),
        SortKey::Horizontal => e.horizontal().map(SortValue::Number),
    }
}

// ------------- Query -------------
pub fn query(store: &RecordStore, index: &KeyIndex, params: &QueryParams) -> QueryResult {
    let elections = store.elections();
    let mut selected = index.all_elections().clone();
    match params.regime {
        RegimeFilter::All => (),
        RegimeFilter::Democracy => selected &= index.elections_in_bucket(RegimeBucket::Democracy),
        RegimeFilter::Autocracy => selected &= index.elections_in_bucket(RegimeBucket::Autocracy),
    }
    match params.outcome {
        OutcomeFilter::All => (),
        OutcomeFilter::Won => selected &= index.elections_with_outcome(Outcome::Won),
        OutcomeFilter::Lost => selected &= index.elections_with_outcome(Outcome::Lost),
    }
    if !params.search.is_empty() {
        selected &= index.countries_containing(&params.search);
    }

    let mut keyed: Vec<(Option<SortValue>, &ElectionRecord)> = selected
        .iter()
        .map(|r| &elections[r as usize])
        .map(|e| (sort_value(e, params.sort.key), e))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_nullable(a, b, params.sort.direction));

    let rows: Vec<DisplayRow> = keyed
        .into_iter()
        .map(|(_, e)| DisplayRow {
            country: e.country().to_string(),
            iso3: e.iso3().map(str::to_string),
            year: e.year(),
            regime: simplified_regime(e),
            regime_full: e.regime().unwrap_or(PLACEHOLDER).to_string(),
            outcome: e.outcome(),
            polyarchy: two_decimals(e.polyarchy()),
            visibility: two_decimals(e.visibility()),
            scope: two_decimals(e.scope()),
            horizontal: two_decimals(e.horizontal()),
            has_detail: index.detail(e.country(), e.year()).is_some(),
        })
        .collect();
    QueryResult {
        filtered_count: rows.len(),
        total_count: elections.len(),
        rows,
    }
}
