//! Geometry and ordering for the chart views.
//!
//! * [`forest_plot`] – dodged point estimates with nested interval bands.
//! * [`timeline`] – one indicator of one election on the event-time axis.
//! * [`scatter_series`] – the hand-coded panel split by outcome or regime.
//!
//! Nothing here draws anything; the output is plain data for the rendering
//! surface to consume.

use serde::Serialize;
use tracing::debug;

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::construct::{ActionSummaryRecord, RecordStore};
use crate::datatype::{Covariate, Outcome, RegimeGroup};
use crate::error::ExplorerError;
use crate::lookup::KeyIndex;

/// Vertical distance between co-located groups.
pub const DODGE_WIDTH: f64 = 0.25;

// ------------- Forest plot -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSelection {
    All,
    Single(RegimeGroup),
}
impl GroupSelection {
    pub fn groups(&self) -> Vec<RegimeGroup> {
        match self {
            GroupSelection::All => RegimeGroup::ALL.to_vec(),
            GroupSelection::Single(group) => vec![*group],
        }
    }
}
impl FromStr for GroupSelection {
    type Err = ExplorerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(GroupSelection::All)
        } else {
            s.parse::<RegimeGroup>().map(GroupSelection::Single)
        }
    }
}

/// Offset of a group around the nominal row: zero for a single group,
/// otherwise spread symmetrically by `width`.
pub fn dodge_offset(group_index: usize, groups: usize, width: f64) -> f64 {
    if groups <= 1 {
        return 0.0;
    }
    (group_index as f64 - (groups as f64 - 1.0) / 2.0) * width
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestPoint {
    pub covariate: Covariate,
    pub group: RegimeGroup,
    pub x: f64,
    pub y: f64,
    pub filled: bool,
    pub interval90: (f64, f64),
    pub interval95: (f64, f64),
    pub n: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    Narrow, // 90%
    Wide,   // 95%
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalSegment {
    pub covariate: Covariate,
    pub group: RegimeGroup,
    pub band: Band,
    pub x0: f64,
    pub x1: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestPlot {
    pub groups: Vec<RegimeGroup>,
    pub points: Vec<ForestPoint>,
    pub segments: Vec<IntervalSegment>,
    pub reference: ReferenceLine,
    pub tick_values: Vec<usize>,
    pub tick_labels: Vec<&'static str>,
}

pub fn forest_plot(store: &RecordStore, index: &KeyIndex, selection: GroupSelection) -> ForestPlot {
    let estimates = store.estimates();
    let groups = selection.groups();
    let mut points = Vec::new();
    let mut segments = Vec::new();
    let mut tick_labels = Vec::new();
    for (group_index, &group) in groups.iter().enumerate() {
        let offset = dodge_offset(group_index, groups.len(), DODGE_WIDTH);
        // positions are dense per group: absent covariates get no slot
        let present = Covariate::ALL
            .iter()
            .filter_map(|&c| index.estimate(c, group).map(|p| (c, &estimates[p])));
        for (slot, (covariate, e)) in present.enumerate() {
            let y = slot as f64 + offset;
            if group_index == 0 {
                tick_labels.push(covariate.name());
            }
            let (low95, high95) = e.interval95();
            let (low90, high90) = e.interval90();
            segments.push(IntervalSegment { covariate, group, band: Band::Wide, x0: low95, x1: high95, y });
            segments.push(IntervalSegment { covariate, group, band: Band::Narrow, x0: low90, x1: high90, y });
            points.push(ForestPoint {
                covariate,
                group,
                x: e.estimate(),
                y,
                filled: e.significant(),
                interval90: e.interval90(),
                interval95: e.interval95(),
                n: e.n(),
            });
        }
    }
    let excluded = estimates.iter().filter(|e| e.covariate().is_none()).count();
    if excluded > 0 {
        debug!(excluded, "estimates outside the covariate vocabulary left out");
    }
    let axis = Covariate::ALL.len();
    ForestPlot {
        groups,
        points,
        segments,
        reference: ReferenceLine { x: 0.0, y0: -0.5, y1: axis as f64 - 0.5 },
        tick_values: (0..axis).collect(),
        tick_labels,
    }
}

// ------------- Timeline -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub offset: i64,
    pub value: f64,
    pub year: Option<i64>,
    pub is_election: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub election: String,
    pub indicator: String,
    pub title: String,
    pub outcome: Option<Outcome>,
    pub points: Vec<TimelinePoint>,
}

impl Timeline {
    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }
    pub fn heading(&self) -> String {
        let mut heading = match self.outcome {
            Some(outcome) => format!("{} (Incumbent {})", self.title, outcome.label()),
            None => self.title.clone(),
        };
        if !self.has_data() {
            heading.push_str(" - No data available for this indicator");
        }
        heading
    }
}

fn generic_title(election: &str) -> String {
    election.replace('_', " ")
}

/// Title from the anchor row (offset 0), or the identifier itself when the
/// anchor is missing or incomplete.
fn anchor_title(store: &RecordStore, index: &KeyIndex, election: &str) -> (String, Option<Outcome>) {
    match index.event_time_anchor(election).map(|p| &store.event_time()[p]) {
        Some(anchor) => {
            let title = match (anchor.country(), anchor.year()) {
                (Some(country), Some(year)) => format!("{} ({})", country, year),
                _ => generic_title(election),
            };
            (title, Some(anchor.outcome()))
        }
        None => (generic_title(election), None),
    }
}

pub fn timeline(store: &RecordStore, index: &KeyIndex, election: &str, indicator: &str) -> Timeline {
    let rows = store.event_time();
    let mut points: Vec<TimelinePoint> = index
        .event_time_rows(election)
        .iter()
        .map(|r| &rows[r as usize])
        .filter_map(|t| {
            t.indicator(indicator).map(|value| TimelinePoint {
                offset: t.offset(),
                value,
                year: t.year(),
                is_election: t.offset() == 0,
            })
        })
        .collect();
    // stable, so repeated offsets keep their load order
    points.sort_by_key(|p| p.offset);
    let (title, outcome) = anchor_title(store, index, election);
    Timeline {
        election: election.to_string(),
        indicator: indicator.to_string(),
        title,
        outcome,
        points,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectionOption {
    pub id: String,
    pub label: String,
}

pub fn timeline_options(store: &RecordStore, index: &KeyIndex) -> Vec<ElectionOption> {
    store
        .event_time()
        .iter()
        .map(|t| t.election())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|id| ElectionOption { id: id.to_string(), label: anchor_title(store, index, id).0 })
        .collect()
}

/// The preferred election when it is on offer, otherwise the first option.
pub fn default_election<'o>(options: &'o [ElectionOption], preferred: &str) -> Option<&'o ElectionOption> {
    options.iter().find(|o| o.id == preferred).or_else(|| options.first())
}

pub fn indicators(store: &RecordStore) -> Vec<String> {
    store
        .event_time()
        .iter()
        .flat_map(|t| t.indicator_names())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ------------- Scatter -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBy {
    Outcome,
    Regime,
}
impl FromStr for ColorBy {
    type Err = ExplorerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "outcome" => Ok(ColorBy::Outcome),
            "regime" => Ok(ColorBy::Regime),
            other => Err(ExplorerError::Parse { message: format!("unknown colouring '{other}'"), line: None, col: None }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub country: String,
    pub year: i64,
    pub x: Option<f64>, // scope
    pub y: Option<f64>, // visible tactics
    pub subtle: Option<f64>,
    pub outcome: Outcome,
    pub regime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: &'static str,
    pub points: Vec<ScatterPoint>,
}

fn series(name: &'static str, summaries: &[ActionSummaryRecord], keep: impl Fn(&ActionSummaryRecord) -> bool) -> ScatterSeries {
    let points = summaries
        .iter()
        .filter(|s| keep(s))
        .map(|s| ScatterPoint {
            country: s.country().to_string(),
            year: s.year(),
            x: s.scope(),
            y: s.visible(),
            subtle: s.subtle(),
            outcome: s.outcome(),
            regime_type: s.regime_type().map(str::to_string),
        })
        .collect();
    ScatterSeries { name, points }
}

pub fn scatter_series(summaries: &[ActionSummaryRecord], color_by: ColorBy) -> Vec<ScatterSeries> {
    match color_by {
        ColorBy::Outcome => vec![
            series("Incumbent Won", summaries, |s| s.outcome() == Outcome::Won),
            series("Incumbent Lost", summaries, |s| s.outcome() == Outcome::Lost),
        ],
        ColorBy::Regime => vec![
            series("Democracy", summaries, |s| s.regime_group() == Some("Democracy")),
            series("Autocracy", summaries, |s| s.regime_group() == Some("Autocracy")),
        ],
    }
}
