///
/// Holds the six record collections behind the explorer.
///
/// Every collection arrives as a sequence of flat key/value maps. Each map is
/// validated once, while loading, into a typed record with explicitly optional
/// fields. Records lacking a required field are skipped (and counted in the
/// load report) rather than passed through half-filled.
///
/// Records are identified by their position within their collection. That
/// position is what the lookups in the `lookup` module keep in their bitmaps,
/// so the store never reorders anything after loading.
///
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use std::collections::BTreeMap;

use crate::datatype::{integer, numeric, significance_flag, text, unit_flag, Covariate, Outcome, RegimeGroup};
use crate::error::{ExplorerError, Result};

pub type RawRecord = Map<String, Value>;

/// The six collections as they arrive from outside. The action ledger and the
/// election details are optional and default to empty.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDatasets {
    pub elections: Vec<RawRecord>,
    pub estimates: Vec<RawRecord>,
    pub action_summaries: Vec<RawRecord>,
    #[serde(default)]
    pub action_ledger: Vec<RawRecord>,
    pub event_time: Vec<RawRecord>,
    #[serde(default)]
    pub details: Vec<RawRecord>,
}

impl RawDatasets {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| match e.classify() {
            serde_json::error::Category::Data => ExplorerError::Load(e.to_string()),
            _ => ExplorerError::from(e),
        })
    }
}

fn required_text(record: &RawRecord, field: &'static str) -> Result<String> {
    text(record.get(field)).ok_or_else(|| missing(field))
}
fn required_integer(record: &RawRecord, field: &'static str) -> Result<i64> {
    integer(record.get(field)).ok_or_else(|| missing(field))
}
fn required_number(record: &RawRecord, field: &'static str) -> Result<f64> {
    numeric(record.get(field)).ok_or_else(|| missing(field))
}
fn missing(field: &str) -> ExplorerError {
    ExplorerError::Load(format!("missing or malformed required field '{field}'"))
}

// ------------- ElectionRecord -------------
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionRecord {
    country: String,
    iso3: Option<String>,
    year: i64,
    regime: Option<String>,
    outcome: Outcome,
    polyarchy: Option<f64>,
    visibility: Option<f64>,
    scope: Option<f64>,
    horizontal: Option<f64>,
}

impl ElectionRecord {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        Ok(Self {
            country: required_text(record, "country_name")?,
            iso3: text(record.get("iso3")),
            year: required_integer(record, "year")?,
            regime: text(record.get("regime_type")),
            outcome: Outcome::from_panel_flag(record.get("Incumbent.won")),
            polyarchy: numeric(record.get("v2x_polyarchy")),
            visibility: numeric(record.get("visibility_index")),
            scope: numeric(record.get("scope_index")),
            horizontal: numeric(record.get("horizontal_constraints")),
        })
    }
    pub fn country(&self) -> &str {
        &self.country
    }
    pub fn iso3(&self) -> Option<&str> {
        self.iso3.as_deref()
    }
    pub fn year(&self) -> i64 {
        self.year
    }
    pub fn regime(&self) -> Option<&str> {
        self.regime.as_deref()
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn polyarchy(&self) -> Option<f64> {
        self.polyarchy
    }
    pub fn visibility(&self) -> Option<f64> {
        self.visibility
    }
    pub fn scope(&self) -> Option<f64> {
        self.scope
    }
    pub fn horizontal(&self) -> Option<f64> {
        self.horizontal
    }
}

// ------------- CoefficientEstimate -------------
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientEstimate {
    variable: String,
    covariate: Option<Covariate>, // None when outside the fixed vocabulary
    group: RegimeGroup,
    estimate: f64,
    low90: f64,
    high90: f64,
    low95: f64,
    high95: f64,
    significant: bool,
    n: Option<i64>,
}

impl CoefficientEstimate {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        let variable = required_text(record, "IV")?;
        let group = required_text(record, "Regime")?.parse::<RegimeGroup>()?;
        Ok(Self {
            covariate: Covariate::from_name(&variable),
            variable,
            group,
            estimate: required_number(record, "estimate")?,
            low90: required_number(record, "conf.low90")?,
            high90: required_number(record, "conf.high90")?,
            low95: required_number(record, "conf.low95")?,
            high95: required_number(record, "conf.high95")?,
            significant: significance_flag(record.get("significant90")),
            n: integer(record.get("n")),
        })
    }
    pub fn variable(&self) -> &str {
        &self.variable
    }
    pub fn covariate(&self) -> Option<Covariate> {
        self.covariate
    }
    pub fn group(&self) -> RegimeGroup {
        self.group
    }
    pub fn estimate(&self) -> f64 {
        self.estimate
    }
    pub fn interval90(&self) -> (f64, f64) {
        (self.low90, self.high90)
    }
    pub fn interval95(&self) -> (f64, f64) {
        (self.low95, self.high95)
    }
    pub fn significant(&self) -> bool {
        self.significant
    }
    pub fn n(&self) -> Option<i64> {
        self.n
    }
}

// ------------- ActionSummaryRecord -------------
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSummaryRecord {
    country: String,
    year: i64,
    regime_group: Option<String>,
    regime_type: Option<String>,
    outcome: Outcome,
    visible: Option<f64>,
    subtle: Option<f64>,
    scope: Option<f64>,
}

impl ActionSummaryRecord {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        Ok(Self {
            country: required_text(record, "country_name")?,
            year: required_integer(record, "year")?,
            regime_group: text(record.get("regime_group")),
            regime_type: text(record.get("regime_type")),
            outcome: Outcome::from_coded_flag(record.get("incumbent.won")),
            visible: numeric(record.get("visible_count")),
            subtle: numeric(record.get("subtle_count")),
            scope: numeric(record.get("scope_unique_target")),
        })
    }
    pub fn country(&self) -> &str {
        &self.country
    }
    pub fn year(&self) -> i64 {
        self.year
    }
    pub fn regime_group(&self) -> Option<&str> {
        self.regime_group.as_deref()
    }
    pub fn regime_type(&self) -> Option<&str> {
        self.regime_type.as_deref()
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn visible(&self) -> Option<f64> {
        self.visible
    }
    pub fn subtle(&self) -> Option<f64> {
        self.subtle
    }
    pub fn scope(&self) -> Option<f64> {
        self.scope
    }
}

// ------------- ActionLedgerEntry -------------
#[derive(Debug, Clone, PartialEq)]
pub struct ActionLedgerEntry {
    sheet: String,
    year: Option<i64>,
    action: Option<String>,
    target: Option<String>,
    code: Option<String>,
    visible: bool,
    subtle: bool,
}

impl ActionLedgerEntry {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        Ok(Self {
            sheet: required_text(record, "sheet_name")?,
            year: integer(record.get("year")),
            action: text(record.get("action")),
            target: text(record.get("target")),
            code: text(record.get("code")),
            visible: unit_flag(record.get("visible")),
            subtle: unit_flag(record.get("subtle")),
        })
    }
    pub fn sheet(&self) -> &str {
        &self.sheet
    }
    pub fn year(&self) -> Option<i64> {
        self.year
    }
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
    pub fn visible(&self) -> bool {
        self.visible
    }
    pub fn subtle(&self) -> bool {
        self.subtle
    }
}

// ------------- EventTimeRecord -------------
// columns that are part of the row's identity rather than indicators
const EVENT_TIME_RESERVED: [&str; 6] = ["election_id", "country_name", "iso3", "year", "timetotreat", "Incumbent.won"];

#[derive(Debug, Clone, PartialEq)]
pub struct EventTimeRecord {
    election: String,
    country: Option<String>,
    year: Option<i64>,
    offset: i64,
    outcome: Outcome,
    indicators: BTreeMap<String, f64>,
}

impl EventTimeRecord {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        let indicators = record
            .iter()
            .filter(|(k, _)| !EVENT_TIME_RESERVED.contains(&k.as_str()))
            .filter_map(|(k, v)| numeric(Some(v)).map(|n| (k.clone(), n)))
            .collect();
        Ok(Self {
            election: required_text(record, "election_id")?,
            country: text(record.get("country_name")),
            year: integer(record.get("year")),
            offset: required_integer(record, "timetotreat")?,
            outcome: Outcome::from_panel_flag(record.get("Incumbent.won")),
            indicators,
        })
    }
    pub fn election(&self) -> &str {
        &self.election
    }
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
    pub fn year(&self) -> Option<i64> {
        self.year
    }
    pub fn offset(&self) -> i64 {
        self.offset
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.indicators.get(name).copied()
    }
    pub fn indicator_names(&self) -> impl Iterator<Item = &str> {
        self.indicators.keys().map(String::as_str)
    }
}

// ------------- ElectionDetailRecord -------------
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: Option<String>,
    pub party: Option<String>,
    pub share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElectionDetailRecord {
    country: String,
    year: i64,
    outcome: Outcome,
    election_type: Option<String>,
    incumbent: Candidate,
    challenger: Candidate,
    electoral_system: Option<String>,
    notes: Option<String>,
    source: Option<String>,
}

impl ElectionDetailRecord {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        Ok(Self {
            country: required_text(record, "country")?,
            year: required_integer(record, "year")?,
            outcome: Outcome::from_detail_flag(record.get("outcome")),
            election_type: text(record.get("election_type")),
            incumbent: Candidate {
                name: text(record.get("incumbent_name")),
                party: text(record.get("incumbent_party")),
                share: numeric(record.get("incumbent_pct")),
            },
            challenger: Candidate {
                name: text(record.get("challenger_name")),
                party: text(record.get("challenger_party")),
                share: numeric(record.get("challenger_pct")),
            },
            electoral_system: text(record.get("electoral_system")),
            notes: text(record.get("notes")),
            source: text(record.get("source")),
        })
    }
    pub fn country(&self) -> &str {
        &self.country
    }
    pub fn year(&self) -> i64 {
        self.year
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn election_type(&self) -> Option<&str> {
        self.election_type.as_deref()
    }
    pub fn incumbent(&self) -> &Candidate {
        &self.incumbent
    }
    pub fn challenger(&self) -> &Candidate {
        &self.challenger
    }
    pub fn electoral_system(&self) -> Option<&str> {
        self.electoral_system.as_deref()
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

// ------------- RecordStore -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub name: &'static str,
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub collections: Vec<CollectionReport>,
}
impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.collections.iter().map(|c| c.skipped).sum()
    }
    pub fn collection(&self, name: &str) -> Option<&CollectionReport> {
        self.collections.iter().find(|c| c.name == name)
    }
}

fn keep_valid<T>(
    name: &'static str,
    raw: &[RawRecord],
    convert: fn(&RawRecord) -> Result<T>,
    report: &mut LoadReport,
) -> Vec<T> {
    let mut kept = Vec::with_capacity(raw.len());
    let mut skipped = 0;
    for (position, record) in raw.iter().enumerate() {
        match convert(record) {
            Ok(r) => kept.push(r),
            Err(e) => {
                skipped += 1;
                warn!(collection = name, position, error = %e, "skipping record");
            }
        }
    }
    report.collections.push(CollectionReport { name, loaded: kept.len(), skipped });
    kept
}

/// Owns the loaded collections for the lifetime of the process.
#[derive(Debug)]
pub struct RecordStore {
    elections: Vec<ElectionRecord>,
    estimates: Vec<CoefficientEstimate>,
    summaries: Vec<ActionSummaryRecord>,
    ledger: Vec<ActionLedgerEntry>,
    event_time: Vec<EventTimeRecord>,
    details: Vec<ElectionDetailRecord>,
    report: LoadReport,
}

impl RecordStore {
    pub fn load(raw: &RawDatasets) -> Self {
        let mut report = LoadReport::default();
        let store = Self {
            elections: keep_valid("elections", &raw.elections, ElectionRecord::from_record, &mut report),
            estimates: keep_valid("estimates", &raw.estimates, CoefficientEstimate::from_record, &mut report),
            summaries: keep_valid("actionSummaries", &raw.action_summaries, ActionSummaryRecord::from_record, &mut report),
            ledger: keep_valid("actionLedger", &raw.action_ledger, ActionLedgerEntry::from_record, &mut report),
            event_time: keep_valid("eventTime", &raw.event_time, EventTimeRecord::from_record, &mut report),
            details: keep_valid("details", &raw.details, ElectionDetailRecord::from_record, &mut report),
            report,
        };
        info!(
            elections = store.elections.len(),
            estimates = store.estimates.len(),
            summaries = store.summaries.len(),
            ledger = store.ledger.len(),
            event_time = store.event_time.len(),
            details = store.details.len(),
            skipped = store.report.skipped(),
            "datasets loaded"
        );
        store
    }
    pub fn elections(&self) -> &[ElectionRecord] {
        &self.elections
    }
    pub fn estimates(&self) -> &[CoefficientEstimate] {
        &self.estimates
    }
    pub fn summaries(&self) -> &[ActionSummaryRecord] {
        &self.summaries
    }
    pub fn ledger(&self) -> &[ActionLedgerEntry] {
        &self.ledger
    }
    pub fn event_time(&self) -> &[EventTimeRecord] {
        &self.event_time
    }
    pub fn details(&self) -> &[ElectionDetailRecord] {
        &self.details
    }
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}
