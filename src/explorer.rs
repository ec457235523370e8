use std::fs;
use std::path::Path;

use tracing::info;

use crate::aggregate::{aggregate_by_country, CountryAggregation};
use crate::construct::{RawDatasets, RecordStore};
use crate::crossref::{self, Datasheet, DetailView, SheetOption};
use crate::error::Result;
use crate::layout::{self, ColorBy, ElectionOption, ForestPlot, GroupSelection, ScatterSeries, Timeline};
use crate::lookup::KeyIndex;
use crate::query::{self, QueryParams, QueryResult};

/// Owns the loaded store and its index, and answers every view against them.
///
/// Built once; nothing it hands out can mutate the underlying records.
#[derive(Debug)]
pub struct Explorer {
    store: RecordStore,
    index: KeyIndex,
}

impl Explorer {
    pub fn new(raw: &RawDatasets) -> Self {
        let store = RecordStore::load(raw);
        let index = KeyIndex::build(&store);
        Self { store, index }
    }
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(&RawDatasets::from_json(json)?))
    }
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "reading dataset bundle");
        Self::from_json(&fs::read_to_string(path)?)
    }
    pub fn store(&self) -> &RecordStore {
        &self.store
    }
    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    // map
    pub fn country_summaries(&self) -> CountryAggregation {
        aggregate_by_country(self.store.elections())
    }

    // forest plot
    pub fn forest_plot(&self, selection: GroupSelection) -> ForestPlot {
        layout::forest_plot(&self.store, &self.index, selection)
    }

    // scatter
    pub fn scatter(&self, color_by: ColorBy) -> Vec<ScatterSeries> {
        layout::scatter_series(self.store.summaries(), color_by)
    }

    // datasheets
    pub fn sheet_options(&self) -> Vec<SheetOption> {
        crossref::sheet_options(&self.store)
    }
    pub fn datasheet(&self, label: &str) -> Option<Datasheet> {
        crossref::datasheet(&self.store, &self.index, label)
    }

    // table
    pub fn query(&self, params: &QueryParams) -> QueryResult {
        query::query(&self.store, &self.index, params)
    }
    pub fn show_election_detail(&self, country: &str, year: i64) -> Option<DetailView> {
        crossref::election_detail(&self.store, &self.index, country, year)
    }

    // timeline
    pub fn timeline_options(&self) -> Vec<ElectionOption> {
        layout::timeline_options(&self.store, &self.index)
    }
    pub fn indicators(&self) -> Vec<String> {
        layout::indicators(&self.store)
    }
    pub fn timeline(&self, election: &str, indicator: &str) -> Timeline {
        layout::timeline(&self.store, &self.index, election, indicator)
    }
}
