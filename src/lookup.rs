// Lookups map keys to the positions of the records carrying them.
//
// Positions are kept in roaring bitmaps, so that conjunctive filters become
// bitmap intersections and iterating a set always yields positions in load
// order. Keys are not required to be unique. Callers that need a unique match
// take the smallest position: first occurrence wins, later duplicates are
// ignored.

use core::hash::{BuildHasher, BuildHasherDefault};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use roaring::RoaringBitmap;
use seahash::SeaHasher;
use tracing::debug;

use crate::construct::RecordStore;
use crate::datatype::{Covariate, Outcome, RegimeBucket, RegimeGroup};

pub type OtherHasher = BuildHasherDefault<SeaHasher>;
pub type RowSet = RoaringBitmap;

// ------------- Lookups -------------
#[derive(Debug)]
pub struct Lookup<K, H = OtherHasher> {
    index: HashMap<K, RowSet, H>,
}
impl<K: Eq + Hash, H: BuildHasher + Default> Lookup<K, H> {
    pub fn new() -> Self {
        Self {
            index: HashMap::<K, RowSet, H>::default(),
        }
    }
    /// Builds a lookup over a collection; records for which the key function
    /// yields nothing are left out.
    pub fn build<T>(records: &[T], key: impl Fn(&T) -> Option<K>) -> Self {
        let mut lookup = Self::new();
        for (position, record) in records.iter().enumerate() {
            if let Some(k) = key(record) {
                lookup.insert(k, position as u32);
            }
        }
        lookup
    }
    pub fn insert(&mut self, key: K, row: u32) {
        self.index.entry(key).or_default().insert(row);
    }
    pub fn lookup<Q>(&self, key: &Q) -> Option<&RowSet>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key)
    }
    pub fn rows<Q>(&self, key: &Q) -> RowSet
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup(key).cloned().unwrap_or_default()
    }
    pub fn first<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let rows = self.lookup(key)?;
        if rows.len() > 1 {
            debug!(duplicates = rows.len() - 1, "duplicate key, first occurrence wins");
        }
        rows.min().map(|r| r as usize)
    }
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }
    pub fn len(&self) -> usize {
        self.index.len()
    }
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
impl<K: Eq + Hash, H: BuildHasher + Default> Default for Lookup<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-folded and whitespace-collapsed form of a sheet label.
pub fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn year_key(country: &str, year: i64) -> (String, i64) {
    (country.to_string(), year)
}

// ------------- KeyIndex -------------
/// Every lookup the views need, built once over the store.
#[derive(Debug)]
pub struct KeyIndex {
    all_elections: RowSet,
    elections_by_key: Lookup<(String, i64)>,
    elections_by_bucket: Lookup<RegimeBucket>,
    elections_by_outcome: Lookup<Outcome>,
    // lowercased country name, ordered so that prefix searches are range scans
    elections_by_country: BTreeMap<String, RowSet>,
    estimates_by_key: Lookup<(Covariate, RegimeGroup)>,
    summaries_by_key: Lookup<(String, i64)>,
    ledger_by_sheet: Lookup<String>,
    event_time_by_election: Lookup<String>,
    event_time_by_key: Lookup<(String, i64)>,
    details_by_key: Lookup<(String, i64)>,
}

impl KeyIndex {
    pub fn build(store: &RecordStore) -> Self {
        let elections = store.elections();
        let mut elections_by_country: BTreeMap<String, RowSet> = BTreeMap::new();
        for (position, e) in elections.iter().enumerate() {
            elections_by_country
                .entry(e.country().to_lowercase())
                .or_default()
                .insert(position as u32);
        }
        let index = Self {
            all_elections: (0..elections.len() as u32).collect(),
            elections_by_key: Lookup::build(elections, |e| Some(year_key(e.country(), e.year()))),
            elections_by_bucket: Lookup::build(elections, |e| e.regime().and_then(RegimeBucket::classify)),
            elections_by_outcome: Lookup::build(elections, |e| Some(e.outcome())),
            elections_by_country,
            estimates_by_key: Lookup::build(store.estimates(), |c| c.covariate().map(|v| (v, c.group()))),
            summaries_by_key: Lookup::build(store.summaries(), |s| Some(year_key(s.country(), s.year()))),
            ledger_by_sheet: Lookup::build(store.ledger(), |l| Some(normalize_label(l.sheet()))),
            event_time_by_election: Lookup::build(store.event_time(), |t| Some(t.election().to_string())),
            event_time_by_key: Lookup::build(store.event_time(), |t| Some((t.election().to_string(), t.offset()))),
            details_by_key: Lookup::build(store.details(), |d| Some(year_key(d.country(), d.year()))),
        };
        debug!(
            countries = index.elections_by_country.len(),
            sheets = index.ledger_by_sheet.len(),
            event_time_elections = index.event_time_by_election.len(),
            "key index built"
        );
        index
    }

    pub fn all_elections(&self) -> &RowSet {
        &self.all_elections
    }
    pub fn election(&self, country: &str, year: i64) -> Option<usize> {
        self.elections_by_key.first(&year_key(country, year))
    }
    pub fn elections_in_bucket(&self, bucket: RegimeBucket) -> RowSet {
        self.elections_by_bucket.rows(&bucket)
    }
    pub fn elections_with_outcome(&self, outcome: Outcome) -> RowSet {
        self.elections_by_outcome.rows(&outcome)
    }
    /// Elections whose country name starts with the given text, ignoring case.
    pub fn countries_with_prefix(&self, prefix: &str) -> RowSet {
        let prefix = prefix.to_lowercase();
        let mut rows = RowSet::new();
        for (_, set) in self
            .elections_by_country
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
        {
            rows |= set;
        }
        rows
    }
    /// Elections whose country name contains the given text, ignoring case.
    pub fn countries_containing(&self, fragment: &str) -> RowSet {
        let fragment = fragment.to_lowercase();
        let mut rows = RowSet::new();
        for (_, set) in self
            .elections_by_country
            .iter()
            .filter(|(name, _)| name.contains(&fragment))
        {
            rows |= set;
        }
        rows
    }
    pub fn estimate(&self, covariate: Covariate, group: RegimeGroup) -> Option<usize> {
        self.estimates_by_key.first(&(covariate, group))
    }
    pub fn summary(&self, country: &str, year: i64) -> Option<usize> {
        self.summaries_by_key.first(&year_key(country, year))
    }
    pub fn ledger_rows(&self, label: &str) -> RowSet {
        self.ledger_by_sheet.rows(normalize_label(label).as_str())
    }
    pub fn event_time_rows(&self, election: &str) -> RowSet {
        self.event_time_by_election.rows(election)
    }
    pub fn event_time_anchor(&self, election: &str) -> Option<usize> {
        self.event_time_by_key.first(&(election.to_string(), 0i64))
    }
    pub fn detail(&self, country: &str, year: i64) -> Option<usize> {
        self.details_by_key.first(&year_key(country, year))
    }
}
