// Per-country summaries of the election panel, as shaded on the map.
//
// Grouping is by ISO3 code. Records without one are left out entirely.
// Outcomes follow the panel rule: only "no" counts as lost, so missing or
// garbled outcome data is tallied as won.

use serde::Serialize;

use std::collections::HashMap;

use crate::construct::ElectionRecord;
use crate::datatype::Outcome;
use crate::lookup::OtherHasher;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    pub iso3: String,
    pub name: String,
    pub total: usize,
    pub won: usize,
    pub lost: usize,
    pub years: Vec<i64>, // encounter order
}

impl CountrySummary {
    pub fn tooltip(&self) -> String {
        let years: Vec<String> = self.years.iter().map(|y| y.to_string()).collect();
        format!(
            "{}\n{} election(s)\nWon: {}, Lost: {}\nYears: {}",
            self.name,
            self.total,
            self.won,
            self.lost,
            years.join(", ")
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CountryAggregation {
    countries: Vec<CountrySummary>, // first-encounter order
    #[serde(skip)]
    position: HashMap<String, usize, OtherHasher>,
}

impl CountryAggregation {
    pub fn get(&self, iso3: &str) -> Option<&CountrySummary> {
        self.position.get(iso3).map(|&p| &self.countries[p])
    }
    pub fn countries(&self) -> &[CountrySummary] {
        &self.countries
    }
    pub fn len(&self) -> usize {
        self.countries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

pub fn aggregate_by_country(elections: &[ElectionRecord]) -> CountryAggregation {
    let mut aggregation = CountryAggregation::default();
    for e in elections {
        let Some(iso3) = e.iso3() else { continue };
        let position = match aggregation.position.get(iso3) {
            Some(&p) => p,
            None => {
                aggregation.countries.push(CountrySummary {
                    iso3: iso3.to_string(),
                    name: e.country().to_string(),
                    total: 0,
                    won: 0,
                    lost: 0,
                    years: Vec::new(),
                });
                let p = aggregation.countries.len() - 1;
                aggregation.position.insert(iso3.to_string(), p);
                p
            }
        };
        let summary = &mut aggregation.countries[position];
        summary.total += 1;
        summary.years.push(e.year());
        match e.outcome() {
            Outcome::Lost => summary.lost += 1,
            Outcome::Won => summary.won += 1,
        }
    }
    aggregation
}
