//! Election Explorer – the join-and-query engine behind a set of linked views
//! over cross-referenced election research datasets.
//!
//! Six collections are loaded once and never change afterwards:
//! * the country-year election panel ([`construct::ElectionRecord`]),
//! * bootstrap regression estimates ([`construct::CoefficientEstimate`]),
//! * the hand-coded action panel ([`construct::ActionSummaryRecord`]),
//! * the fine-grained action ledger ([`construct::ActionLedgerEntry`]),
//! * the event-time panel ([`construct::EventTimeRecord`]),
//! * free-text election details ([`construct::ElectionDetailRecord`]).
//!
//! From these the engine derives the data behind a map, a forest plot, a
//! scatter plot, a sortable table, a per-election datasheet and a per-election
//! timeline. Drawing is somebody else's business; every view is returned as
//! plain `serde`-serializable data.
//!
//! ## Modules
//! * [`construct`] – typed records, load-time validation and the [`construct::RecordStore`].
//! * [`datatype`] – canonical flags, regime groups, the covariate vocabulary and formatting.
//! * [`lookup`] – bitmap-backed lookups and the [`lookup::KeyIndex`].
//! * [`crossref`] – sheet label parsing and resolution across collections.
//! * [`aggregate`] – per-country election tallies.
//! * [`layout`] – dodge geometry, event-time series and scatter series.
//! * [`query`] – filter, search and stable sort of the panel.
//! * [`explorer`] – the [`explorer::Explorer`] facade tying it all together.
//!
//! ## Quick Start
//! ```
//! use election_explorer::{explorer::Explorer, query::QueryParams};
//! let explorer = Explorer::from_json(r#"{
//!     "elections": [{"country_name": "Poland", "iso3": "POL", "year": 2023, "Incumbent.won": "no"}],
//!     "estimates": [], "actionSummaries": [], "eventTime": []
//! }"#).unwrap();
//! let result = explorer.query(&QueryParams::default());
//! assert_eq!(result.summary_line(), "Showing 1 of 1 elections");
//! assert!(explorer.show_election_detail("Poland", 2023).is_none());
//! ```

pub mod aggregate;
pub mod construct;
pub mod crossref;
pub mod datatype;
pub mod error;
pub mod explorer;
pub mod layout;
pub mod lookup;
pub mod query;
pub mod settings;

pub use error::{ExplorerError, Result};
