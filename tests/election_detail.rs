use election_explorer::construct::RawDatasets;
use election_explorer::datatype::Outcome;
use election_explorer::explorer::Explorer;
use serde_json::json;

fn setup() -> Explorer {
    let raw: RawDatasets = serde_json::from_value(json!({
        "elections": [
            {"country_name": "Poland", "iso3": "POL", "year": 2023, "Incumbent.won": "no"},
            {"country_name": "Hungary", "iso3": "HUN", "year": 2022, "Incumbent.won": "yes"}
        ],
        "estimates": [],
        "actionSummaries": [],
        "eventTime": [],
        "details": [
            {
                "country": "Hungary", "year": 2022, "outcome": "won", "election_type": "Parliamentary",
                "incumbent_name": "Viktor Orbán", "incumbent_party": "Fidesz", "incumbent_pct": 54.13,
                "challenger_name": "Péter Márki-Zay", "challenger_party": "United for Hungary", "challenger_pct": null,
                "electoral_system": "Mixed", "source": "https://en.wikipedia.org/wiki/2022_Hungarian_parliamentary_election"
            },
            {"country": "Zambia", "year": 2021, "outcome": "lost", "incumbent_pct": 38.7, "notes": "Turnover"},
            {"country": "Hungary", "year": 2022, "incumbent_name": "Someone Else"}
        ]
    }))
    .expect("fixture");
    Explorer::new(&raw)
}

#[test]
fn missing_detail_is_absent() {
    let explorer = setup();
    assert!(explorer.show_election_detail("Poland", 2023).is_none());
}

#[test]
fn absent_after_present_selection() {
    let explorer = setup();
    let shown = explorer.show_election_detail("Hungary", 2022);
    assert!(shown.is_some());
    // nothing from the previous selection leaks into the next one
    assert!(explorer.show_election_detail("Poland", 2023).is_none());
}

#[test]
fn detail_payload_is_formatted() {
    let explorer = setup();
    let detail = explorer.show_election_detail("Hungary", 2022).expect("detail");
    assert_eq!(detail.heading, "Hungary 2022");
    assert_eq!(detail.outcome, Outcome::Won);
    assert_eq!(detail.outcome_label, "Re-elected");
    assert_eq!(detail.election_type.as_deref(), Some("Parliamentary"));
    assert_eq!(detail.incumbent.name, "Viktor Orbán");
    assert_eq!(detail.incumbent.share, "54.1%");
    assert_eq!(detail.challenger.share, "N/A");
    assert_eq!(detail.electoral_system, "Mixed");
    assert!(detail.notes.is_none());
    assert!(detail.source.is_some());
}

#[test]
fn first_detail_wins_on_duplicate_keys() {
    let explorer = setup();
    let detail = explorer.show_election_detail("Hungary", 2022).expect("detail");
    assert_eq!(detail.incumbent.name, "Viktor Orbán");
}

#[test]
fn lookup_is_exact() {
    let explorer = setup();
    assert!(explorer.show_election_detail("hungary", 2022).is_none());
    assert!(explorer.show_election_detail("Hungary", 2018).is_none());
    let zambia = explorer.show_election_detail("Zambia", 2021).expect("detail");
    assert_eq!(zambia.outcome_label, "Defeated");
    assert_eq!(zambia.notes.as_deref(), Some("Turnover"));
    assert_eq!(zambia.incumbent.name, "");
}
