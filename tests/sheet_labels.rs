use election_explorer::construct::RawDatasets;
use election_explorer::crossref::{format_sheet_label, parse_sheet_label, resolve_summary, ActionKind, LabelTier};
use election_explorer::datatype::Outcome;
use election_explorer::explorer::Explorer;
use serde_json::json;

fn setup() -> Explorer {
    let raw: RawDatasets = serde_json::from_value(json!({
        "elections": [],
        "estimates": [],
        "actionSummaries": [
            {"country_name": "Poland", "year": 2023, "regime_type": "Electoral Democracy", "regime_group": "Democracy", "incumbent.won": 0},
            {"country_name": "South Korea", "year": 2024, "regime_type": "Liberal Democracy", "regime_group": "Democracy", "incumbent.won": 1},
            {"country_name": "Niger", "year": 2020, "regime_type": "Electoral Autocracy", "regime_group": "Autocracy", "incumbent.won": 1},
            {"country_name": "Nigeria", "year": 2023, "regime_type": "Electoral Autocracy", "regime_group": "Autocracy", "incumbent.won": 1}
        ],
        "actionLedger": [
            {"sheet_name": "Poland 10-15-2023", "year": 2023, "action": "Media capture", "target": "Public TV", "code": "M1", "visible": 1, "subtle": 0},
            {"sheet_name": "Poland 10-15-2023", "year": 2022, "action": "Court packing", "target": "Tribunal", "code": "J2", "visible": 0, "subtle": 1},
            {"sheet_name": "Atlantis 1-2020", "year": 2020, "action": "Decree", "visible": 1},
            {"sheet_name": "Poland 10-15-2023", "year": 2023, "action": "Other", "visible": 0, "subtle": 0},
            {"sheet_name": "poland  10-15-2023", "year": 2023, "action": "Late entry", "visible": 1, "subtle": 0}
        ],
        "eventTime": []
    }))
    .expect("fixture");
    Explorer::new(&raw)
}

#[test]
fn formats_known_label_shapes() {
    assert_eq!(format_sheet_label("Poland 10-15-2023"), "Poland (October 2023)");
    assert_eq!(format_sheet_label("Lesotho 6- 2017"), "Lesotho (June 2017)");
    assert_eq!(format_sheet_label("Dominican Republic 5-2020"), "Dominican Republic (May 2020)");
    assert_eq!(format_sheet_label("Chad 4 2021"), "Chad (April 2021)");
    assert_eq!(format_sheet_label("Poland 10 - 15 - 2023"), "Poland (October 2023)");
}

#[test]
fn unparsable_labels_pass_through() {
    assert_eq!(format_sheet_label("UnparsableLabel"), "UnparsableLabel");
    assert_eq!(format_sheet_label("Chad 13-2021"), "Chad 13-2021");
    assert_eq!(format_sheet_label(""), "");
    let parsed = parse_sheet_label("UnparsableLabel");
    assert_eq!(parsed.tier, LabelTier::Verbatim);
    assert_eq!(parsed.country, "UnparsableLabel");
    assert_eq!(parsed.month, None);
}

#[test]
fn dated_tier_takes_precedence() {
    // "Chad 4-2021" satisfies both the dated and the loose shape
    let parsed = parse_sheet_label("Chad 4-2021");
    assert_eq!(parsed.tier, LabelTier::Dated);
    assert_eq!((parsed.month, parsed.year), (Some(4), Some(2021)));

    let parsed = parse_sheet_label("Poland 10-15-2023");
    assert_eq!(parsed.tier, LabelTier::Dated);
    assert_eq!(parsed.country, "Poland");
    assert_eq!(parsed.day, Some(15));

    // whitespace after the dash still counts as dated
    let parsed = parse_sheet_label("Lesotho 6- 2017");
    assert_eq!(parsed.tier, LabelTier::Dated);
    assert_eq!((parsed.month, parsed.year), (Some(6), Some(2017)));

    // only a label without a dash falls through to the loose shape
    let parsed = parse_sheet_label("Chad 4 2021");
    assert_eq!(parsed.tier, LabelTier::Loose);
    assert_eq!(parsed.day, None);
}

#[test]
fn resolves_summaries_by_name() {
    let explorer = setup();
    let summaries = explorer.store().summaries();
    assert_eq!(resolve_summary("Poland 10-15-2023", summaries), Some(0));
    // containment in either direction
    assert_eq!(resolve_summary("Korea 4-10-2024", summaries), Some(1));
    assert_eq!(resolve_summary("Republic of Poland 10-2023", summaries), Some(0));
    assert_eq!(resolve_summary("Atlantis 1-2020", summaries), None);
    assert_eq!(resolve_summary("", summaries), None);
}

#[test]
fn exact_match_beats_containment() {
    let explorer = setup();
    let summaries = explorer.store().summaries();
    // "Nigeria" contains "Niger", which comes first in load order
    assert_eq!(resolve_summary("Nigeria 2-25-2023", summaries), Some(3));
    assert_eq!(resolve_summary("Niger 12-27-2020", summaries), Some(2));
}

#[test]
fn datasheet_counts_and_summary() {
    let explorer = setup();
    let sheet = explorer.datasheet("Poland 10-15-2023").expect("datasheet");
    assert_eq!(sheet.title, "Poland (October 2023)");
    // the differently spaced label normalizes to the same sheet
    assert_eq!(sheet.action_count(), 4);
    assert_eq!(sheet.visible_count, 2);
    assert_eq!(sheet.subtle_count, 1);
    assert_eq!(sheet.entries[0].action, "Media capture");
    assert_eq!(sheet.entries[0].kind, Some(ActionKind::Visible));
    assert_eq!(sheet.entries[1].kind, Some(ActionKind::Subtle));
    assert_eq!(sheet.entries[2].kind, None);
    assert_eq!(sheet.entries[2].target, "");
    let summary = sheet.summary.expect("summary resolved");
    assert_eq!(summary.outcome, Outcome::Lost);
    assert_eq!(summary.regime_type.as_deref(), Some("Electoral Democracy"));
}

#[test]
fn datasheet_without_match_omits_summary() {
    let explorer = setup();
    let sheet = explorer.datasheet("Atlantis 1-2020").expect("datasheet");
    assert_eq!(sheet.action_count(), 1);
    assert!(sheet.summary.is_none());
    assert!(explorer.datasheet("  ").is_none());
    let unknown = explorer.datasheet("Nowhere 1-1999").expect("datasheet");
    assert_eq!(unknown.action_count(), 0);
}

#[test]
fn sheet_options_are_distinct_and_sorted() {
    let explorer = setup();
    let options = explorer.sheet_options();
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    // "poland  10-15-2023" differs only in case and spacing and shares the sheet
    assert_eq!(labels, vec!["Atlantis 1-2020", "Poland 10-15-2023"]);
    let displays: Vec<&str> = options.iter().map(|o| o.display.as_str()).collect();
    assert_eq!(displays, vec!["Atlantis (January 2020)", "Poland (October 2023)"]);
    for option in &options {
        let sheet = explorer.datasheet(&option.label).expect("datasheet");
        assert_eq!(sheet.title, option.display);
    }
    assert_eq!(explorer.datasheet(&options[1].label).expect("datasheet").action_count(), 4);
}

#[test]
fn sheet_options_follow_first_spelling() {
    let raw: RawDatasets = serde_json::from_value(json!({
        "elections": [],
        "estimates": [],
        "actionSummaries": [],
        "actionLedger": [
            {"sheet_name": "zambia 8-12-2021", "visible": 1},
            {"sheet_name": "Zambia 8-12-2021", "subtle": 1},
            {"sheet_name": "Benin 4-2021", "visible": 1}
        ],
        "eventTime": []
    }))
    .expect("fixture");
    let options = Explorer::new(&raw).sheet_options();
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Benin 4-2021", "zambia 8-12-2021"]);
    assert_eq!(options[1].display, "zambia (August 2021)");
}
