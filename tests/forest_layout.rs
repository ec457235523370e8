use election_explorer::construct::RawDatasets;
use election_explorer::datatype::{Covariate, RegimeGroup};
use election_explorer::explorer::Explorer;
use election_explorer::layout::{dodge_offset, Band, GroupSelection, DODGE_WIDTH};
use serde_json::{json, Value};

fn estimate(iv: &str, regime: &str, estimate: f64, significant: Value) -> Value {
    json!({
        "IV": iv, "Regime": regime, "estimate": estimate,
        "conf.low90": estimate - 0.1, "conf.high90": estimate + 0.1,
        "conf.low95": estimate - 0.2, "conf.high95": estimate + 0.2,
        "significant90": significant, "n": 120
    })
}

fn setup() -> Explorer {
    let raw: RawDatasets = serde_json::from_value(json!({
        "elections": [],
        "estimates": [
            estimate("High Visibility", "Pooled", 0.5, json!(true)),
            estimate("Scope", "Pooled", -0.25, json!("TRUE")),
            estimate("GDP Growth", "Pooled", 0.125, json!("FALSE")),
            estimate("Intercept", "Pooled", 1.0, json!(true)),
            estimate("GDP Growth", "Democracy", 0.0, json!(false)),
            estimate("High Visibility", "Democracy", 0.75, json!(true)),
            estimate("Low Visibility", "Democracy", 0.25, json!(false)),
            estimate("Scope", "Democracy", 0.5, json!(false)),
            estimate("High Visibility", "Autocracy", 0.25, json!(false)),
            estimate("Scope", "Autocracy", 0.5, json!(true)),
            estimate("GDP Growth", "Autocracy", 0.5, json!(false)),
            estimate("High Visibility", "Hybrid", 0.5, json!(false))
        ],
        "actionSummaries": [],
        "eventTime": []
    }))
    .expect("fixture");
    Explorer::new(&raw)
}

#[test]
fn three_groups_spread_around_the_row() {
    assert_eq!(DODGE_WIDTH, 0.25);
    assert_eq!(dodge_offset(0, 3, DODGE_WIDTH), -0.25);
    assert_eq!(dodge_offset(1, 3, DODGE_WIDTH), 0.0);
    assert_eq!(dodge_offset(2, 3, DODGE_WIDTH), 0.25);
    assert_eq!(dodge_offset(0, 1, DODGE_WIDTH), 0.0);
    assert_eq!(dodge_offset(1, 2, DODGE_WIDTH), 0.125);
}

#[test]
fn shared_covariate_is_dodged_per_group() {
    let explorer = setup();
    let plot = explorer.forest_plot(GroupSelection::All);
    assert_eq!(plot.groups, RegimeGroup::ALL.to_vec());
    let ys: Vec<f64> = plot
        .points
        .iter()
        .filter(|p| p.covariate == Covariate::HighVisibility)
        .map(|p| p.y)
        .collect();
    assert_eq!(ys, vec![-0.25, 0.0, 0.25]);
}

#[test]
fn positions_are_dense_per_group() {
    let explorer = setup();
    let plot = explorer.forest_plot(GroupSelection::All);
    let pooled: Vec<(Covariate, f64)> = plot
        .points
        .iter()
        .filter(|p| p.group == RegimeGroup::Pooled)
        .map(|p| (p.covariate, p.y))
        .collect();
    assert_eq!(
        pooled,
        vec![(Covariate::HighVisibility, -0.25), (Covariate::Scope, 0.75), (Covariate::GdpGrowth, 1.75)]
    );
    let democracy: Vec<(Covariate, f64)> = plot
        .points
        .iter()
        .filter(|p| p.group == RegimeGroup::Democracy)
        .map(|p| (p.covariate, p.y))
        .collect();
    // load order does not matter, the vocabulary order does
    assert_eq!(
        democracy,
        vec![
            (Covariate::HighVisibility, 0.0),
            (Covariate::LowVisibility, 1.0),
            (Covariate::Scope, 2.0),
            (Covariate::GdpGrowth, 3.0)
        ]
    );
    assert_eq!(plot.tick_labels, vec!["High Visibility", "Scope", "GDP Growth"]);
    assert_eq!(plot.tick_values, (0..10).collect::<Vec<_>>());
}

#[test]
fn single_group_is_not_offset() {
    let explorer = setup();
    let plot = explorer.forest_plot(GroupSelection::Single(RegimeGroup::Pooled));
    let ys: Vec<f64> = plot.points.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![0.0, 1.0, 2.0]);
    assert_eq!(plot.segments.len(), 6);
}

#[test]
fn intervals_share_the_point_position() {
    let explorer = setup();
    let plot = explorer.forest_plot(GroupSelection::All);
    assert_eq!(plot.segments.len(), plot.points.len() * 2);
    for point in &plot.points {
        let segments: Vec<_> = plot
            .segments
            .iter()
            .filter(|s| s.covariate == point.covariate && s.group == point.group)
            .collect();
        assert_eq!(segments.len(), 2);
        for s in segments {
            assert_eq!(s.y, point.y);
            match s.band {
                Band::Narrow => assert_eq!((s.x0, s.x1), point.interval90),
                Band::Wide => assert_eq!((s.x0, s.x1), point.interval95),
            }
        }
    }
    assert_eq!(plot.reference.x, 0.0);
    assert_eq!((plot.reference.y0, plot.reference.y1), (-0.5, 9.5));
}

#[test]
fn markers_fill_when_significant() {
    let explorer = setup();
    let plot = explorer.forest_plot(GroupSelection::Single(RegimeGroup::Pooled));
    let filled: Vec<bool> = plot.points.iter().map(|p| p.filled).collect();
    // native true, textual "TRUE", textual "FALSE"
    assert_eq!(filled, vec![true, true, false]);
}

#[test]
fn out_of_vocabulary_and_unknown_groups_are_excluded() {
    let explorer = setup();
    let plot = explorer.forest_plot(GroupSelection::All);
    assert_eq!(plot.points.len(), 10);
    // the "Intercept" row is kept in the store, only left out of the plot
    assert_eq!(explorer.store().estimates().len(), 11);
    let report = explorer.store().report().collection("estimates").unwrap();
    assert_eq!((report.loaded, report.skipped), (11, 1));
}

#[test]
fn selection_parses_from_ui_values() {
    assert_eq!("all".parse::<GroupSelection>().unwrap(), GroupSelection::All);
    assert_eq!("Autocracy".parse::<GroupSelection>().unwrap(), GroupSelection::Single(RegimeGroup::Autocracy));
    assert!("Hybrid".parse::<GroupSelection>().is_err());
}
