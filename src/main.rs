///
/// Loads the dataset bundle named in the configuration and prints the initial
/// state of every view as JSON, ready for a rendering surface to pick up.
///
/// Usage: election_explorer [config file]
///
use election_explorer::explorer::Explorer;
use election_explorer::layout::{ColorBy, GroupSelection};
use election_explorer::query::QueryParams;
use election_explorer::settings::Settings;
use election_explorer::Result;

use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn run() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let settings = Settings::load(config_path.as_deref())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let explorer = Explorer::from_path(&settings.data_path)?;
    let groups = settings.coefficient_groups.parse::<GroupSelection>()?;

    let options = explorer.timeline_options();
    let election = election_explorer::layout::default_election(&options, &settings.default_election);
    let timeline = election.map(|o| explorer.timeline(&o.id, &settings.default_indicator));
    let sheets = explorer.sheet_options();
    let datasheet = sheets.first().and_then(|s| explorer.datasheet(&s.label));
    let table = explorer.query(&QueryParams::default());
    info!(summary = %table.summary_line(), "initial table");

    let scene = json!({
        "map": explorer.country_summaries(),
        "forest": explorer.forest_plot(groups),
        "scatter": explorer.scatter(ColorBy::Outcome),
        "sheets": sheets,
        "datasheet": datasheet,
        "table": table,
        "elections": options,
        "indicators": explorer.indicators(),
        "timeline": timeline,
    });
    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!(error = %e, "explorer failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
