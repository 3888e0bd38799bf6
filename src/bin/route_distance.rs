use std::env;

use anyhow::{anyhow, Context, Result};
use earthmap_engine::data::{read_scenario_from_file, scenario_from_env};
use log::info;

const DEFAULT_FROM: &str = "edinburgh";
const DEFAULT_TO: &str = "paris";

/// Usage: `route_distance [FROM TO [SCENARIO_JSON]]`
fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (from, to) = match args.as_slice() {
        [] => (DEFAULT_FROM, DEFAULT_TO),
        [from, to, ..] => (from.as_str(), to.as_str()),
        [_] => return Err(anyhow!("usage: route_distance [FROM TO [SCENARIO_JSON]]")),
    };

    let scenario = match args.get(2) {
        Some(path) => read_scenario_from_file(path)
            .with_context(|| format!("failed to read scenario from {path}"))?,
        None => scenario_from_env().context("failed to load scenario")?,
    };
    let map = scenario.build().context("failed to build network map")?;
    info!("computing route from {from} to {to}");

    let Some(route) = map
        .route(from, to)
        .with_context(|| format!("cannot route {from} -> {to}"))?
    else {
        println!("{from} -> {to}: unreachable");
        return Ok(());
    };

    for stop in &route.stops {
        match stop.link {
            Some(link) => println!(
                "  by {link:<5} to {:<12} {:>10.0} m",
                stop.name, stop.cumulative_distance
            ),
            None => println!("  start at    {}", stop.name),
        }
    }
    println!("{from} -> {to}: {:.0} m", route.total_distance());
    Ok(())
}
