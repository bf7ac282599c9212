use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use efficiency_frontier::{chart::DEFAULT_OUTPUT, pyplot, FrontierChart};

/// Render the efficiency frontier of intelligence chart.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Output image; its extension selects the format
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Do not open a window to display the chart
    #[arg(long)]
    no_show: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Log filter for the `-v` count: info, then debug, then trace.
fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("efficiency_frontier=info"),
        1 => EnvFilter::new("efficiency_frontier=debug"),
        _ => EnvFilter::new("efficiency_frontier=trace"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let chart = FrontierChart::bitloops()?;
    let fig = chart.render()?;
    chart.save(&fig, &cli.output)
        .with_context(|| format!("cannot write {}", cli.output.display()))?;
    if !cli.no_show {
        if let Err(e) = pyplot::show() {
            warn!("cannot display the chart: {e}");
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_selects_filter() {
        assert_eq!(log_filter(0).to_string(), "efficiency_frontier=info");
        assert_eq!(log_filter(1).to_string(), "efficiency_frontier=debug");
        assert_eq!(log_filter(2).to_string(), "efficiency_frontier=trace");
        assert_eq!(log_filter(5).to_string(), "efficiency_frontier=trace");
    }

    #[test]
    fn defaults_to_fixed_output() {
        let cli = Cli::parse_from(["efficiency-frontier"]);
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(!cli.no_show);
        assert_eq!(cli.verbose, 0);
    }
}
