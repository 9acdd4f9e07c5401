use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use dcsim_core::{solve_dc, DcReport, Netlist};

#[derive(Parser)]
#[command(name = "dcsim", version, about = "Solve the DC operating point of a JSON netlist")]
struct Cli {
    /// Netlist file, e.g. {"components": [{"type": "R", "name": "R1", ...}]}
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print the raw report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let text = fs::read_to_string(&cli.input)
        .map_err(|err| format!("failed to read {}: {err}", cli.input.display()))?;
    let netlist: Netlist =
        serde_json::from_str(&text).map_err(|err| format!("invalid netlist: {err}"))?;
    let report = solve_dc(&netlist).map_err(|err| err.to_string())?;

    if cli.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| format!("failed to serialize report: {err}"))?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &DcReport) {
    println!("node voltages:");
    for (node, voltage) in &report.node_voltages {
        println!("  {node:<12} {voltage:>14.6} V");
    }
    println!("elements:");
    for (name, element) in &report.elements {
        println!(
            "  {:<12} {:<2} {:>14.6} V {:>14.6e} A {:>14.6e} W",
            name, element.kind, element.voltage, element.current, element.power
        );
    }
    println!("total source current: {:.6e} A", report.total_current);
    match report.equivalent_resistance {
        Some(ohms) => println!("equivalent resistance: {ohms:.6} ohm"),
        None => println!("equivalent resistance: n/a"),
    }
}
