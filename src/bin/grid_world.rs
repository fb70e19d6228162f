use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use mdp_value_iteration::mdp::{build_grid_world, render_values, Engine, GRID_COLUMNS};
use tracing_subscriber::filter::LevelFilter;

/// Value iteration on the 3x3 grid world (S4 = -1, S8 = +1).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of sweeps to run in batch mode
    #[arg(short, long, default_value_t = 10)]
    sweeps: usize,

    /// Discount factor, in [0, 1]
    #[arg(short, long, default_value_t = 0.9)]
    discount: f64,

    /// Preferred transition probability, in [0, 1]
    #[arg(short, long, default_value_t = 0.7)]
    bias: f64,

    /// Perform one sweep per line read from stdin; 'q' quits
    #[arg(short, long)]
    interactive: bool,

    /// Log every sweep
    #[arg(short, long)]
    verbose: bool,
}

fn print_iteration(engine: &Engine) {
    println!("Iteration: {}", engine.sweeps_performed());
    print!("{}", render_values(engine, GRID_COLUMNS));
}

fn run(args: &Args) -> mdp_value_iteration::Result<()> {
    let mut engine = build_grid_world(args.bias, args.discount)?;

    if args.interactive {
        println!("Press enter to perform an iteration; type 'q' to quit.");
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim() == "q" {
                break;
            }
            print_iteration(&engine);
            engine.perform_iteration_step()?;
        }
    } else {
        for _ in 0..args.sweeps {
            print_iteration(&engine);
            engine.perform_iteration_step()?;
        }
        print_iteration(&engine);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let code = match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    };
    println!("Bye.");
    code
}
