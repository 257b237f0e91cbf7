use clap::{Parser, Subcommand};

use self::{estimate::EstimateArg, optimize::OptimizeArg};

mod estimate;
mod optimize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Show debug output, including per-generation fitness summaries
    #[arg(short, long, global = true)]
    debug: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Estimate model parameters from training data
    Estimate(#[clap(flatten)] EstimateArg),
    /// Optimize a training plan for known model parameters
    Optimize(#[clap(flatten)] OptimizeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.debug);
    match &args.mode {
        Mode::Estimate(arg) => estimate::run(arg)?,
        Mode::Optimize(arg) => optimize::run(arg)?,
    }
    Ok(())
}

fn init_logger(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
