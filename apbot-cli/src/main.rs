use clap::Parser;
use std::path::PathBuf;

use apbot_core::{run, WorldOptions};

#[derive(Debug, Parser)]
#[command(name = "apbot-worldgen", version, about = "APBot world generator")]
struct Args {
    #[arg(long)]
    seed: u64,

    /// Player display name for this slot.
    #[arg(long)]
    slot_name: String,

    #[arg(long)]
    num_regions: u8,

    #[arg(long)]
    min_chests_per_region: u8,

    #[arg(long)]
    max_chests_per_region: u8,

    /// Lower bound, in seconds, on the bot's wait between checks.
    #[arg(long, default_value_t = 1)]
    min_time_between_checks: u16,

    /// Upper bound, in seconds, on the bot's wait between checks.
    #[arg(long, default_value_t = 30)]
    max_time_between_checks: u16,

    #[arg(long, default_value_t = 0)]
    num_goal_items: u16,

    /// Directory the slot data (and spoiler log) is written into.
    #[arg(long)]
    output: PathBuf,

    /// Also write spoiler_log.txt next to the slot data.
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let options = WorldOptions {
        seed: args.seed,
        slot_name: args.slot_name,
        num_regions: args.num_regions,
        min_chests_per_region: args.min_chests_per_region,
        max_chests_per_region: args.max_chests_per_region,
        min_time_between_checks: args.min_time_between_checks,
        max_time_between_checks: args.max_time_between_checks,
        num_goal_items: args.num_goal_items,
    };

    if let Err(err) = run(&options, &args.output, args.debug) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
