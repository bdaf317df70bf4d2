//! Runs the lookup executable for every combination of input file, query tree
//! and threshold.
extern crate jedi_experiments;
#[macro_use]
extern crate log;
extern crate structopt;

use jedi_experiments::errors::*;
use jedi_experiments::schema::describe_selector;
use jedi_experiments::{ProcessLauncher, Setting, SweepPlan};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "execute-lookup")]
#[structopt(about = "Execute similarity lookup queries for given parameters.")]
struct Opt {
    /// Path of the lookup executable.
    #[structopt(short = "e", long = "executable")]
    executable: String,

    /// Collection files, one run series per file.
    #[structopt(short = "i", long = "inputfiles", required = true, min_values = 1)]
    input_files: Vec<String>,

    /// Result files, parallel to the input files.
    #[structopt(short = "o", long = "outputfiles", required = true, min_values = 1)]
    output_files: Vec<String>,

    /// Thresholds, one block per query tree.
    #[structopt(short = "t", long = "thresholds", required = true, min_values = 1)]
    thresholds: Vec<i64>,

    /// Query tree indices.
    #[structopt(short = "q", long = "querytrees", required = true, min_values = 1)]
    query_trees: Vec<i64>,

    /// Algorithm selector (0 to 5).
    #[structopt(short = "a", long = "algorithms")]
    algorithms: i32,

    /// Timeout of a single run in seconds; overrides the setting.
    #[structopt(long = "timeout")]
    timeout: Option<u64>,

    /// Log the runs without starting them.
    #[structopt(long = "dry-run")]
    dry_run: bool,

    /// Setting file in TOML.
    #[structopt(short = "s", long = "setting", parse(from_os_str))]
    setting: Option<PathBuf>,
}

fn run(opt: Opt) -> Result<()> {
    let setting = Setting::load_or_default(opt.setting.as_ref())?;
    let timeout = opt.timeout.unwrap_or(setting.timeout_secs);
    info!(
        "selector {}: {}",
        opt.algorithms,
        describe_selector(opt.algorithms).unwrap_or("unknown")
    );

    let plan = SweepPlan {
        executable: opt.executable,
        inputs: opt.input_files,
        outputs: opt.output_files,
        thresholds: opt.thresholds,
        query_trees: opt.query_trees,
        algorithm: opt.algorithms,
        per_tree: setting.thresholds_per_tree,
    };
    let mut launcher = ProcessLauncher::new(Duration::from_secs(timeout));
    let report = jedi_experiments::run_sweep(&plan, &mut launcher, opt.dry_run)?;
    if !report.all_completed() {
        warn!("{} of {} runs did not complete", report.failed() + report.timed_out(), report.outcomes.len());
    }
    Ok(())
}

fn main() {
    jedi_experiments::init_logger();
    let opt = Opt::from_args();
    debug!("{:?}", opt);

    if let Err(e) = run(opt) {
        jedi_experiments::log_error_chain(&e);
        process::exit(1);
    }
}
