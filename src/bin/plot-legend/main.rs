//! Draws the legend of the algorithmic configurations as a standalone strip,
//! to be placed above a grid of runtime charts.
extern crate jedi_experiments;
#[macro_use]
extern crate log;
extern crate structopt;

use jedi_experiments::errors::*;
use jedi_experiments::render;
use jedi_experiments::style::StyleTable;
use jedi_experiments::Setting;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

/// Entries per legend row.
const LEGEND_COLUMNS: usize = 5;

#[derive(StructOpt, Debug)]
#[structopt(name = "plot-legend")]
#[structopt(about = "Plot the legend of all algorithmic configurations.")]
struct Opt {
    /// Output file.
    #[structopt(short = "o", long = "output", default_value = "legend.svg")]
    output: String,

    /// Positions of configurations to leave out.
    #[structopt(short = "x", long = "exclude", use_delimiter = true,
                default_value = "0,1,2,3,4,9,10")]
    exclude: Vec<usize>,

    /// Setting file in TOML.
    #[structopt(short = "s", long = "setting", parse(from_os_str))]
    setting: Option<PathBuf>,
}

fn run(opt: &Opt) -> Result<()> {
    let setting = Setting::load_or_default(opt.setting.as_ref())?;
    let styles = StyleTable::from_setting(&setting)?;

    let entries = styles
        .configurations()
        .into_iter()
        .filter(|&(i, _)| !opt.exclude.contains(&i))
        .map(|(i, style)| {
            info!("{} : {}", i, style.label);
            style
        })
        .collect::<Vec<_>>();

    render::write_legend(&opt.output, &entries, LEGEND_COLUMNS)?;
    info!("wrote {} ({} entries)", opt.output, entries.len());
    Ok(())
}

fn main() {
    jedi_experiments::init_logger();
    let opt = Opt::from_args();
    debug!("{:?}", opt);

    if let Err(e) = run(&opt) {
        jedi_experiments::log_error_chain(&e);
        process::exit(1);
    }
}
