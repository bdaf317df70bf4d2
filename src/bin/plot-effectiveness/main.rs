//! Plots how many candidates each filter stage leaves for one algorithmic
//! configuration, one chart per dataset and query tree.
extern crate jedi_experiments;
#[macro_use]
extern crate log;
extern crate structopt;

use jedi_experiments::chart::{self, Chart};
use jedi_experiments::errors::*;
use jedi_experiments::cli::normalize_args;
use jedi_experiments::PlotOpt;
use std::env;
use std::process;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "plot-effectiveness")]
#[structopt(about = "Plot candidate set sizes per threshold.")]
struct Opt {
    #[structopt(flatten)]
    plot: PlotOpt,

    /// Configuration to plot, the last column if absent.
    #[structopt(long = "algorithm")]
    algorithm: Option<String>,
}

fn run(opt: &Opt) -> Result<usize> {
    if !opt.plot.cols.is_empty() {
        warn!("--cols has no effect on effectiveness charts, use --algorithm");
    }
    opt.plot.plot_each(true, |group, _, _| {
        let chart = chart::effectiveness_chart(group, opt.algorithm.as_ref().map(|a| a.as_str()))?;
        debug!("{}-{}: result sizes {:?}", chart.dataset, chart.query_tree, chart.result);
        Ok(Chart::Bar(chart))
    })
}

fn main() {
    jedi_experiments::init_logger();
    let opt = Opt::from_iter(normalize_args(env::args()));
    debug!("{:?}", opt);

    match run(&opt) {
        Ok(n) => info!("{} effectiveness charts", n),
        Err(e) => {
            jedi_experiments::log_error_chain(&e);
            process::exit(1);
        }
    }
}
