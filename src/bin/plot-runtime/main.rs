//! Plots the runtime of every algorithmic configuration against the
//! threshold, one chart per dataset and query tree.
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
#[structopt(name = "plot-runtime")]
#[structopt(about = "Plot lookup runtime per threshold.")]
struct Opt {
    #[structopt(flatten)]
    plot: PlotOpt,
}

fn run(opt: &Opt) -> Result<usize> {
    let columns = opt.plot.columns();
    opt.plot.plot_each(false, |group, setting, styles| {
        let chart = chart::runtime_chart(group, setting, styles, columns.as_ref().map(|c| c.as_slice()))?;
        if !chart.hidden.is_empty() {
            info!("{}-{}: hidden {:?}", chart.dataset, chart.query_tree, chart.hidden);
        }
        Ok(Chart::Line(chart))
    })
}

fn main() {
    jedi_experiments::init_logger();
    let opt = Opt::from_iter(normalize_args(env::args()));
    debug!("{:?}", opt);

    match run(&opt) {
        Ok(n) => info!("{} runtime charts", n),
        Err(e) => {
            jedi_experiments::log_error_chain(&e);
            process::exit(1);
        }
    }
}
