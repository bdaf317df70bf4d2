//! Experiment tooling for the JEDI similarity lookup.
//!
//! This crate drives the `exp-lookup` executable over a parameter space
//! (`sweep`) and turns the result files it writes into runtime and filter
//! effectiveness charts (`index`, `loader`, `chart`, `render`).
//!
//! Result files are read-only here; their layout is described in `schema`.
#![recursion_limit = "1024"]
#![deny(missing_docs)]

extern crate chrono;
extern crate csv;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
extern crate glob;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate plotters;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate structopt;
extern crate toml;

#[cfg(test)]
extern crate tempfile;

#[allow(missing_docs)]
pub mod errors;
mod setting;
pub use setting::{Setting, StyleSpec};
pub mod schema;
pub mod index;
pub mod frame;
pub mod loader;
pub mod style;
pub mod chart;
pub mod render;
pub mod launcher;
pub mod sweep;
pub mod cli;
mod utils;
pub use utils::{init_logger, log_error_chain};

pub use chart::Chart;
pub use cli::PlotOpt;
pub use index::ResultIndex;
pub use launcher::{Launch, ProcessLauncher};
pub use sweep::{SweepPlan, SweepReport, SweepTask, TaskOutcome, run_sweep};
