//! Command line options shared by the plotting binaries.

use super::chart::Chart;
use super::errors::*;
use super::index::ResultIndex;
use super::loader::{self, LoadOptions, ResultGroup};
use super::render::{self, Axes, YScale};
use super::setting::Setting;
use super::style::StyleTable;
use super::utils::split_list;
use std::path::PathBuf;
use structopt::StructOpt;

/// Multi-letter flags of the historical plotting scripts, written with a
/// single dash, and the long aliases they map to.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-sr", "--sr"),
    ("-xl", "--xl"),
    ("-yl", "--yl"),
    ("-ys", "--ys"),
];

/// Rewrites single-dash multi-letter flags (`-sr 2`) into their long alias
/// (`--sr 2`). Other arguments pass through.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            match LEGACY_FLAGS.iter().find(|&&(legacy, _)| arg == legacy) {
                Some(&(_, long)) => long.to_string(),
                None => arg,
            }
        })
        .collect()
}

/// Options of `plot-runtime` and `plot-effectiveness`.
#[derive(StructOpt, Debug, Clone)]
pub struct PlotOpt {
    /// Prefix of the result files, e.g. `results/` or `results/face`.
    #[structopt(short = "i", long = "inputpath")]
    pub input_path: String,

    /// Prefix of the written charts. Without it, chart data goes to stdout.
    #[structopt(short = "o", long = "outputpath")]
    pub output_path: Option<String>,

    /// Only consider these columns.
    #[structopt(short = "c", long = "cols")]
    pub cols: Vec<String>,

    /// Lines to skip at the top of each result file.
    #[structopt(long = "skiprows", alias = "sr", default_value = "0")]
    pub skip_rows: usize,

    /// Chart title, followed by the dataset name.
    #[structopt(short = "t", long = "title")]
    pub title: Option<String>,

    /// Label of the x axis.
    #[structopt(long = "xlabel", alias = "xl", default_value = "X")]
    pub x_label: String,

    /// Label of the y axis.
    #[structopt(long = "ylabel", alias = "yl", default_value = "Y")]
    pub y_label: String,

    /// Scale of the y axis: linear, symlog or log.
    #[structopt(long = "yscale", alias = "ys", default_value = "linear")]
    pub y_scale: YScale,

    /// Draw a legend.
    #[structopt(short = "l", long = "legend")]
    pub legend: bool,

    /// Setting file in TOML.
    #[structopt(short = "s", long = "setting", parse(from_os_str))]
    pub setting: Option<PathBuf>,
}

impl PlotOpt {
    /// Column filter, if any. Accepts both `-c a b` and `-c a,b`.
    pub fn columns(&self) -> Option<Vec<String>> {
        if self.cols.is_empty() {
            None
        } else {
            Some(self.cols.iter().flat_map(|c| split_list(c)).collect())
        }
    }

    /// Axis options with the figure size of `setting`.
    pub fn axes(&self, setting: &Setting) -> Axes {
        Axes {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            y_scale: self.y_scale,
            legend: self.legend,
            size: setting.figure_size,
        }
    }

    /// How result files are read. Meta files are only read `with_meta`.
    pub fn load_options(&self, setting: &Setting, with_meta: bool) -> LoadOptions {
        LoadOptions {
            skip_rows: self.skip_rows,
            noise_floor: setting.noise_floor,
            with_meta,
        }
    }

    /// Builds one chart per result group with `build` and writes it out.
    /// Returns the number of charts.
    pub fn plot_each<F>(&self, with_meta: bool, build: F) -> Result<usize>
    where
        F: Fn(&ResultGroup, &Setting, &StyleTable) -> Result<Chart>,
    {
        let setting = Setting::load_or_default(self.setting.as_ref())?;
        let styles = StyleTable::from_setting(&setting)?;
        let axes = self.axes(&setting);

        let index = ResultIndex::scan(&self.input_path)?;
        let groups = loader::load_all(&index, self.load_options(&setting, with_meta));
        info!(
            "{} result groups over {} datasets",
            groups.len(),
            index.len()
        );

        for group in &groups {
            let chart = build(group, &setting, &styles)
                .chain_err(|| format!("cannot chart {}-{}", group.dataset, group.query_tree))?;
            match self.output_path {
                Some(ref prefix) => {
                    let path = chart.file_name(prefix);
                    render::write_svg(&chart, &path, &axes)?;
                    info!("wrote {}", path);
                }
                None => println!("{}", chart),
            }
        }
        Ok(groups.len())
    }
}
