//! Chart models derived from a loaded result group.
//!
//! A chart holds only data and styles; drawing lives in `render`.

use super::errors::*;
use super::loader::ResultGroup;
use super::schema::Metric;
use super::setting::Setting;
use super::style::{self, Style, StyleTable, parse_color};
use itertools::Itertools;
use plotters::style::RGBColor;
use std::fmt;

/// One configuration of a runtime chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Column the values come from.
    pub column: String,

    /// Appearance and legend label.
    pub style: Style,

    /// One value per threshold.
    pub values: Vec<f64>,
}

/// Runtime of every visible configuration against the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Dataset name.
    pub dataset: String,

    /// Query tree index.
    pub query_tree: u32,

    /// X values.
    pub thresholds: Vec<i64>,

    /// Visible configurations in column order.
    pub lines: Vec<Line>,

    /// Columns that were left out (all zero or excluded).
    pub hidden: Vec<String>,
}

/// One overplotted bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct Bars {
    /// Legend label.
    pub label: String,

    /// Fill colour.
    pub color: RGBColor,

    /// One value per threshold.
    pub values: Vec<f64>,
}

/// Filter effectiveness of one configuration against the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Dataset name.
    pub dataset: String,

    /// Query tree index.
    pub query_tree: u32,

    /// Configuration the bars describe.
    pub algorithm: String,

    /// Category labels (thresholds).
    pub categories: Vec<String>,

    /// Bars in drawing order, later ones on top.
    pub bars: Vec<Bars>,

    /// Result size per threshold. Not drawn.
    pub result: Vec<f64>,
}

/// Either kind of chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// Runtime lines.
    Line(LineChart),
    /// Effectiveness bars.
    Bar(BarChart),
}

impl Chart {
    /// Dataset the chart belongs to.
    pub fn dataset(&self) -> &str {
        match *self {
            Chart::Line(ref c) => &c.dataset,
            Chart::Bar(ref c) => &c.dataset,
        }
    }

    /// Query tree the chart belongs to.
    pub fn query_tree(&self) -> u32 {
        match *self {
            Chart::Line(ref c) => c.query_tree,
            Chart::Bar(ref c) => c.query_tree,
        }
    }

    /// `<prefix><dataset>-<querytree>.svg`. The prefix is used verbatim, so
    /// a directory needs its trailing separator.
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}{}-{}.svg", prefix, self.dataset(), self.query_tree())
    }
}

/// Pairs values with thresholds, warning when a column holds a different
/// number of rounds than there are thresholds.
fn align(column: &str, mut values: Vec<f64>, thresholds: usize) -> Vec<f64> {
    if values.len() != thresholds {
        warn!(
            "column '{}' has {} rounds for {} thresholds",
            column,
            values.len(),
            thresholds
        );
        values.truncate(thresholds);
    }
    values
}

/// Builds the runtime chart of a group.
///
/// Every column contributes its runtime series. A column is hidden if all of
/// its values are zero or the setting excludes it. With `columns`, only the
/// named columns are considered.
pub fn runtime_chart(
    group: &ResultGroup,
    setting: &Setting,
    styles: &StyleTable,
    columns: Option<&[String]>,
) -> Result<LineChart> {
    if let Some(wanted) = columns {
        for name in wanted {
            if group.frame.column(name).is_none() {
                warn!("column '{}' not found for {}", name, group.dataset);
            }
        }
    }

    let mut lines = Vec::new();
    let mut hidden = Vec::new();
    for (position, column) in group.frame.columns().iter().enumerate() {
        let name = &column.name;
        if let Some(wanted) = columns {
            if !wanted.contains(name) {
                continue;
            }
        }
        let values = align(
            name,
            group.frame.series(name, Metric::Runtime)?,
            group.thresholds.len(),
        );
        if values.iter().all(|&v| v == 0.0) {
            debug!("hiding '{}': no results", name);
            hidden.push(name.clone());
            continue;
        }
        if setting.is_excluded(name) {
            debug!("hiding '{}': excluded", name);
            hidden.push(name.clone());
            continue;
        }
        lines.push(Line {
            column: name.clone(),
            style: styles.resolve(name, position),
            values: values,
        });
    }

    Ok(LineChart {
        dataset: group.dataset.clone(),
        query_tree: group.query_tree,
        thresholds: group.thresholds.clone(),
        lines: lines,
        hidden: hidden,
    })
}

/// Builds the effectiveness chart of a group for one configuration, the last
/// column unless `algorithm` names one.
pub fn effectiveness_chart(group: &ResultGroup, algorithm: Option<&str>) -> Result<BarChart> {
    let names = group.frame.names();
    let algorithm = match algorithm {
        Some(name) => name,
        None => *names
            .last()
            .ok_or_else(|| ErrorKind::UnknownColumn("<last>".to_string()))?,
    };
    let n = group.thresholds.len();
    let metric = |m: Metric| -> Result<Vec<f64>> {
        Ok(align(algorithm, group.frame.series(algorithm, m)?, n))
    };
    let bar = |m: Metric, color: usize| -> Result<Bars> {
        Ok(Bars {
            label: m.label().to_string(),
            color: parse_color(style::BAR_COLORS[color])?,
            values: metric(m)?,
        })
    };

    let bars = vec![
        Bars {
            label: "Dataset Size".to_string(),
            color: parse_color(style::BAR_COLORS[4])?,
            values: vec![group.collection_size(); n],
        },
        bar(Metric::PreCandidates, 0)?,
        bar(Metric::Candidates, 1)?,
        bar(Metric::UpperBound, 3)?,
    ];

    Ok(BarChart {
        dataset: group.dataset.clone(),
        query_tree: group.query_tree,
        algorithm: algorithm.to_string(),
        categories: group.thresholds.iter().map(|t| t.to_string()).collect(),
        bars: bars,
        result: metric(Metric::ResultSize)?,
    })
}

fn write_row<T: fmt::Display>(f: &mut fmt::Formatter, first: T, cells: &[f64]) -> fmt::Result {
    writeln!(f, "{}\t{}", first, cells.iter().join("\t"))
}

impl fmt::Display for LineChart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "# {} - query tree {}", self.dataset, self.query_tree)?;
        writeln!(
            f,
            "threshold\t{}",
            self.lines.iter().map(|l| l.style.label.as_str()).join("\t")
        )?;
        for (i, t) in self.thresholds.iter().enumerate() {
            let row = self.lines
                .iter()
                .map(|l| l.values.get(i).cloned().unwrap_or(::std::f64::NAN))
                .collect::<Vec<_>>();
            write_row(f, t, &row)?;
        }
        Ok(())
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "# {} - query tree {} ({})",
            self.dataset, self.query_tree, self.algorithm
        )?;
        writeln!(
            f,
            "threshold\t{}\tResult",
            self.bars.iter().map(|b| b.label.as_str()).join("\t")
        )?;
        for (i, c) in self.categories.iter().enumerate() {
            let mut row = self.bars
                .iter()
                .map(|b| b.values.get(i).cloned().unwrap_or(::std::f64::NAN))
                .collect::<Vec<_>>();
            row.push(self.result.get(i).cloned().unwrap_or(::std::f64::NAN));
            write_row(f, c, &row)?;
        }
        Ok(())
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Chart::Line(ref c) => fmt::Display::fmt(c, f),
            Chart::Bar(ref c) => fmt::Display::fmt(c, f),
        }
    }
}
