//! Layout of the files written by the lookup executable.
//!
//! A runtime file has one column per algorithmic configuration and records
//! each measurement round as six consecutive rows:
//!
//! ```text
//! scan-quickjedi-jofilter,jsim-baseline,jsim-quickjedi,...
//! 1000,1000,1000,...      <- pre-candidates
//! 1000,112,112,...        <- candidates
//! 0,10,10,...             <- candidates accepted by the upper bound
//! 1000,102,102,...        <- verifications
//! 7,7,7,...               <- result size
//! 812.4,93.1,40.2,...     <- runtime in ms
//! ```
//!
//! The meta file holds one row describing the collection.

use std::fmt;

/// Number of rows one measurement round occupies.
pub const ROUND_LEN: usize = 6;

/// A metric recorded in each measurement round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Trees surviving the index lookup.
    PreCandidates,
    /// Trees surviving the candidate filters.
    Candidates,
    /// Candidates accepted through the upper bound without verification.
    UpperBound,
    /// Candidates that needed a full verification.
    Verifications,
    /// Size of the lookup result.
    ResultSize,
    /// Execution time.
    Runtime,
}

impl Metric {
    /// All metrics in file order.
    pub const ALL: [Metric; ROUND_LEN] = [
        Metric::PreCandidates,
        Metric::Candidates,
        Metric::UpperBound,
        Metric::Verifications,
        Metric::ResultSize,
        Metric::Runtime,
    ];

    /// Row of the metric within a round.
    pub fn offset(self) -> usize {
        match self {
            Metric::PreCandidates => 0,
            Metric::Candidates => 1,
            Metric::UpperBound => 2,
            Metric::Verifications => 3,
            Metric::ResultSize => 4,
            Metric::Runtime => 5,
        }
    }

    /// Name used in charts and legends.
    pub fn label(self) -> &'static str {
        match self {
            Metric::PreCandidates => "Pre-Candidates",
            Metric::Candidates => "Candidates",
            Metric::UpperBound => "Upper Bound",
            Metric::Verifications => "Verifications",
            Metric::ResultSize => "Result",
            Metric::Runtime => "Runtime",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of a meta file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Meta {
    /// Number of trees in the collection.
    #[serde(rename = "COLSIZE")]
    pub collection_size: f64,

    /// Size of the query tree.
    #[serde(rename = "QUERYTREEID", default)]
    pub query_tree_size: Option<f64>,

    /// Time spent parsing the collection.
    #[serde(rename = "PARSINGTIME", default)]
    pub parsing_time: Option<f64>,

    /// Number of distinct labels in the collection.
    #[serde(rename = "LABELUNIVERSESIZE", default)]
    pub label_universe_size: Option<f64>,

    /// Threshold the run was executed with.
    #[serde(rename = "THRESHOLD", default)]
    pub threshold: Option<f64>,
}

/// Meaning of the `-a/--algorithms` selector understood by the executable.
pub fn describe_selector(selector: i32) -> Option<&'static str> {
    match selector {
        0 => Some("all algorithms"),
        1 => Some("all algorithms using JSIM"),
        2 => Some("all algorithms using JSIM, QuickJedi"),
        3 => Some("all algorithms using JSIM, JediOrder"),
        4 => Some("all algorithms using JSIM, QuickJedi|JediOrder"),
        5 => Some("algorithm that uses JSIM, QuickJedi, JOFilter"),
        _ => None,
    }
}
