//! A flexible experiment setting in TOML.
//!
//! Every key is optional; a missing file section falls back to the values used
//! for the JEDI lookup experiments.

use super::errors::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use toml;

/// Wall-clock budget of a single lookup run (one day).
pub const DEFAULT_TIMEOUT_SECS: u64 = 86_400;

/// Number of thresholds each query tree is run with.
pub const DEFAULT_THRESHOLDS_PER_TREE: usize = 4;

/// Measurements below this value are treated as noise.
pub const DEFAULT_NOISE_FLOOR: f64 = 0.009;

/// Style overrides for one algorithmic configuration.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StyleSpec {
    /// Line and marker colour as `#rrggbb`.
    pub color: Option<String>,

    /// Marker shape: `.`, `X`, `*`, `p`, `D` or `none`.
    pub marker: Option<String>,

    /// Marker size in pixels.
    pub marker_size: Option<u32>,

    /// Legend label, the column name if absent.
    pub label: Option<String>,
}

/// The experiment setting.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// Timeout of a single execution, in seconds.
    pub timeout_secs: u64,

    /// How many consecutive thresholds belong to one query tree.
    pub thresholds_per_tree: usize,

    /// Values strictly below the floor are clamped to zero.
    pub noise_floor: f64,

    /// Algorithmic configurations that are never drawn in runtime charts.
    pub excluded: Vec<String>,

    /// Width and height of rendered charts, in pixels.
    pub figure_size: (u32, u32),

    /// Per-configuration style overrides, keyed by column name.
    pub styles: BTreeMap<String, StyleSpec>,
}

impl Default for Setting {
    fn default() -> Self {
        Setting {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            thresholds_per_tree: DEFAULT_THRESHOLDS_PER_TREE,
            noise_floor: DEFAULT_NOISE_FLOOR,
            excluded: [
                "scan-baseline",
                "scan-quickjedi",
                "scan-baseline-wang",
                "scan-quickjedi-wang",
                "scan-baseline-jofilter",
                "index-quickjedi-wang",
                "index-baseline-jofilter",
            ].iter()
                .map(|s| s.to_string())
                .collect(),
            figure_size: (640, 480),
            styles: BTreeMap::new(),
        }
    }
}

impl Setting {
    /// Initialize from a file.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Setting> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .chain_err(|| format!("failed to open setting {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Setting::parse(&contents)
    }

    /// Parses a setting from TOML text.
    pub fn parse(contents: &str) -> Result<Setting> {
        let setting: Setting = toml::from_str(contents)?;
        if setting.thresholds_per_tree == 0 {
            bail!(ErrorKind::Misconfigured(
                "thresholds_per_tree must be at least 1".to_string()
            ));
        }
        Ok(setting)
    }

    /// Loads the file if one is given, the defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Setting> {
        match path {
            Some(p) => Setting::init(p),
            None => Ok(Setting::default()),
        }
    }

    /// Is this configuration excluded from runtime charts?
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|e| e == name)
    }
}
