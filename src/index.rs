//! Discovers result files and organizes them by dataset, query tree and
//! threshold.
//!
//! The lookup executable names its output
//! `<dataset>-<threshold>-<querytree>-runtime.txt`, where the threshold is
//! printed as a float (`2.000000`). Only the integral part is kept.

use super::errors::*;
use glob::glob;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix shared by all runtime result files.
pub const RUNTIME_SUFFIX: &str = "runtime.txt";

/// The fields encoded in a result file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultName {
    /// Dataset (first field).
    pub dataset: String,

    /// Threshold (second field, up to its first `.`).
    pub threshold: i64,

    /// Query tree index (third field).
    pub query_tree: u32,
}

impl ResultName {
    /// Parses the base name of `path`.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<ResultName> {
        let path = path.as_ref();
        let name = path.file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ErrorKind::MalformedResultName(path.display().to_string()))?;
        let fields = name.split('-').collect::<Vec<&str>>();
        if fields.len() < 3 {
            bail!(ErrorKind::MalformedResultName(name.to_string()));
        }
        let threshold = fields[1]
            .split('.')
            .next()
            .unwrap_or("")
            .parse::<i64>()
            .chain_err(|| ErrorKind::MalformedResultName(name.to_string()))?;
        let query_tree = fields[2]
            .parse::<u32>()
            .chain_err(|| ErrorKind::MalformedResultName(name.to_string()))?;
        Ok(ResultName {
            dataset: fields[0].to_string(),
            threshold: threshold,
            query_tree: query_tree,
        })
    }
}

impl fmt::Display for ResultName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}-{}", self.dataset, self.threshold, self.query_tree)
    }
}

/// Thresholds of one (dataset, query tree) group, ascending.
pub type ThresholdFiles = BTreeMap<i64, PathBuf>;

/// `dataset -> query tree -> threshold -> path`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultIndex {
    datasets: BTreeMap<String, BTreeMap<u32, ThresholdFiles>>,
}

impl ResultIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        ResultIndex::default()
    }

    /// Globs `<prefix>*runtime.txt` and indexes every match.
    pub fn scan(prefix: &str) -> Result<ResultIndex> {
        let pattern = format!("{}*{}", prefix, RUNTIME_SUFFIX);
        let mut paths = Vec::new();
        for entry in glob(&pattern)? {
            paths.push(entry?);
        }
        if paths.is_empty() {
            warn!("No result files found that matches: '{}'.", pattern);
        }
        ResultIndex::from_paths(paths)
    }

    /// Indexes the given paths in order. A later path replaces an earlier one
    /// with the same key.
    pub fn from_paths<I, P>(paths: I) -> Result<ResultIndex>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut index = ResultIndex::new();
        for p in paths {
            index.insert(p.into())?;
        }
        Ok(index)
    }

    /// Adds one file, returning the path it replaced, if any.
    pub fn insert(&mut self, path: PathBuf) -> Result<Option<PathBuf>> {
        let name = ResultName::parse(&path)?;
        trace!("indexing {} as {}", path.display(), name);
        let replaced = self.datasets
            .entry(name.dataset)
            .or_insert_with(BTreeMap::new)
            .entry(name.query_tree)
            .or_insert_with(BTreeMap::new)
            .insert(name.threshold, path);
        if let Some(ref old) = replaced {
            debug!("{} replaced by a later file", old.display());
        }
        Ok(replaced)
    }

    /// Files of one group.
    pub fn get(&self, dataset: &str, query_tree: u32) -> Option<&ThresholdFiles> {
        self.datasets.get(dataset).and_then(|q| q.get(&query_tree))
    }

    /// Iterates over all (dataset, query tree) groups in order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, u32, &ThresholdFiles)> {
        self.datasets.iter().flat_map(|(dataset, trees)| {
            trees
                .iter()
                .map(move |(&tree, files)| (dataset.as_str(), tree, files))
        })
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Path of the meta file that accompanies a runtime file. Only the file name
/// is rewritten.
pub fn meta_path(runtime: &Path) -> PathBuf {
    match runtime.file_name() {
        Some(name) => runtime.with_file_name(name.to_string_lossy().replace("runtime", "meta")),
        None => runtime.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile;

    #[test]
    fn parse_printed_float_threshold() {
        let name = ResultName::parse("out/bolzano-2.000000-17-runtime.txt").unwrap();
        assert_eq!(name.dataset, "bolzano");
        assert_eq!(name.threshold, 2);
        assert_eq!(name.query_tree, 17);
    }

    #[test]
    fn parse_rejects_non_numeric_fields() {
        assert!(ResultName::parse("a-x-2-runtime.txt").is_err());
        assert!(ResultName::parse("a-1-y-runtime.txt").is_err());
        assert!(ResultName::parse("a_runtime.txt").is_err());
    }

    #[test]
    fn groups_by_dataset_and_tree() {
        let index =
            ResultIndex::from_paths(vec!["a-1.txt-2-runtime.txt", "a-2.txt-2-runtime.txt"])
                .unwrap();
        assert_eq!(index.len(), 1);
        let files = index.get("a", 2).unwrap();
        let expected = vec![
            (1, PathBuf::from("a-1.txt-2-runtime.txt")),
            (2, PathBuf::from("a-2.txt-2-runtime.txt")),
        ];
        assert_eq!(
            files.iter().map(|(&t, p)| (t, p.clone())).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn last_write_wins() {
        let mut index = ResultIndex::new();
        assert_eq!(index.insert("d/a-1.000000-0-runtime.txt".into()).unwrap(), None);
        let replaced = index.insert("e/a-1.500000-0-runtime.txt".into()).unwrap();
        assert_eq!(replaced, Some(PathBuf::from("d/a-1.000000-0-runtime.txt")));
        assert_eq!(
            index.get("a", 0).unwrap()[&1],
            PathBuf::from("e/a-1.500000-0-runtime.txt")
        );
    }

    #[test]
    fn groups_iterate_in_order() {
        let index = ResultIndex::from_paths(vec![
            "b-1-0-runtime.txt",
            "a-3-1-runtime.txt",
            "a-1-0-runtime.txt",
        ]).unwrap();
        let groups = index
            .groups()
            .map(|(d, q, files)| (d.to_string(), q, files.len()))
            .collect::<Vec<_>>();
        assert_eq!(
            groups,
            vec![
                ("a".to_string(), 0, 1),
                ("a".to_string(), 1, 1),
                ("b".to_string(), 0, 1),
            ]
        );
    }

    #[test]
    fn scan_directory_prefix() {
        let dir = tempfile::tempdir().unwrap();
        for name in &[
            "face-1.000000-0-runtime.txt",
            "face-1.000000-0-meta.txt",
            "face-2.000000-0-runtime.txt",
            "notes.txt",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }
        let prefix = format!("{}/", dir.path().display());
        let index = ResultIndex::scan(&prefix).unwrap();
        let files = index.get("face", 0).unwrap();
        assert_eq!(files.keys().cloned().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn scan_without_matches_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/", dir.path().display());
        assert!(ResultIndex::scan(&prefix).unwrap().is_empty());
    }

    #[test]
    fn meta_companion() {
        assert_eq!(
            meta_path(Path::new("r/face-1.000000-0-runtime.txt")),
            PathBuf::from("r/face-1.000000-0-meta.txt")
        );
    }
}
