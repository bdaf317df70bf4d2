//! Loads the result files of one (dataset, query tree) group into an
//! aggregated frame.

use super::errors::*;
use super::frame::Frame;
use super::index::{ResultIndex, ThresholdFiles, meta_path};
use super::schema::Meta;
use csv;
use std::path::Path;

/// Options controlling how result files are read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Lines to drop at the top of each runtime file.
    pub skip_rows: usize,

    /// Values below the floor are clamped to zero.
    pub noise_floor: f64,

    /// Also read the meta companion of each runtime file. A threshold whose
    /// meta file is unreadable is then skipped.
    pub with_meta: bool,
}

/// All loadable results of one (dataset, query tree) pair.
#[derive(Debug, Clone)]
pub struct ResultGroup {
    /// Dataset name.
    pub dataset: String,

    /// Query tree index.
    pub query_tree: u32,

    /// Thresholds whose files were loaded, ascending.
    pub thresholds: Vec<i64>,

    /// Meta row of each loaded threshold, parallel to `thresholds`. Empty
    /// unless loaded with `with_meta`.
    pub metas: Vec<Meta>,

    /// Concatenated runtime tables, noise clamped.
    pub frame: Frame,
}

impl ResultGroup {
    /// Collection size recorded in the last loaded meta file, zero without
    /// meta files.
    pub fn collection_size(&self) -> f64 {
        self.metas.last().map(|m| m.collection_size).unwrap_or(0.0)
    }
}

/// Reads the first row of a meta file.
pub fn read_meta<P: AsRef<Path>>(path: P) -> Result<Meta> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    match rdr.deserialize::<Meta>().next() {
        Some(meta) => Ok(meta?),
        None => bail!("meta file {} has no data row", path.display()),
    }
}

/// Loads every threshold of a group in ascending order. A threshold whose
/// runtime file (or meta file, with `with_meta`) cannot be read is skipped.
pub fn load_group(
    dataset: &str,
    query_tree: u32,
    files: &ThresholdFiles,
    opt: LoadOptions,
) -> Result<ResultGroup> {
    let mut frames = Vec::new();
    let mut thresholds = Vec::new();
    let mut metas = Vec::new();

    for (&threshold, path) in files {
        let loaded = Frame::read_csv(path, opt.skip_rows).and_then(|frame| {
            if opt.with_meta {
                read_meta(meta_path(path)).map(|meta| (frame, Some(meta)))
            } else {
                Ok((frame, None))
            }
        });
        match loaded {
            Ok((frame, meta)) => {
                debug!(
                    "loaded {} ({} rows, {} columns)",
                    path.display(),
                    frame.rows(),
                    frame.names().len()
                );
                frames.push(frame);
                thresholds.push(threshold);
                metas.extend(meta);
            }
            Err(e) => {
                warn!("Skip file: {} ({})", path.display(), e);
            }
        }
    }

    if frames.is_empty() {
        bail!(ErrorKind::EmptyGroup(dataset.to_string(), query_tree));
    }

    let mut frame = Frame::concat(&frames);
    frame.clamp_noise(opt.noise_floor);

    Ok(ResultGroup {
        dataset: dataset.to_string(),
        query_tree: query_tree,
        thresholds: thresholds,
        metas: metas,
        frame: frame,
    })
}

/// Loads all groups of an index. Groups without any loadable file are
/// reported and left out.
pub fn load_all(index: &ResultIndex, opt: LoadOptions) -> Vec<ResultGroup> {
    index
        .groups()
        .filter_map(|(dataset, query_tree, files)| {
            match load_group(dataset, query_tree, files, opt) {
                Ok(group) => Some(group),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            }
        })
        .collect()
}

/// Fixtures shared with the tests of other modules.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::schema::Metric;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Default reading options, meta files included.
    pub const OPTS: LoadOptions = LoadOptions {
        skip_rows: 0,
        noise_floor: 0.009,
        with_meta: true,
    };

    /// Runtime files only.
    pub const RUNTIME_ONLY: LoadOptions = LoadOptions {
        skip_rows: 0,
        noise_floor: 0.009,
        with_meta: false,
    };

    /// Writes a runtime file with one column per `(name, rows)` entry and its
    /// meta companion. Returns the runtime path.
    pub fn write_result(
        dir: &TempDir,
        dataset: &str,
        threshold: i64,
        query_tree: u32,
        columns: &[(&str, [f64; 6])],
        collection_size: f64,
    ) -> PathBuf {
        let base = format!("{}-{}.000000-{}", dataset, threshold, query_tree);
        let runtime = dir.path().join(format!("{}-runtime.txt", base));
        let header = columns.iter().map(|c| c.0).collect::<Vec<_>>().join(",");
        let mut text = format!("{}\n", header);
        for row in 0..6 {
            let line = columns
                .iter()
                .map(|c| c.1[row].to_string())
                .collect::<Vec<_>>()
                .join(",");
            text.push_str(&line);
            text.push('\n');
        }
        fs::write(&runtime, text).unwrap();
        let meta = dir.path().join(format!("{}-meta.txt", base));
        fs::write(
            &meta,
            format!(
                "COLSIZE,QUERYTREEID,PARSINGTIME,LABELUNIVERSESIZE,THRESHOLD\n{},10,1.5,20,{}\n",
                collection_size, threshold
            ),
        ).unwrap();
        runtime
    }

    #[test]
    fn two_thresholds_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_result(&dir, "x", 10, 0, &[("algoA", [1., 2., 3., 4., 5., 6.])], 100.0);
        write_result(&dir, "x", 20, 0, &[("algoA", [7., 8., 9., 10., 11., 12.])], 100.0);
        let index = ResultIndex::scan(&format!("{}/", dir.path().display())).unwrap();
        let groups = load_all(&index, OPTS);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.dataset, "x");
        assert_eq!(group.query_tree, 0);
        assert_eq!(group.thresholds, vec![10, 20]);
        assert_eq!(group.frame.rows(), 12);
        assert_eq!(
            group.frame.series("algoA", Metric::Runtime).unwrap(),
            vec![6.0, 12.0]
        );
        assert_eq!(group.collection_size(), 100.0);
    }

    #[test]
    fn runtime_files_without_meta() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("x-10-0-runtime.txt"),
            "algoA\n1\n2\n3\n4\n5\n6\n",
        ).unwrap();
        fs::write(
            dir.path().join("x-20-0-runtime.txt"),
            "algoA\n7\n8\n9\n10\n11\n12\n",
        ).unwrap();
        let index = ResultIndex::scan(&format!("{}/", dir.path().display())).unwrap();

        let groups = load_all(&index, RUNTIME_ONLY);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].thresholds, vec![10, 20]);
        assert_eq!(
            groups[0].frame.series("algoA", Metric::Runtime).unwrap(),
            vec![6.0, 12.0]
        );
        assert!(groups[0].metas.is_empty());
        assert_eq!(groups[0].collection_size(), 0.0);

        // the same files carry nothing for the effectiveness chart
        assert!(load_all(&index, OPTS).is_empty());
    }

    #[test]
    fn missing_meta_skips_threshold() {
        let dir = tempfile::tempdir().unwrap();
        write_result(&dir, "x", 1, 3, &[("a", [1.; 6])], 50.0);
        let orphan = write_result(&dir, "x", 2, 3, &[("a", [2.; 6])], 50.0);
        fs::remove_file(meta_path(&orphan)).unwrap();
        let index = ResultIndex::scan(&format!("{}/", dir.path().display())).unwrap();
        let group = load_group("x", 3, index.get("x", 3).unwrap(), OPTS).unwrap();
        assert_eq!(group.thresholds, vec![1]);
        assert_eq!(group.frame.rows(), 6);
    }

    #[test]
    fn unreadable_group_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("y-1-0-runtime.txt");
        fs::write(&path, "a\nnot-a-number\n").unwrap();
        let index = ResultIndex::from_paths(vec![path]).unwrap();
        let err = load_group("y", 0, index.get("y", 0).unwrap(), OPTS).unwrap_err();
        match *err.kind() {
            ErrorKind::EmptyGroup(ref d, 0) => assert_eq!(d, "y"),
            ref k => panic!("unexpected error {:?}", k),
        }
        assert!(load_all(&index, OPTS).is_empty());
    }

    #[test]
    fn noise_is_clamped_after_concat() {
        let dir = tempfile::tempdir().unwrap();
        write_result(&dir, "z", 1, 0, &[("a", [0.001, 1., 2., 3., 4., 0.005])], 9.0);
        let index = ResultIndex::scan(&format!("{}/", dir.path().display())).unwrap();
        let group = load_group("z", 0, index.get("z", 0).unwrap(), OPTS).unwrap();
        assert_eq!(
            group.frame.column("a"),
            Some(&[0.0, 1.0, 2.0, 3.0, 4.0, 0.0][..])
        );
    }
}
