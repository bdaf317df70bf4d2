//! A small column-oriented numeric table, enough to aggregate result files.

use super::errors::*;
use super::schema::{Metric, ROUND_LEN};
use csv;
use std::fs;
use std::path::Path;

/// A named column of numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header of the column.
    pub name: String,

    /// Cell values, top to bottom.
    pub values: Vec<f64>,
}

/// A table of named numeric columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Builds a frame from columns. All columns must have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Frame> {
        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(c) = columns.iter().find(|c| c.values.len() != rows) {
            bail!(
                "column '{}' has {} rows, expected {}",
                c.name,
                c.values.len(),
                rows
            );
        }
        Ok(Frame {
            columns: columns,
            rows: rows,
        })
    }

    /// Reads a CSV with a header row, skipping the first `skip_rows` lines of
    /// the file. Every cell must parse as a number.
    pub fn read_csv<P: AsRef<Path>>(path: P, skip_rows: usize) -> Result<Frame> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let body = text.lines().skip(skip_rows).collect::<Vec<_>>().join("\n");
        Frame::parse_csv(&body).chain_err(|| format!("failed to parse {}", path.display()))
    }

    /// Parses CSV text with a header row.
    pub fn parse_csv(text: &str) -> Result<Frame> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut columns = rdr.headers()?
            .iter()
            .map(|h| {
                Column {
                    name: h.to_string(),
                    values: Vec::new(),
                }
            })
            .collect::<Vec<_>>();

        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            for (col, cell) in columns.iter_mut().zip(record.iter()) {
                let v = cell.parse::<f64>()
                    .chain_err(|| format!("row {}, column '{}': '{}'", line, col.name, cell))?;
                col.values.push(v);
            }
        }
        Frame::from_columns(columns)
    }

    /// Stacks frames on top of each other. Columns are matched by name in
    /// order of first appearance; cells a frame lacks are NaN.
    pub fn concat<'a, I>(frames: I) -> Frame
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        let mut out = Frame::default();
        for frame in frames {
            for col in &frame.columns {
                if out.column(&col.name).is_none() {
                    out.columns.push(Column {
                        name: col.name.clone(),
                        values: vec![::std::f64::NAN; out.rows],
                    });
                }
            }
            for col in out.columns.iter_mut() {
                match frame.column(&col.name) {
                    Some(values) => col.values.extend_from_slice(values),
                    None => col.values.extend(::std::iter::repeat(::std::f64::NAN).take(frame.rows)),
                }
            }
            out.rows += frame.rows;
        }
        out
    }

    /// Sets every value below `floor` to zero.
    pub fn clamp_noise(&mut self, floor: f64) {
        for col in self.columns.iter_mut() {
            for v in col.values.iter_mut() {
                if *v < floor {
                    *v = 0.0;
                }
            }
        }
    }

    /// Values of a column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Column headers in order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// All columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Every `step`-th value of a column starting at `offset`.
    pub fn strided(&self, name: &str, offset: usize, step: usize) -> Result<Vec<f64>> {
        let values = self.column(name)
            .ok_or_else(|| ErrorKind::UnknownColumn(name.to_string()))?;
        Ok(values.iter().skip(offset).step_by(step).cloned().collect())
    }

    /// One value per measurement round of `metric` in a column.
    pub fn series(&self, name: &str, metric: Metric) -> Result<Vec<f64>> {
        self.strided(name, metric.offset(), ROUND_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile;

    fn frame(text: &str) -> Frame {
        Frame::parse_csv(text).unwrap()
    }

    #[test]
    fn parse_header_and_values() {
        let f = frame("a, b\n1, 2.5\n3, 4\n");
        assert_eq!(f.names(), vec!["a", "b"]);
        assert_eq!(f.rows(), 2);
        assert_eq!(f.column("b"), Some(&[2.5, 4.0][..]));
    }

    #[test]
    fn parse_rejects_text_cells() {
        assert!(Frame::parse_csv("a\nfoo\n").is_err());
    }

    #[test]
    fn concat_keeps_order_and_aligns_names() {
        let first = frame("a,b\n1,2\n");
        let second = frame("b,c\n3,4\n");
        let all = Frame::concat(vec![&first, &second]);
        assert_eq!(all.names(), vec!["a", "b", "c"]);
        assert_eq!(all.rows(), 2);
        assert_eq!(all.column("b"), Some(&[2.0, 3.0][..]));
        let a = all.column("a").unwrap();
        assert_eq!(a[0], 1.0);
        assert!(a[1].is_nan());
        let c = all.column("c").unwrap();
        assert!(c[0].is_nan());
        assert_eq!(c[1], 4.0);
    }

    #[test]
    fn clamp_below_floor_only() {
        let mut f = frame("a\n0.0089\n0.009\n-3\n12.5\n");
        f.clamp_noise(0.009);
        assert_eq!(f.column("a"), Some(&[0.0, 0.009, 0.0, 12.5][..]));
    }

    #[test]
    fn series_takes_one_value_per_round() {
        let mut text = String::from("algoA\n");
        for v in 0..12 {
            text.push_str(&format!("{}\n", v));
        }
        let f = frame(&text);
        assert_eq!(f.series("algoA", Metric::Runtime).unwrap(), vec![5.0, 11.0]);
        assert_eq!(
            f.series("algoA", Metric::PreCandidates).unwrap(),
            vec![0.0, 6.0]
        );
        assert!(f.series("algoB", Metric::Runtime).is_err());
    }

    #[test]
    fn read_csv_skips_leading_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# produced by exp-lookup\nx,y\n1,2\n").unwrap();
        let f = Frame::read_csv(file.path(), 1).unwrap();
        assert_eq!(f.names(), vec!["x", "y"]);
        assert_eq!(f.column("y"), Some(&[2.0][..]));
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let columns = vec![
            Column {
                name: "a".into(),
                values: vec![1.0],
            },
            Column {
                name: "b".into(),
                values: vec![],
            },
        ];
        assert!(Frame::from_columns(columns).is_err());
    }
}
