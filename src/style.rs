//! Appearance of algorithmic configurations in charts.
//!
//! Styles are looked up by column name. Columns the table does not know get
//! the positional palette, indexed by column position.

use super::errors::*;
use super::setting::{Setting, StyleSpec};
use plotters::style::RGBColor;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Palette of the effectiveness charts.
pub const BAR_COLORS: [&str; 6] = [
    "#ca6680", "#78c0dd", "#63a375", "#946592", "#e8a77c", "#4f6ece"
];

/// Positional palette of the runtime charts, one entry per configuration.
const LINE_COLORS: [&str; 12] = [
    "#ca6680", "#e8a77c", "#946592", "#4f6ece", "#e8a77c", "#63a375",
    "#ca6680", "#e8a77c", "#946592", "#4f6ece", "#e8a77c", "#78c0dd",
];
const LINE_MARKERS: [Marker; 12] = [
    Marker::Dot, Marker::Dot, Marker::Dot, Marker::Dot, Marker::Dot, Marker::Cross,
    Marker::Star, Marker::Pentagon, Marker::Dot, Marker::Dot, Marker::Dot, Marker::Diamond,
];
const LINE_MARKER_SIZES: [u32; 12] = [0, 0, 0, 0, 0, 15, 20, 20, 30, 0, 0, 15];

/// The twelve configurations of the JEDI lookup study, in column order, with
/// their legend labels.
pub const CONFIGURATIONS: [(&str, &str); 12] = [
    ("scan-baseline", "Scan, Baseline"),
    ("scan-quickjedi", "Scan, QuickJEDI"),
    ("scan-baseline-wang", "Scan, Baseline, Wang"),
    ("scan-quickjedi-wang", "Scan, QuickJEDI, Wang"),
    ("scan-baseline-jofilter", "Scan, Baseline, JOFilter"),
    ("scan-quickjedi-jofilter", "Scan, QuickJEDI, JOFilter"),
    ("index-baseline", "JSIM, Baseline"),
    ("index-quickjedi", "JSIM, QuickJEDI"),
    ("index-baseline-wang", "JSIM, Baseline, Wang"),
    ("index-quickjedi-wang", "JSIM, QuickJEDI, Wang"),
    ("index-baseline-jofilter", "JSIM, Baseline, JOFilter"),
    ("index-quickjedi-jofilter", "JSIM, QuickJEDI, JOFilter"),
];

/// Marker drawn on each data point of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// No marker.
    None,
    /// Filled circle (`.`).
    Dot,
    /// Cross (`X`).
    Cross,
    /// Triangle (`*`).
    Star,
    /// Hollow circle (`p`).
    Pentagon,
    /// Square (`D`).
    Diamond,
}

impl FromStr for Marker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Marker> {
        match s {
            "" | "none" => Ok(Marker::None),
            "." | "o" => Ok(Marker::Dot),
            "X" | "x" => Ok(Marker::Cross),
            "*" => Ok(Marker::Star),
            "p" => Ok(Marker::Pentagon),
            "D" | "d" => Ok(Marker::Diamond),
            _ => bail!(ErrorKind::InvalidStyle(format!("unknown marker '{}'", s))),
        }
    }
}

/// Parses `#rrggbb`.
pub fn parse_color(s: &str) -> Result<RGBColor> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() || !s.starts_with('#') {
        bail!(ErrorKind::InvalidStyle(format!("bad colour '{}'", s)));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .chain_err(|| ErrorKind::InvalidStyle(format!("bad colour '{}'", s)))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// How one series is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Legend label.
    pub label: String,

    /// Line and marker colour.
    pub color: RGBColor,

    /// Marker shape.
    pub marker: Marker,

    /// Marker size in pixels, zero hides the marker.
    pub marker_size: u32,
}

/// Resolves column names to styles.
#[derive(Debug, Clone)]
pub struct StyleTable {
    named: BTreeMap<String, Style>,
}

impl Default for StyleTable {
    fn default() -> Self {
        let named = CONFIGURATIONS
            .iter()
            .enumerate()
            .map(|(i, &(name, label))| {
                let mut style = positional(i, name);
                style.label = label.to_string();
                (name.to_string(), style)
            })
            .collect();
        StyleTable { named: named }
    }
}

/// Style of the `i`-th column under the positional palette.
pub fn positional(i: usize, name: &str) -> Style {
    let color = LINE_COLORS[i % LINE_COLORS.len()];
    Style {
        label: name.to_string(),
        // palette entries are literals checked by the tests below
        color: parse_color(color).unwrap_or(RGBColor(0, 0, 0)),
        marker: LINE_MARKERS[i % LINE_MARKERS.len()],
        marker_size: LINE_MARKER_SIZES[i % LINE_MARKER_SIZES.len()],
    }
}

impl StyleTable {
    /// The built-in table with the overrides of a setting applied.
    pub fn from_setting(setting: &Setting) -> Result<StyleTable> {
        let mut table = StyleTable::default();
        for (name, spec) in &setting.styles {
            table.apply(name, spec)?;
        }
        Ok(table)
    }

    /// Applies an override. Unknown names start from the first palette entry.
    pub fn apply(&mut self, name: &str, spec: &StyleSpec) -> Result<()> {
        let mut style = self.named
            .get(name)
            .cloned()
            .unwrap_or_else(|| positional(0, name));
        if let Some(ref c) = spec.color {
            style.color = parse_color(c)?;
        }
        if let Some(ref m) = spec.marker {
            style.marker = m.parse()?;
        }
        if let Some(size) = spec.marker_size {
            style.marker_size = size;
        }
        if let Some(ref label) = spec.label {
            style.label = label.clone();
        }
        self.named.insert(name.to_string(), style);
        Ok(())
    }

    /// Style of the column `name` found at `position`.
    pub fn resolve(&self, name: &str, position: usize) -> Style {
        match self.named.get(name) {
            Some(style) => style.clone(),
            None => positional(position, name),
        }
    }

    /// Styles of the built-in configurations in column order.
    pub fn configurations(&self) -> Vec<(usize, Style)> {
        CONFIGURATIONS
            .iter()
            .enumerate()
            .map(|(i, &(name, _))| (i, self.resolve(name, i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_are_valid_colours() {
        for c in LINE_COLORS.iter().chain(BAR_COLORS.iter()) {
            assert!(parse_color(c).is_ok(), "{}", c);
        }
    }

    #[test]
    fn parse_colours() {
        assert_eq!(parse_color("#ca6680").unwrap(), RGBColor(0xca, 0x66, 0x80));
        assert!(parse_color("ca6680").is_err());
        assert!(parse_color("#ca66").is_err());
        assert!(parse_color("#zz6680").is_err());
    }

    #[test]
    fn parse_markers() {
        assert_eq!("X".parse::<Marker>().unwrap(), Marker::Cross);
        assert_eq!("none".parse::<Marker>().unwrap(), Marker::None);
        assert!("?".parse::<Marker>().is_err());
    }

    #[test]
    fn named_style_ignores_position() {
        let table = StyleTable::default();
        let a = table.resolve("index-quickjedi-jofilter", 0);
        let b = table.resolve("index-quickjedi-jofilter", 7);
        assert_eq!(a, b);
        assert_eq!(a.label, "JSIM, QuickJEDI, JOFilter");
        assert_eq!(a.marker, Marker::Diamond);
        assert_eq!(a.marker_size, 15);
    }

    #[test]
    fn unknown_names_use_position() {
        let table = StyleTable::default();
        let s = table.resolve("algoA", 5);
        assert_eq!(s.label, "algoA");
        assert_eq!(s.marker, Marker::Cross);
        assert_eq!(s.color, parse_color("#63a375").unwrap());
        let wrapped = table.resolve("algoB", 17);
        assert_eq!(wrapped, positional(5, "algoB"));
    }

    #[test]
    fn overrides_from_setting() {
        let mut setting = Setting::default();
        setting.styles.insert(
            "jsim-quickjedi".to_string(),
            StyleSpec {
                color: Some("#010203".to_string()),
                marker: Some("*".to_string()),
                marker_size: None,
                label: Some("QuickJEDI".to_string()),
            },
        );
        let table = StyleTable::from_setting(&setting).unwrap();
        let s = table.resolve("jsim-quickjedi", 9);
        assert_eq!(s.color, RGBColor(1, 2, 3));
        assert_eq!(s.marker, Marker::Star);
        assert_eq!(s.label, "QuickJEDI");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut setting = Setting::default();
        setting.styles.insert(
            "x".to_string(),
            StyleSpec {
                color: Some("red".to_string()),
                ..StyleSpec::default()
            },
        );
        assert!(StyleTable::from_setting(&setting).is_err());
    }
}
