use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lines containing this marker are annotations, never price data.
pub const COMMENT_MARKER: &str = "**";

static PRICE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<printer>[^;]+?)\s*;\s*(?P<material>[^;]+?)\s*;\s*(?P<volume>[^;]*?)\s*;\s*\$\s*(?P<cost>\d[\d,]*(?:\.\d+)?|\.\d+)\s*$",
    )
    .expect("price line pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceKey {
    pub printer: String,
    pub material: String,
}

impl PriceKey {
    pub fn new(printer: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            printer: printer.into(),
            material: material.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialCostEntry {
    pub reference_volume: Option<f64>,
    pub reference_cost: f64,
}

impl MaterialCostEntry {
    /// Cost per unit volume, or `None` for cost-only entries.
    pub fn unit_cost(&self) -> Option<f64> {
        match self.reference_volume {
            Some(volume) if volume != 0.0 => Some(self.reference_cost / volume),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    entries: HashMap<PriceKey, MaterialCostEntry>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PriceKey, entry: MaterialCostEntry) -> Option<MaterialCostEntry> {
        self.entries.insert(key, entry)
    }

    pub fn get(&self, printer: &str, material: &str) -> Option<&MaterialCostEntry> {
        self.entries.get(&PriceKey::new(printer, material))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PriceKey, &MaterialCostEntry)> {
        self.entries.iter()
    }
}

/// Parses `<printer>; <material>; <volume>; $<cost>` lines. Blank lines, `**` annotations and
/// any other free text are skipped without complaint; a later line for the same key wins.
pub fn parse_price_table<'a, I>(lines: I) -> PriceTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = PriceTable::new();
    for line in lines {
        if let Some((key, entry)) = parse_price_line(line) {
            table.insert(key, entry);
        }
    }
    table
}

pub fn parse_price_line(line: &str) -> Option<(PriceKey, MaterialCostEntry)> {
    if line.trim().is_empty() || line.contains(COMMENT_MARKER) {
        return None;
    }

    let captures = PRICE_LINE.captures(line)?;
    let reference_cost = captures["cost"].replace(',', "").parse::<f64>().ok()?;
    let reference_volume = parse_volume(&captures["volume"]);

    Some((
        PriceKey::new(&captures["printer"], &captures["material"]),
        MaterialCostEntry {
            reference_volume,
            reference_cost,
        },
    ))
}

/// Keeps the digits and decimal points that precede the unit text ("1,000 cm3" -> 1000.0).
fn parse_volume(text: &str) -> Option<f64> {
    let numeric_part = text
        .find(|c: char| c.is_alphabetic())
        .map_or(text, |unit_start| &text[..unit_start]);
    let digits: String = numeric_part
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}
