use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::Tier;

/// Label and value of one coin tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Denomination {
    pub label: String,
    pub value: f64,
}

impl Denomination {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// The three tiers, smallest coin first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Denominations {
    pub small: Denomination,
    pub medium: Denomination,
    pub large: Denomination,
}

impl Default for Denominations {
    /// Egyptian coins: 25 piasters, 50 piasters, 1 pound.
    fn default() -> Self {
        Self {
            small: Denomination::new("25 piasters", 0.25),
            medium: Denomination::new("50 piasters", 0.5),
            large: Denomination::new("1 pound", 1.0),
        }
    }
}

impl Denominations {
    pub fn get(&self, tier: Tier) -> &Denomination {
        match tier {
            Tier::Small => &self.small,
            Tier::Medium => &self.medium,
            Tier::Large => &self.large,
        }
    }

    /// Load from a text file with one `label,value` line per tier, smallest first.
    /// Blank lines and lines starting with `#` are ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        Self::parse(BufReader::new(file))
            .with_context(|| format!("Failed to load denominations from {}", path.display()))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut tiers = Vec::with_capacity(3);

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((label, value)) = line.rsplit_once(',') else {
                bail!(
                    "Invalid line format at line {}: '{}' (expected label,value)",
                    line_num + 1,
                    line
                );
            };
            let value = value.trim().parse::<f64>().with_context(|| {
                format!("Invalid value at line {}: '{}'", line_num + 1, value.trim())
            })?;
            tiers.push(Denomination::new(label.trim(), value));
        }

        let Ok([small, medium, large]) = <[Denomination; 3]>::try_from(tiers) else {
            bail!("expected exactly three denominations (small, medium, large)");
        };
        Ok(Self {
            small,
            medium,
            large,
        })
    }
}
