use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::errors::*;

/// Reads a tab-separated table, skipping blank and `#`-prefixed lines.
pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).chain_err(|| format!("failed to open table {:?}", path))?;
    let reader = BufReader::new(file);

    let mut table: Vec<Vec<String>> = Vec::new();
    for line in reader.lines() {
        let line = line.chain_err(|| "error reading line from table")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            table.push(line.split('\t').map(|v| v.to_string()).collect());
        }
    }

    Ok(table)
}

/// Parses a two-column `transcript_id<TAB>score` conservation table; scores
/// are clamped to [0, 1].
pub fn read_conservation<P: AsRef<Path> + Debug>(path: &P) -> Result<HashMap<String, f64>> {
    let mut scores = HashMap::new();
    for row in read(path)? {
        if row.len() < 2 {
            return Err(format!("conservation row {:?} needs two columns", row).into());
        }

        let value: f64 = row[1]
            .trim()
            .parse()
            .chain_err(|| format!("invalid conservation score {:?}", row[1]))?;
        scores.insert(row[0].clone(), value.max(0.0).min(1.0));
    }

    Ok(scores)
}
