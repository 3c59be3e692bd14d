use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

use crate::row::RawRow;

/// Reads a CSV export into raw rows, header row first. Short records are
/// accepted; their missing trailing columns simply stay absent.
pub fn read_csv(path: &Path) -> Result<Vec<RawRow>> {
    let reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    collect_rows(reader).with_context(|| format!("reading {}", path.display()))
}

pub fn read_csv_from<R: Read>(input: R) -> Result<Vec<RawRow>> {
    let reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    collect_rows(reader)
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRow>> {
    let headers = reader.headers().context("missing header row")?.clone();
    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("record {}", index + 1))?;
        let row: RawRow = headers.iter().zip(record.iter()).collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_normalized_headers() {
        let data = "GameID,Side,TeamID,Result\nG1,Blue,A,1\nG1,Red,B\n,,,\n";
        let rows = read_csv_from(data.as_bytes()).expect("valid csv");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("gameid"), Some("G1"));
        assert_eq!(rows[1].get("side"), Some("Red"));
        assert_eq!(rows[1].get("result"), None);
    }
}
