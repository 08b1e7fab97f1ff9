use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{EngineError, Result};

use super::CsvRow;

const UTF8_BOM: char = '\u{feff}';

/// Parsed CSV table, optionally backed by a file it can be saved back to.
#[derive(Debug, Clone)]
pub struct CsvTable {
    header: Arc<[String]>,
    rows: Vec<CsvRow>,
    sep: char,
    file: Option<PathBuf>,
}

impl CsvTable {
    /// Parses `input`. Not file-backed: [`save_file`](Self::save_file) is a no-op.
    pub fn load_str(input: &str, sep: char) -> Result<Self> {
        Self::parse(input, sep, "string input")
            .inspect_err(|e| log::debug!("csv parse failed: {e}"))
    }

    pub fn load_file(path: impl AsRef<Path>, sep: char) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut table = Self::parse(&text, sep, &path.display().to_string())
            .inspect_err(|e| log::debug!("csv parse of {} failed: {e}", path.display()))?;
        table.file = Some(path.to_path_buf());
        Ok(table)
    }

    fn parse(input: &str, sep: char, source: &str) -> Result<Self> {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        let mut lines = input
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty());

        let Some(header_line) = lines.next() else {
            return Err(EngineError::CsvEmpty(source.to_string()));
        };
        let header: Arc<[String]> = header_line.split(sep).map(str::to_string).collect();

        let mut rows = Vec::new();
        for (i, line) in lines.enumerate() {
            let values = split_fields(line, sep);
            if values.len() != header.len() {
                return Err(EngineError::Csv {
                    line: i as u64 + 1,
                    reason: "corrupted data".to_string(),
                });
            }
            rows.push(CsvRow::new(Arc::clone(&header), values, sep));
        }

        Ok(Self { header, rows, sep, file: None })
    }

    /// Writes the table back to the file it was loaded from. Tables parsed
    /// from a string have nowhere to go and are left alone.
    pub fn save_file(&self) -> Result<()> {
        let Some(path) = self.file.as_ref() else {
            return Ok(());
        };

        let sep = self.sep.to_string();
        let mut out = self.header.join(&sep);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.to_string());
            out.push('\n');
        }
        fs::write(path, out)?;
        Ok(())
    }

    pub fn row(&self, i: usize) -> Option<&CsvRow> {
        self.rows.get(i)
    }

    pub fn row_mut(&mut self, i: usize) -> Option<&mut CsvRow> {
        self.rows.get_mut(i)
    }

    pub fn rows(&self) -> &[CsvRow] {
        &self.rows
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Header name at `i`, or `""` past the last column.
    pub fn header_element(&self, i: usize) -> &str {
        self.header.get(i).map_or("", String::as_str)
    }

    pub fn delete_row(&mut self, i: usize) -> bool {
        if i < self.rows.len() {
            self.rows.remove(i);
            true
        } else {
            false
        }
    }

    /// Inserts a row before position `pos` (`pos == row_count()` appends).
    /// Returns `false` if `pos` is past the end.
    pub fn add_row<S: Into<String>>(&mut self, pos: usize, values: impl IntoIterator<Item = S>) -> bool {
        if pos > self.rows.len() {
            return false;
        }
        let values = values.into_iter().map(Into::into).collect();
        self.rows
            .insert(pos, CsvRow::new(Arc::clone(&self.header), values, self.sep));
        true
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Splits on `sep` outside double quotes. Quotes stay in the field.
fn split_fields(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut quoted = false;
    let mut start = 0;

    for (i, ch) in line.char_indices() {
        if ch == '"' {
            quoted = !quoted;
        } else if ch == sep && !quoted {
            fields.push(line[start..i].to_string());
            start = i + ch.len_utf8();
        }
    }
    fields.push(line[start..].to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONSTERS: &str = "name,hp,drop\nslime,12,\"gel, small\"\n\nbat,7,wing\n";

    #[test]
    fn parses_header_and_rows() {
        let t = CsvTable::load_str(MONSTERS, ',').unwrap();
        assert_eq!(t.header(), &["name", "hp", "drop"]);
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.row(0).unwrap().get_by_name("drop"), Some("\"gel, small\""));
        assert_eq!(t.row(1).unwrap().value_by_name::<i32>("hp", 0), 7);
        assert_eq!(t.header_element(7), "");
        assert!(t.file_name().is_none());
    }

    #[test]
    fn strips_bom_and_carriage_returns() {
        let t = CsvTable::load_str("\u{feff}a;b\r\n1;2\r\n", ';').unwrap();
        assert_eq!(t.header(), &["a", "b"]);
        assert_eq!(t.row(0).unwrap().get(1), Some("2"));
    }

    #[test]
    fn short_row_reports_its_line() {
        let err = CsvTable::load_str("a,b\n1,2\n3\n", ',').unwrap_err();
        match err {
            EngineError::Csv { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "corrupted data");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            CsvTable::load_str("\n\r\n", ','),
            Err(EngineError::CsvEmpty(_))
        ));
    }

    #[test]
    fn add_and_delete_rows() {
        let mut t = CsvTable::load_str("a,b\n1,2\n", ',').unwrap();
        assert!(t.add_row(0, ["x", "y"]));
        assert!(t.add_row(2, ["p", "q"]));
        assert!(!t.add_row(9, ["nope", "nope"]));
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.row(0).unwrap().get(0), Some("x"));

        assert!(t.delete_row(1));
        assert!(!t.delete_row(5));
        assert_eq!(t.row(1).unwrap().get(0), Some("p"));
    }

    #[test]
    fn file_round_trip_keeps_edits() {
        let path = std::env::temp_dir().join(format!("lumen-csv-{}.csv", std::process::id()));
        fs::write(&path, "id,score\n1,10\n2,20\n").unwrap();

        let mut t = CsvTable::load_file(&path, ',').unwrap();
        assert_eq!(t.file_name(), Some(path.as_path()));
        assert!(t.row_mut(1).unwrap().set("score", "99"));
        t.save_file().unwrap();

        let reloaded = CsvTable::load_file(&path, ',').unwrap();
        assert_eq!(reloaded.row(1).unwrap().value_by_name::<i32>("score", 0), 99);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CsvTable::load_file("/definitely/not/here.csv", ',').unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
