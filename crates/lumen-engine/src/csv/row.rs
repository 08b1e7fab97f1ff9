use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One data row. Values are addressed by position or by header name.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    header: Arc<[String]>,
    values: Vec<String>,
    sep: char,
}

impl CsvRow {
    pub(crate) fn new(header: Arc<[String]>, values: Vec<String>, sep: char) -> Self {
        Self { header, values, sep }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.values.get(i).map(String::as_str)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.column(name).and_then(|i| self.get(i))
    }

    /// Replaces the value under column `name`. Returns `false` if the header
    /// has no such column.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.column(name).and_then(|i| self.values.get_mut(i)) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Parses field `i` as `T`, or returns `default` if it is missing or does
    /// not parse in full.
    pub fn value<T: FromStr>(&self, i: usize, default: T) -> T {
        self.get(i).and_then(|s| s.parse().ok()).unwrap_or(default)
    }

    pub fn value_by_name<T: FromStr>(&self, name: &str, default: T) -> T {
        self.get_by_name(name).and_then(|s| s.parse().ok()).unwrap_or(default)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

impl fmt::Display for CsvRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.sep)?;
            }
            f.write_str(v)?;
        }
        Ok(())
    }
}
