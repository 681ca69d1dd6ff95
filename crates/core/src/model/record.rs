use serde::{Deserialize, Serialize};

/// One shelving-location row from an ingested spreadsheet.
///
/// Records are addressed by their position in the loaded sequence, never by
/// `code`: the spreadsheet does not guarantee distinct code values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Directional indicator printed above the code (e.g. "→", "IZQ").
    pub arrow: String,
    /// The value encoded into the barcode / QR symbol.
    pub code: String,
    pub shelf: String,
    pub module: String,
    pub level: String,
    /// 1-based spreadsheet row the record came from.
    pub row: u32,
}

impl Record {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Location descriptor lines in print order, skipping blank ones.
    pub fn location_lines(&self) -> impl Iterator<Item = &str> {
        [self.shelf.as_str(), self.module.as_str(), self.level.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_lines_skip_blanks() {
        let record = Record {
            shelf: "E-01".into(),
            level: "3".into(),
            ..Record::new("ABC123")
        };
        let lines: Vec<_> = record.location_lines().collect();
        assert_eq!(lines, vec!["E-01", "3"]);
    }
}
