//! Column schema for label spreadsheets.
//!
//! Five columns are consumed. Headers are matched loosely (case, accents,
//! spaces and separators ignored) against English and Spanish aliases, so
//! templates such as `Flecha | Codigo | Estante | Módulo | Nivel` work
//! unchanged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Arrow,
    Code,
    Shelf,
    Module,
    Level,
}

impl Field {
    /// Also the positional order used when no header matches.
    pub const ALL: [Field; 5] = [
        Field::Arrow,
        Field::Code,
        Field::Shelf,
        Field::Module,
        Field::Level,
    ];

    /// Canonical column name, as shown in the empty-state prompt.
    pub fn name(self) -> &'static str {
        match self {
            Field::Arrow => "arrow",
            Field::Code => "code",
            Field::Shelf => "shelf",
            Field::Module => "module",
            Field::Level => "level",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Arrow => &["arrow", "flecha", "direction", "direccion"],
            Field::Code => &["code", "codigo", "barcode", "sku"],
            Field::Shelf => &["shelf", "estante", "rack"],
            Field::Module => &["module", "modulo", "bay"],
            Field::Level => &["level", "nivel"],
        }
    }

    /// Which field a header cell names, if any.
    pub fn from_header(header: &str) -> Option<Field> {
        let norm = normalize_header(header);
        if norm.is_empty() {
            return None;
        }
        Field::ALL
            .into_iter()
            .find(|f| f.aliases().contains(&norm.as_str()))
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Canonical column names in positional order.
pub fn expected_columns() -> [&'static str; 5] {
    Field::ALL.map(Field::name)
}

/// Lowercase, fold common Latin accents, drop whitespace and separators.
pub fn normalize_header(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '-' | '.' | ':'))
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Column index per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    slots: [Option<usize>; 5],
}

impl ColumnMap {
    /// Map by header name. The first column naming a field wins.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut slots = [None; 5];
        for (col, header) in headers.iter().enumerate() {
            if let Some(field) = Field::from_header(header.as_ref())
                && slots[field.slot()].is_none()
            {
                slots[field.slot()] = Some(col);
            }
        }
        Self { slots }
    }

    /// Columns 0..5 in `Field::ALL` order.
    pub fn positional() -> Self {
        Self {
            slots: [Some(0), Some(1), Some(2), Some(3), Some(4)],
        }
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.slots[field.slot()]
    }

    pub fn has(&self, field: Field) -> bool {
        self.index(field).is_some()
    }
}
