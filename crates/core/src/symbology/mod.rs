//! Turns a code string into a symbol: a bar pattern or a module matrix.
//!
//! Encoding is delegated to `barcoders` (Code 128) and `qrcode` (QR). A
//! failure only concerns the one record being encoded.

pub mod code128;
pub mod qr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::CodeKind;

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodeError {
    #[error("code is empty")]
    Empty,
    #[error("character '{ch}' at byte {position} cannot be encoded")]
    UnsupportedCharacter { ch: char, position: usize },
    #[error("encoder rejected the code: {0}")]
    Rejected(String),
}

/// Linear symbol: one entry per module, `true` = bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearSymbol {
    pub modules: Vec<bool>,
    /// Human-readable text printed under the bars.
    pub text: String,
}

/// Square matrix symbol, row-major, without quiet zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixSymbol {
    pub width: usize,
    pub modules: Vec<bool>,
}

impl MatrixSymbol {
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Linear(LinearSymbol),
    Matrix(MatrixSymbol),
}

impl Symbol {
    pub fn kind(&self) -> CodeKind {
        match self {
            Symbol::Linear(_) => CodeKind::Barcode,
            Symbol::Matrix(_) => CodeKind::QrCode,
        }
    }
}

pub fn encode(code: &str, kind: CodeKind) -> Result<Symbol, EncodeError> {
    let result = match kind {
        CodeKind::Barcode => code128::encode(code).map(Symbol::Linear),
        CodeKind::QrCode => qr::encode(code).map(Symbol::Matrix),
    };
    if let Err(e) = &result {
        log::debug!("cannot encode {code:?} as {kind}: {e}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_kind() {
        assert_eq!(
            encode("ABC123", CodeKind::Barcode).map(|s| s.kind()),
            Ok(CodeKind::Barcode)
        );
        assert_eq!(
            encode("ABC123", CodeKind::QrCode).map(|s| s.kind()),
            Ok(CodeKind::QrCode)
        );
    }

    #[test]
    fn empty_code_fails_for_both_kinds() {
        for kind in CodeKind::ALL {
            assert_eq!(encode("", kind), Err(EncodeError::Empty));
        }
    }

    #[test]
    fn qr_accepts_what_code128_cannot() {
        assert!(encode("Estantería", CodeKind::Barcode).is_err());
        assert!(encode("Estantería", CodeKind::QrCode).is_ok());
    }

    #[test]
    fn out_of_range_modules_are_light() {
        let m = MatrixSymbol {
            width: 1,
            modules: vec![true],
        };
        assert!(m.is_dark(0, 0));
        assert!(!m.is_dark(1, 0));
    }
}
