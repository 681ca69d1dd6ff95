use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which symbology every label is rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeKind {
    /// Code 128 linear barcode.
    #[default]
    Barcode,
    /// QR matrix code.
    #[serde(alias = "qr")]
    QrCode,
}

impl CodeKind {
    pub const ALL: [CodeKind; 2] = [CodeKind::Barcode, CodeKind::QrCode];

    /// Human-readable name for toolbars and headings.
    pub fn title(self) -> &'static str {
        match self {
            Self::Barcode => "Barcode",
            Self::QrCode => "QR code",
        }
    }

    /// The other kind.
    pub fn toggled(self) -> Self {
        match self {
            Self::Barcode => Self::QrCode,
            Self::QrCode => Self::Barcode,
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Barcode => write!(f, "barcode"),
            Self::QrCode => write!(f, "qr"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown code kind '{0}' (expected 'barcode' or 'qr')")]
pub struct UnknownCodeKind(pub String);

impl FromStr for CodeKind {
    type Err = UnknownCodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "barcode" | "code128" | "linear" => Ok(Self::Barcode),
            "qr" | "qrcode" | "qr-code" | "matrix" => Ok(Self::QrCode),
            _ => Err(UnknownCodeKind(s.to_string())),
        }
    }
}
