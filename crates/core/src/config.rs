//! Label geometry. All sizes are CSS pixels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("columns must be at least 1")]
    NoColumns,
    #[error("qr_margin of {0} modules is unreasonably large (max 16)")]
    QrMarginTooLarge(u32),
    #[error("card_padding {padding} leaves no room inside card_min_width {min_width}")]
    PaddingExceedsCard { padding: f64, min_width: f64 },
}

/// Sizes used by every label view.
///
/// Missing fields deserialize to their defaults, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Width of one Code 128 module.
    pub module_width: f64,
    pub bar_height: f64,
    /// Quiet zone around the bars.
    pub bar_margin: f64,
    pub font_size: f64,
    /// Gap between the bars and the human-readable text.
    pub text_margin: f64,
    /// Edge length of the QR image, quiet zone included.
    pub qr_width: f64,
    /// QR quiet zone, in modules.
    pub qr_margin: u32,
    pub card_padding: f64,
    pub card_min_width: f64,
    pub line_height: f64,
    /// Cards per row on a print sheet.
    pub columns: u32,
    pub gap: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            module_width: 2.0,
            bar_height: 100.0,
            bar_margin: 10.0,
            font_size: 14.0,
            text_margin: 2.0,
            qr_width: 128.0,
            qr_margin: 2,
            card_padding: 12.0,
            card_min_width: 220.0,
            line_height: 18.0,
            columns: 1,
            gap: 16.0,
        }
    }
}

impl LabelStyle {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("module_width", self.module_width),
            ("bar_height", self.bar_height),
            ("font_size", self.font_size),
            ("qr_width", self.qr_width),
            ("card_min_width", self.card_min_width),
            ("line_height", self.line_height),
        ];
        for (field, value) in sizes {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let spacings = [
            ("bar_margin", self.bar_margin),
            ("text_margin", self.text_margin),
            ("card_padding", self.card_padding),
            ("gap", self.gap),
        ];
        for (field, value) in spacings {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.card_min_width - 2.0 * self.card_padding <= 0.0 {
            return Err(ConfigError::PaddingExceedsCard {
                padding: self.card_padding,
                min_width: self.card_min_width,
            });
        }
        if self.columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.qr_margin > 16 {
            return Err(ConfigError::QrMarginTooLarge(self.qr_margin));
        }
        Ok(())
    }

    /// Copy with a different column count, for one-off sheet layouts.
    pub fn with_columns(&self, columns: u32) -> Self {
        Self {
            columns,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LabelStyle::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_sizes() {
        let style = LabelStyle {
            bar_height: 0.0,
            ..LabelStyle::default()
        };
        assert_eq!(
            style.validate(),
            Err(ConfigError::NotPositive {
                field: "bar_height",
                value: 0.0
            })
        );
    }

    #[test]
    fn allows_zero_spacing_but_not_negative() {
        let mut style = LabelStyle {
            gap: 0.0,
            ..LabelStyle::default()
        };
        assert!(style.validate().is_ok());
        style.gap = -1.0;
        assert!(style.validate().is_err());
    }

    #[test]
    fn rejects_padding_wider_than_card() {
        let style = LabelStyle {
            card_min_width: 100.0,
            card_padding: 50.0,
            ..LabelStyle::default()
        };
        assert_eq!(
            style.validate(),
            Err(ConfigError::PaddingExceedsCard {
                padding: 50.0,
                min_width: 100.0
            })
        );
    }

    #[test]
    fn rejects_zero_columns() {
        let style = LabelStyle::default().with_columns(0);
        assert_eq!(style.validate(), Err(ConfigError::NoColumns));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let style: LabelStyle =
            serde_json::from_str(r#"{"qr_width": 256}"#).unwrap_or_default();
        assert_eq!(style.qr_width, 256.0);
        assert_eq!(style.bar_height, 100.0);
    }
}
