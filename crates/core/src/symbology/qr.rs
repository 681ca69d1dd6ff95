use qrcode::{Color, QrCode};

use super::{EncodeError, MatrixSymbol};

/// Encode at the `qrcode` defaults: auto version, error correction M.
pub fn encode(code: &str) -> Result<MatrixSymbol, EncodeError> {
    if code.is_empty() {
        return Err(EncodeError::Empty);
    }
    let qr = QrCode::new(code.as_bytes()).map_err(|e| EncodeError::Rejected(e.to_string()))?;
    Ok(MatrixSymbol {
        width: qr.width(),
        modules: qr.to_colors().into_iter().map(|c| c == Color::Dark).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_matches_qrcode_output() {
        let ours = encode("ABC123").map(|m| (m.width, m.modules));
        let theirs = QrCode::new(b"ABC123").map(|q| {
            let dark = q.to_colors().into_iter().map(|c| c == Color::Dark).collect::<Vec<_>>();
            (q.width(), dark)
        });
        assert!(ours.is_ok());
        assert_eq!(ours.ok(), theirs.ok());
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let symbol = encode("shelf-7").ok();
        assert_eq!(symbol.map(|m| m.is_dark(0, 0)), Some(true));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let long = "x".repeat(8000);
        assert!(matches!(encode(&long), Err(EncodeError::Rejected(_))));
    }
}
