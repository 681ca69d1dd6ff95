//! Code 128 payload preparation on top of `barcoders`.
//!
//! `barcoders` expects the caller to pick character sets: the payload starts
//! with a set selector (`À` = A, `Ɓ` = B, `Ć` = C) and the same characters
//! switch sets mid-payload.

use barcoders::sym::code128::Code128;

use super::{EncodeError, LinearSymbol};

const SET_A: char = 'À';
const SET_B: char = 'Ɓ';
const SET_C: char = 'Ć';

/// Digit runs at least this long are packed two per symbol in set C.
const MIN_SET_C_RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharSet {
    A,
    B,
    C,
}

impl CharSet {
    fn selector(self) -> char {
        match self {
            CharSet::A => SET_A,
            CharSet::B => SET_B,
            CharSet::C => SET_C,
        }
    }

    fn for_char(ch: char) -> CharSet {
        // DEL is a set B character.
        if matches!(ch, '\0'..='\x1f') {
            CharSet::A
        } else {
            CharSet::B
        }
    }
}

pub fn encode(code: &str) -> Result<LinearSymbol, EncodeError> {
    let payload = payload(code)?;
    let bars = Code128::new(&payload).map_err(|e| EncodeError::Rejected(e.to_string()))?;
    let modules = bars.encode().into_iter().map(|m| m == 1).collect();
    Ok(LinearSymbol {
        modules,
        text: code.to_string(),
    })
}

/// Build the `barcoders` input for `code`, selectors included.
pub(crate) fn payload(code: &str) -> Result<String, EncodeError> {
    if code.is_empty() {
        return Err(EncodeError::Empty);
    }
    if let Some((position, ch)) = code.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(EncodeError::UnsupportedCharacter { ch, position });
    }

    let mut segments: Vec<(CharSet, String)> = Vec::new();
    let mut push = |set: CharSet, text: &str| match segments.last_mut() {
        Some((last, buf)) if *last == set => buf.push_str(text),
        _ => segments.push((set, text.to_string())),
    };

    let bytes = code.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let run = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
        if run >= MIN_SET_C_RUN {
            // Odd runs leave their first digit in the surrounding set.
            let lead = run % 2;
            if lead == 1 {
                let ch = char::from(bytes[i]);
                push(CharSet::for_char(ch), &code[i..i + 1]);
            }
            push(CharSet::C, &code[i + lead..i + run]);
            i += run;
        } else {
            let ch = char::from(bytes[i]);
            push(CharSet::for_char(ch), &code[i..i + 1]);
            i += 1;
        }
    }

    let mut out = String::with_capacity(code.len() + segments.len() * 2);
    for (set, text) in segments {
        out.push(set.selector());
        out.push_str(&text);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_alphanumeric_uses_set_b() {
        assert_eq!(payload("ABC123").as_deref(), Ok("ƁABC123"));
    }

    #[test]
    fn long_digit_runs_use_set_c() {
        assert_eq!(payload("12345678").as_deref(), Ok("Ć12345678"));
        assert_eq!(payload("AB1234").as_deref(), Ok("ƁABĆ1234"));
    }

    #[test]
    fn odd_digit_run_keeps_first_digit_in_b() {
        assert_eq!(payload("X12345").as_deref(), Ok("ƁX1Ć2345"));
        assert_eq!(payload("12345").as_deref(), Ok("Ɓ1Ć2345"));
    }

    #[test]
    fn control_characters_switch_to_set_a() {
        assert_eq!(payload("A\tB").as_deref(), Ok("ƁAÀ\tƁB"));
    }

    #[test]
    fn delete_stays_in_set_b() {
        assert_eq!(payload("a\x7fb").as_deref(), Ok("Ɓa\x7fb"));
    }

    #[test]
    fn rejects_empty_and_non_ascii() {
        assert_eq!(payload(""), Err(EncodeError::Empty));
        assert_eq!(
            payload("ÑU"),
            Err(EncodeError::UnsupportedCharacter { ch: 'Ñ', position: 0 })
        );
    }

    #[test]
    fn encodes_bars_with_visible_text() {
        let symbol = encode("ABC123");
        assert!(symbol.is_ok());
        if let Ok(symbol) = symbol {
            assert_eq!(symbol.text, "ABC123");
            // Starts with a bar and ends with the stop pattern's final bar.
            assert_eq!(symbol.modules.first(), Some(&true));
            assert_eq!(symbol.modules.last(), Some(&true));
        }
    }

    #[test]
    fn set_c_packing_shortens_numeric_codes() {
        let packed = encode("12345678").map(|s| s.modules.len());
        let plain = Code128::new("Ɓ12345678").map(|c| c.encode().len());
        assert!(matches!((packed, plain), (Ok(p), Ok(q)) if p < q));
    }
}
