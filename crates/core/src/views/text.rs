//! Text renditions of symbols for terminals, two pixel rows per line.

use crate::symbology::{LinearSymbol, MatrixSymbol, Symbol};

/// Terminal rows used for the bars of a linear symbol.
pub const LINEAR_ROWS: usize = 4;

pub fn symbol_lines(symbol: &Symbol) -> Vec<String> {
    match symbol {
        Symbol::Linear(linear) => linear_lines(linear),
        Symbol::Matrix(matrix) => matrix_lines(matrix),
    }
}

fn linear_lines(symbol: &LinearSymbol) -> Vec<String> {
    let bars: String = symbol
        .modules
        .iter()
        .map(|&m| if m { '█' } else { ' ' })
        .collect();
    let mut lines = vec![bars; LINEAR_ROWS];

    let width = symbol.modules.len();
    let text_len = symbol.text.chars().count();
    let pad = width.saturating_sub(text_len) / 2;
    lines.push(format!("{}{}", " ".repeat(pad), symbol.text));
    lines
}

fn matrix_lines(symbol: &MatrixSymbol) -> Vec<String> {
    (0..symbol.width)
        .step_by(2)
        .map(|y| {
            (0..symbol.width)
                .map(|x| match (symbol.is_dark(x, y), symbol.is_dark(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect()
        })
        .collect()
}
