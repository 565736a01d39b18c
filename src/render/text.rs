use rust_decimal::Decimal;

/// Encode `s` for the standard PDF fonts with WinAnsiEncoding.
///
/// Latin-1 characters map to their code point. Anything else, and the C1
/// control range that WinAnsi reuses for punctuation, becomes `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

/// `$` followed by the amount with exactly two decimals.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}
