// crates/responder/src/numerals.rs

const ROMAN: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// Roman numeral for 1..=10, plain decimal otherwise.
pub fn roman(n: usize) -> String {
    match n {
        1..=10 => ROMAN[n - 1].to_string(),
        _ => n.to_string(),
    }
}
