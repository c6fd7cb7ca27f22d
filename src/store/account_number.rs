use rand::Rng;
use thiserror::Error;

pub const DIGITS: usize = 16;
const GROUP: usize = 4;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AccountNumberError {
    #[error("Account number must be exactly 16 digits")]
    WrongLength,
    #[error("Account number must contain only digits")]
    NonDigit,
}

/// Generate a fresh account number in the grouped display form,
/// e.g. `4821 0937 5512 0068`. The leading digit is never zero.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut digits = String::with_capacity(DIGITS);
    digits.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for _ in 1..DIGITS {
        digits.push(char::from(b'0' + rng.gen_range(0..=9u8)));
    }
    group(&digits)
}

/// Drop every whitespace character.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Check sign-in input: whitespace is ignored, the rest must be 16 ASCII digits.
/// Returns the bare digit string.
pub fn validate(input: &str) -> Result<String, AccountNumberError> {
    let cleaned = digits_only(input);
    if cleaned.chars().count() != DIGITS {
        return Err(AccountNumberError::WrongLength);
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(AccountNumberError::NonDigit);
    }
    Ok(cleaned)
}

/// Canonical stored form: four blocks of four digits separated by single spaces.
pub fn canonicalize(input: &str) -> Result<String, AccountNumberError> {
    validate(input).map(|digits| group(&digits))
}

/// Grouped and ungrouped spellings of the same number compare equal.
pub fn same_number(a: &str, b: &str) -> bool {
    digits_only(a) == digits_only(b)
}

fn group(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    chars
        .chunks(GROUP)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
