//! CPF (Cadastro de Pessoas Físicas) validation.
//!
//! A CPF is an 11-digit Brazilian taxpayer number whose last two digits are
//! checksums over the first nine. Candidates may carry the usual `000.000.000-00`
//! punctuation; it is stripped before validation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

const CPF_LEN: usize = 11;

/// Return `true` if `candidate` is a well-formed CPF with valid check digits.
///
/// Never panics; anything malformed is simply invalid.
pub fn is_valid_cpf(candidate: &str) -> bool { Cpf::parse(candidate).is_some() }

/// A validated CPF, stored as its 11 bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
  /// Normalize and validate `candidate`. Returns `None` unless it passes
  /// both checksum rounds.
  pub fn parse(candidate: &str) -> Option<Self> {
    let digits = normalize(candidate)?;
    if digits.iter().all(|d| *d == digits[0]) {
      return None;
    }
    if check_digit(&digits[..9]) != digits[9] {
      return None;
    }
    if check_digit(&digits[..10]) != digits[10] {
      return None;
    }
    Some(Self(digits.iter().map(|d| char::from(b'0' + *d)).collect()))
  }

  /// The 11 digits without punctuation.
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Cpf {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl Serialize for Cpf {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for Cpf {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Cpf::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid cpf: {raw:?}")))
  }
}

/// Strip formatting and return exactly 11 digit values, or `None`.
fn normalize(candidate: &str) -> Option<[u8; CPF_LEN]> {
  let mut digits = [0u8; CPF_LEN];
  let mut len = 0;
  for c in candidate.chars() {
    match c {
      '0'..='9' => {
        if len == CPF_LEN {
          return None;
        }
        digits[len] = c as u8 - b'0';
        len += 1;
      }
      '.' | '-' | '/' => {}
      c if c.is_whitespace() => {}
      _ => return None,
    }
  }
  (len == CPF_LEN).then_some(digits)
}

/// Weighted mod-11 check digit over `digits`; weights run from
/// `digits.len() + 1` down to 2.
fn check_digit(digits: &[u8]) -> u8 {
  let weight_start = digits.len() as u32 + 1;
  let sum: u32 = digits
    .iter()
    .enumerate()
    .map(|(i, d)| u32::from(*d) * (weight_start - i as u32))
    .sum();
  let remainder = sum % 11;
  if remainder < 2 { 0 } else { (11 - remainder) as u8 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_known_valid_cpfs() {
    assert!(is_valid_cpf("52998224725"));
    assert!(is_valid_cpf("11144477735"));
    assert!(is_valid_cpf("529.982.247-25"));
    assert!(is_valid_cpf(" 111.444.777-35 "));
  }

  #[test]
  fn rejects_repeated_digits() {
    for d in 0..=9 {
      let s: String = std::iter::repeat_n(char::from(b'0' + d), 11).collect();
      assert!(!is_valid_cpf(&s), "{s} should be invalid");
    }
  }

  #[test]
  fn rejects_flipped_check_digits() {
    assert!(!is_valid_cpf("52998224735"));
    assert!(!is_valid_cpf("52998224726"));
    assert!(!is_valid_cpf("11144477745"));
    assert!(!is_valid_cpf("11144477736"));
  }

  #[test]
  fn rejects_malformed_input() {
    for s in [
      "",
      "   ",
      "abc",
      "5299822472",
      "529982247250",
      "52998224725a",
      "5299822472５",
      "529_982_247_25",
      "💥",
    ] {
      assert!(!is_valid_cpf(s), "{s:?} should be invalid");
    }
  }

  #[test]
  fn remainder_below_two_yields_zero_digit() {
    // First round: 1*10 + 1*2 = 12, remainder 1.
    assert!(is_valid_cpf("10000000108"));
    assert!(!is_valid_cpf("10000000118"));
    // Remainder 10 gives check digit 1.
    assert!(is_valid_cpf("10000000019"));
  }

  #[test]
  fn parse_normalizes_to_bare_digits() {
    let cpf = Cpf::parse("529.982.247-25").unwrap();
    assert_eq!(cpf.as_str(), "52998224725");
    assert_eq!(cpf.to_string(), "52998224725");
  }

  #[test]
  fn deserialize_validates() {
    let ok: Cpf = serde_json::from_str("\"529.982.247-25\"").unwrap();
    assert_eq!(ok.as_str(), "52998224725");
    assert!(serde_json::from_str::<Cpf>("\"12345678900\"").is_err());
  }
}
