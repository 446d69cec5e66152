use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// A Kenyan mobile number in its canonical international form, e.g.
/// `+254712345678`. Parsing accepts the three formats property managers
/// actually enter: `2547xxxxxxxx`, `07xxxxxxxx` and the bare `7xxxxxxxx`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
#[error("phone number: {0} is not a valid Kenyan mobile number")]
pub struct InvalidPhoneError(pub String);

impl FromStr for PhoneNumber {
    type Err = InvalidPhoneError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let cleaned: String = raw.chars().filter(char::is_ascii_digit).collect();

        let digits = if cleaned.starts_with("254") && cleaned.len() == 12 {
            cleaned
        } else if cleaned.starts_with('0') && cleaned.len() == 10 {
            format!("254{}", &cleaned[1..])
        } else if cleaned.len() == 9 {
            // Bare subscriber number, assume a local Kenyan mobile
            format!("254{}", cleaned)
        } else {
            return Err(InvalidPhoneError(raw.to_string()));
        };

        // Mobile numbers are in the 7xx and 1xx ranges
        match digits.as_bytes()[3] {
            b'1' | b'7' => Ok(Self(format!("+{}", digits))),
            _ => Err(InvalidPhoneError(raw.to_string())),
        }
    }
}
