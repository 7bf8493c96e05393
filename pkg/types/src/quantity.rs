use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Internal resolution: every quantity is held as an integer count of nano-units.
const NANOS_PER_UNIT: i128 = 1_000_000_000;

/// Largest decimal exponent accepted in `<n>e<exp>` notation.
const MAX_EXPONENT: i32 = 27;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("quantity must not be empty")]
    Empty,
    #[error("invalid quantity '{0}'")]
    Invalid(String),
    #[error("unknown suffix '{suffix}' in quantity '{input}'")]
    UnknownSuffix { input: String, suffix: String },
    #[error("quantity '{0}' is out of range")]
    OutOfRange(String),
}

/// A resource amount in Kubernetes notation: `4`, `500m`, `15Gi`, `2k`, `1e3`.
///
/// Equality and ordering are numeric, so `1Gi == 1024Mi` and `500m < 1`.
/// The text the quantity was parsed from is kept and written back verbatim.
#[derive(Debug, Clone)]
pub struct Quantity {
    nanos: i128,
    text: String,
}

impl Quantity {
    /// Whole units (CPU cores, object counts).
    pub fn from_units(units: i64) -> Self {
        Self {
            nanos: units as i128 * NANOS_PER_UNIT,
            text: units.to_string(),
        }
    }

    /// Thousandths of a unit, written as `<n>m`.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis as i128 * 1_000_000,
            text: format!("{}m", millis),
        }
    }

    /// Mebibytes, written as `<n>Mi`.
    pub fn from_mebibytes(mib: i64) -> Self {
        Self {
            nanos: mib as i128 * (1 << 20) * NANOS_PER_UNIT,
            text: format!("{}Mi", mib),
        }
    }

    /// Gibibytes, written as `<n>Gi`.
    pub fn from_gibibytes(gib: i64) -> Self {
        Self {
            nanos: gib as i128 * (1 << 30) * NANOS_PER_UNIT,
            text: format!("{}Gi", gib),
        }
    }

    /// The original textual form.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Value in thousandths of a unit, rounded up.
    pub fn milli_value(&self) -> i128 {
        ceil_div(self.nanos, 1_000_000)
    }

    /// Value in whole units, rounded up.
    pub fn value(&self) -> i128 {
        ceil_div(self.nanos, NANOS_PER_UNIT)
    }
}

fn ceil_div(n: i128, d: i128) -> i128 {
    let q = n / d;
    if n % d > 0 { q + 1 } else { q }
}

/// Maps a suffix to `(multiplier, divisor)` in nano-units.
fn suffix_scale(input: &str, suffix: &str) -> Result<(i128, i128), QuantityError> {
    let binary = |shift: u32| -> Result<(i128, i128), QuantityError> {
        Ok((NANOS_PER_UNIT << shift, 1))
    };
    let decimal = |exp: i32| -> Result<(i128, i128), QuantityError> {
        let exp = exp + 9;
        if exp >= 0 {
            Ok((10i128.pow(exp as u32), 1))
        } else {
            Ok((1, 10i128.pow((-exp) as u32)))
        }
    };

    match suffix {
        "" => decimal(0),
        "Ki" => binary(10),
        "Mi" => binary(20),
        "Gi" => binary(30),
        "Ti" => binary(40),
        "Pi" => binary(50),
        "Ei" => binary(60),
        "n" => decimal(-9),
        "u" => decimal(-6),
        "m" => decimal(-3),
        "k" => decimal(3),
        "M" => decimal(6),
        "G" => decimal(9),
        "T" => decimal(12),
        "P" => decimal(15),
        "E" => decimal(18),
        _ => {
            let exponent = suffix
                .strip_prefix('e')
                .or_else(|| suffix.strip_prefix('E'))
                .and_then(|e| e.parse::<i32>().ok());
            match exponent {
                Some(exp) if (-MAX_EXPONENT..=MAX_EXPONENT).contains(&exp) => decimal(exp),
                Some(_) => Err(QuantityError::OutOfRange(input.to_string())),
                None => Err(QuantityError::UnknownSuffix {
                    input: input.to_string(),
                    suffix: suffix.to_string(),
                }),
            }
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, body) = if let Some(rest) = input.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = input.strip_prefix('+') {
            (false, rest)
        } else {
            (false, input)
        };

        let number_end = body
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(body.len());
        let (number, suffix) = body.split_at(number_end);
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(QuantityError::Invalid(input.to_string()));
        }

        let out_of_range = || QuantityError::OutOfRange(input.to_string());
        let mantissa: i128 = format!("{}{}", whole, fraction)
            .parse()
            .map_err(|_| out_of_range())?;
        let fraction_scale = 10i128
            .checked_pow(fraction.len() as u32)
            .ok_or_else(out_of_range)?;

        let (multiplier, divisor) = suffix_scale(input, suffix)?;
        let scaled = mantissa.checked_mul(multiplier).ok_or_else(out_of_range)?;
        let divisor = divisor.checked_mul(fraction_scale).ok_or_else(out_of_range)?;
        let nanos = ceil_div(scaled, divisor);

        Ok(Self {
            nanos: if negative { -nanos } else { nanos },
            text: input.to_string(),
        })
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nanos.cmp(&other.nanos)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
