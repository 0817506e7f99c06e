use std::{fmt, iter::Sum, ops::Add, str::FromStr};

use crate::AmountError;

/// Money amount represented as **integer paise** (1/100 of a rupee).
///
/// User input is parsed into this type so that validation never depends on
/// floating-point rounding. The backend stores amounts as floating point in
/// major units, so conversion happens only at the wire boundary
/// ([`Amount::to_major`] / [`Amount::from_major`]).
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "₹12.34");
/// ```
///
/// Parsing accepts `.` or `,` as decimal separator and rejects more than two
/// decimals:
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer paise.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in paise.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts to major units for the wire.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Converts a backend major-unit value, rounding to the nearest paisa.
    #[must_use]
    pub fn from_major(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rupees = abs / 100;
        let paise = abs % 100;
        f.pad(&format!("{sign}₹{rupees}.{paise:02}"))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a decimal string into paise.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// The sign is kept: rejecting non-positive amounts is the validator's job.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(AmountError::Empty);
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let rupees_str = parts.next().ok_or(AmountError::Invalid)?;
        let paise_str = parts.next();

        if parts.next().is_some() {
            return Err(AmountError::Invalid);
        }

        // ".5" is half a rupee; a bare "." is not a number.
        let no_fraction = paise_str.is_none_or(str::is_empty);
        if (rupees_str.is_empty() && no_fraction)
            || !rupees_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AmountError::Invalid);
        }

        let rupees: i64 = if rupees_str.is_empty() {
            0
        } else {
            rupees_str.parse().map_err(|_| AmountError::TooLarge)?
        };

        let paise: i64 = match paise_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(AmountError::Invalid);
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| AmountError::Invalid)? * 10,
                    2 => frac.parse::<i64>().map_err(|_| AmountError::Invalid)?,
                    _ => return Err(AmountError::TooManyDecimals),
                }
            }
        };

        let total = rupees
            .checked_mul(100)
            .and_then(|v| v.checked_add(paise))
            .ok_or(AmountError::TooLarge)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_add_up_and_pad() {
        let total: Amount = [Amount::new(1050), Amount::new(250)].into_iter().sum();
        assert_eq!(total, Amount::new(1300));
        assert_eq!(format!("{total:>8}"), "  ₹13.00");
    }

    #[test]
    fn display_formats_rupees() {
        assert_eq!(Amount::new(0).to_string(), "₹0.00");
        assert_eq!(Amount::new(5).to_string(), "₹0.05");
        assert_eq!(Amount::new(50_000).to_string(), "₹500.00");
        assert_eq!(Amount::new(-1050).to_string(), "-₹10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("500".parse::<Amount>().unwrap().minor(), 50_000);
        assert_eq!("500.00".parse::<Amount>().unwrap().minor(), 50_000);
        assert_eq!("10,50".parse::<Amount>().unwrap().minor(), 1050);
        assert_eq!("  2.3 ".parse::<Amount>().unwrap().minor(), 230);
        assert_eq!("-0.01".parse::<Amount>().unwrap().minor(), -1);
    }

    #[test]
    fn parse_accepts_missing_whole_part() {
        assert_eq!(".5".parse::<Amount>().unwrap().minor(), 50);
        assert_eq!(",25".parse::<Amount>().unwrap().minor(), 25);
        assert_eq!("-.75".parse::<Amount>().unwrap().minor(), -75);
        assert_eq!(".".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("-.".parse::<Amount>(), Err(AmountError::Invalid));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("abc".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("1.2.3".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("1e3".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("12.345".parse::<Amount>(), Err(AmountError::TooManyDecimals));
    }

    #[test]
    fn major_conversion_rounds_to_paise() {
        assert_eq!(Amount::new(50_000).to_major(), 500.0);
        assert_eq!(Amount::from_major(0.1 + 0.2).minor(), 30);
        assert_eq!(Amount::from_major(1234.5).minor(), 123_450);
    }
}
