use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies the booking platform accepts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Byn,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Byn => "BYN",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Minor units per major unit (all supported currencies use 2 decimals)
    pub fn minor_per_major(&self) -> i64 {
        100
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary amount in integer minor units.
///
/// All price arithmetic stays in minor units so totals are exact within the
/// currency's precision. Decimal wire values are converted once, at the API
/// boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    pub amount_minor: i64,
    pub currency: Currency,
}

impl Money {
    pub fn from_minor(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Convert a decimal wire amount. Returns None for negative or
    /// non-finite input; sub-minor digits are rounded.
    pub fn from_decimal(amount: f64, currency: Currency) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let amount_minor = (amount * currency.minor_per_major() as f64).round() as i64;
        Some(Self {
            amount_minor,
            currency,
        })
    }

    /// Total for `quantity` units of this price.
    pub fn times(&self, quantity: u32) -> Money {
        Money {
            amount_minor: self.amount_minor * i64::from(quantity),
            currency: self.currency,
        }
    }

    pub fn as_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_per_major() as f64
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.currency.minor_per_major();
        write!(
            f,
            "{}.{:02} {}",
            self.amount_minor / scale,
            (self.amount_minor % scale).abs(),
            self.currency
        )
    }
}

/// Serde adapter for fields that travel as decimal numbers on the wire but
/// are held as integer minor units.
pub mod decimal_minor {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount_minor: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(*amount_minor as f64 / 100.0)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok((value * 100.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_conversion() {
        let price = Money::from_decimal(20.0, Currency::Byn).unwrap();
        assert_eq!(price.amount_minor, 2000);

        let price = Money::from_decimal(19.99, Currency::Usd).unwrap();
        assert_eq!(price.amount_minor, 1999);

        assert!(Money::from_decimal(-1.0, Currency::Byn).is_none());
        assert!(Money::from_decimal(f64::NAN, Currency::Byn).is_none());
    }

    #[test]
    fn test_total_is_exact() {
        let price = Money::from_decimal(20.0, Currency::Byn).unwrap();
        let total = price.times(3);
        assert_eq!(total.amount_minor, 6000);
        assert_eq!(total.as_decimal(), 60.0);
    }

    #[test]
    fn test_display() {
        let price = Money::from_minor(1950, Currency::Eur);
        assert_eq!(price.to_string(), "19.50 EUR");
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(serde_json::to_string(&Currency::Byn).unwrap(), "\"BYN\"");
        let parsed: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(parsed, Currency::Eur);
    }
}
