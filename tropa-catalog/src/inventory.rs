use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tropa_shared::Money;

use crate::excursion::RawTicketSlot;

pub type CategoryName = String;

/// Remaining tickets and unit price for one (date, category) pair.
///
/// A slot with `count == 0` stays visible so the UI can render it as
/// disabled instead of silently dropping it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketSlot {
    pub count: u32,
    pub price: Money,
}

/// Normalized per-date, per-category ticket inventory snapshot.
///
/// Built exactly once from the raw wire shape; read-only afterwards. The
/// authoritative decrement happens server-side when a booking is accepted,
/// so a snapshot is stale after a successful submission and callers must
/// refetch before relying on the counts again.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inventory {
    slots: BTreeMap<NaiveDate, BTreeMap<CategoryName, TicketSlot>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Normalize the raw `availableTicketsByDate` object. Rejects bad date
    /// keys, empty category names, and negative counts or prices rather
    /// than letting them become representable states.
    pub fn from_raw(
        raw: &HashMap<String, HashMap<String, RawTicketSlot>>,
    ) -> Result<Self, NormalizeError> {
        let mut inventory = Inventory::new();

        for (date_key, categories) in raw {
            let date = parse_date_key(date_key)
                .ok_or_else(|| NormalizeError::BadDateKey(date_key.clone()))?;

            for (category, slot) in categories {
                if category.trim().is_empty() {
                    return Err(NormalizeError::EmptyCategory {
                        date: date_key.clone(),
                    });
                }
                if slot.count < 0 {
                    return Err(NormalizeError::NegativeCount {
                        date: date_key.clone(),
                        category: category.clone(),
                        count: slot.count,
                    });
                }
                let price = Money::from_decimal(slot.price, slot.currency).ok_or_else(|| {
                    NormalizeError::BadPrice {
                        date: date_key.clone(),
                        category: category.clone(),
                        price: slot.price,
                    }
                })?;

                inventory.insert_slot(
                    date,
                    category.clone(),
                    TicketSlot {
                        count: slot.count as u32,
                        price,
                    },
                );
            }
        }

        Ok(inventory)
    }

    pub fn insert_slot(&mut self, date: NaiveDate, category: CategoryName, slot: TicketSlot) {
        self.slots.entry(date).or_default().insert(category, slot);
    }

    pub fn slot(&self, date: NaiveDate, category: &str) -> Option<&TicketSlot> {
        self.slots.get(&date).and_then(|cats| cats.get(category))
    }

    /// Chronological iteration over dates and their category maps.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&NaiveDate, &BTreeMap<CategoryName, TicketSlot>)> {
        self.slots.iter()
    }

    pub fn categories(&self, date: NaiveDate) -> Option<&BTreeMap<CategoryName, TicketSlot>> {
        self.slots.get(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Accepts ISO dates plus the dotted form older backend revisions emit.
fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(key, "%d.%m.%Y"))
        .ok()
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NormalizeError {
    #[error("Unrecognized inventory date key: {0}")]
    BadDateKey(String),

    #[error("Empty category name under date {date}")]
    EmptyCategory { date: String },

    #[error("Negative ticket count for {date}/{category}: {count}")]
    NegativeCount {
        date: String,
        category: String,
        count: i64,
    },

    #[error("Invalid price for {date}/{category}: {price}")]
    BadPrice {
        date: String,
        category: String,
        price: f64,
    },

    #[error("Invalid excursion base price: {price}")]
    BadBasePrice { price: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tropa_shared::Currency;

    fn raw_slot(count: i64, price: f64) -> RawTicketSlot {
        RawTicketSlot {
            count,
            price,
            currency: Currency::Byn,
        }
    }

    #[test]
    fn test_normalize_accepts_both_date_formats() {
        let mut raw = HashMap::new();
        raw.insert(
            "2025-05-15".to_string(),
            HashMap::from([("Standard".to_string(), raw_slot(5, 20.0))]),
        );
        raw.insert(
            "16.05.2025".to_string(),
            HashMap::from([("Standard".to_string(), raw_slot(2, 20.0))]),
        );

        let inventory = Inventory::from_raw(&raw).unwrap();
        let dates: Vec<_> = inventory.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 5, 16).unwrap(),
            ]
        );
    }

    #[test]
    fn test_normalize_rejects_negative_count() {
        let raw = HashMap::from([(
            "2025-05-15".to_string(),
            HashMap::from([("Standard".to_string(), raw_slot(-1, 20.0))]),
        )]);

        let err = Inventory::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::NegativeCount { count: -1, .. }));
    }

    #[test]
    fn test_normalize_rejects_bad_date_key() {
        let raw = HashMap::from([(
            "next friday".to_string(),
            HashMap::from([("Standard".to_string(), raw_slot(1, 10.0))]),
        )]);

        assert_eq!(
            Inventory::from_raw(&raw).unwrap_err(),
            NormalizeError::BadDateKey("next friday".to_string())
        );
    }

    #[test]
    fn test_price_converted_to_minor_units() {
        let raw = HashMap::from([(
            "2025-05-15".to_string(),
            HashMap::from([("VIP".to_string(), raw_slot(3, 49.5))]),
        )]);

        let inventory = Inventory::from_raw(&raw).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        let slot = inventory.slot(date, "VIP").unwrap();
        assert_eq!(slot.price.amount_minor, 4950);
        assert_eq!(slot.count, 3);
    }

    #[test]
    fn test_empty_raw_map_is_empty_inventory() {
        let inventory = Inventory::from_raw(&HashMap::new()).unwrap();
        assert!(inventory.is_empty());
        assert!(inventory
            .slot(NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(), "Standard")
            .is_none());
    }
}
