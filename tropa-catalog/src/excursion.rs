use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tropa_shared::{Currency, Money};
use uuid::Uuid;

use crate::inventory::{Inventory, NormalizeError};

/// A bookable offering in the catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Excursion {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub base_price: Money,
    pub inventory: Inventory,
}

/// Raw excursion payload as served by the booking API.
///
/// The inventory field has shipped under several casings over the years;
/// the aliases absorb all of them so normalization happens in one place.
#[derive(Debug, Clone, Deserialize)]
pub struct ExcursionDto {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub city: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: Currency,
    #[serde(
        rename = "availableTicketsByDate",
        alias = "AvailableTicketsByDate",
        alias = "available_tickets_by_date",
        default
    )]
    pub available_tickets_by_date: HashMap<String, HashMap<String, RawTicketSlot>>,
}

/// One raw inventory entry before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTicketSlot {
    pub count: i64,
    pub price: f64,
    pub currency: Currency,
}

fn default_currency() -> Currency {
    Currency::Byn
}

impl TryFrom<ExcursionDto> for Excursion {
    type Error = NormalizeError;

    fn try_from(dto: ExcursionDto) -> Result<Self, Self::Error> {
        let inventory = Inventory::from_raw(&dto.available_tickets_by_date)?;
        let base_price = Money::from_decimal(dto.price, dto.currency)
            .ok_or(NormalizeError::BadBasePrice { price: dto.price })?;

        Ok(Excursion {
            id: dto.id,
            title: dto.title,
            description: dto.description,
            city: dto.city,
            base_price,
            inventory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_dto_accepts_legacy_inventory_casing() {
        let json = serde_json::json!({
            "id": "7b7f5b2a-43b2-4c39-9f1e-6a2b1c9d0e4f",
            "title": "Old town walk",
            "city": "Minsk",
            "price": 25.0,
            "currency": "BYN",
            "AvailableTicketsByDate": {
                "2025-05-15": {
                    "Standard": { "count": 5, "price": 20.0, "currency": "BYN" }
                }
            }
        });

        let dto: ExcursionDto = serde_json::from_value(json).unwrap();
        let excursion = Excursion::try_from(dto).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        assert_eq!(excursion.inventory.slot(date, "Standard").unwrap().count, 5);
        assert_eq!(excursion.base_price.amount_minor, 2500);
    }

    #[test]
    fn test_dto_without_inventory_normalizes_to_empty() {
        let json = serde_json::json!({
            "id": "7b7f5b2a-43b2-4c39-9f1e-6a2b1c9d0e4f",
            "title": "Castle tour",
            "city": "Mir",
            "price": 40.0
        });

        let dto: ExcursionDto = serde_json::from_value(json).unwrap();
        let excursion = Excursion::try_from(dto).unwrap();
        assert!(excursion.inventory.is_empty());
    }
}
