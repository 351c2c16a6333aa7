use chrono::NaiveDate;
use serde::Serialize;
use tropa_catalog::{CategoryName, Inventory};
use tropa_shared::Money;

/// A selection that passed validation against the inventory snapshot.
///
/// Only `validate_selection` produces one, so payload construction can rely
/// on the quantity being within the snapshot's bounds.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidatedSelection {
    pub date: NaiveDate,
    pub category: CategoryName,
    pub quantity: u32,
    pub unit_price: Money,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection is missing required field: {field}")]
    MissingSelection { field: &'static str },

    #[error("Invalid ticket quantity: {requested}")]
    InvalidQuantity { requested: u32 },

    #[error("Insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: u32, available: u32 },
}

/// Dates with at least one category still holding tickets, in
/// chronological order. Empty means the excursion is sold out.
pub fn available_dates(inventory: &Inventory) -> Vec<NaiveDate> {
    inventory
        .iter()
        .filter(|(_, categories)| categories.values().any(|slot| slot.count > 0))
        .map(|(date, _)| *date)
        .collect()
}

/// All categories configured under a date, zero-count ones included, so
/// the caller can render them as disabled. Empty for an absent date.
pub fn categories_for_date(inventory: &Inventory, date: NaiveDate) -> Vec<CategoryName> {
    inventory
        .categories(date)
        .map(|categories| categories.keys().cloned().collect())
        .unwrap_or_default()
}

/// The slot's remaining count, or 0 when the slot does not exist.
pub fn max_quantity(inventory: &Inventory, date: NaiveDate, category: &str) -> u32 {
    inventory
        .slot(date, category)
        .map(|slot| slot.count)
        .unwrap_or(0)
}

/// Clamp a requested quantity to `[1, max]`. With nothing available the
/// input still defaults to 1; validation blocks the submission.
pub fn clamp_quantity(requested: u32, max: u32) -> u32 {
    if max == 0 {
        1
    } else {
        requested.clamp(1, max)
    }
}

/// Validate a draft selection against the snapshot. Checks run in order:
/// presence of date and category, then quantity, then remaining inventory.
/// Pure over its inputs; the snapshot is never mutated.
pub fn validate_selection(
    inventory: &Inventory,
    date: Option<NaiveDate>,
    category: &str,
    quantity: u32,
) -> Result<ValidatedSelection, SelectionError> {
    let date = date.ok_or(SelectionError::MissingSelection { field: "date" })?;
    if category.trim().is_empty() {
        return Err(SelectionError::MissingSelection { field: "category" });
    }
    if quantity < 1 {
        return Err(SelectionError::InvalidQuantity {
            requested: quantity,
        });
    }

    let slot = match inventory.slot(date, category) {
        Some(slot) => slot,
        None => {
            return Err(SelectionError::InsufficientInventory {
                requested: quantity,
                available: 0,
            })
        }
    };
    if slot.count < quantity {
        return Err(SelectionError::InsufficientInventory {
            requested: quantity,
            available: slot.count,
        });
    }

    Ok(ValidatedSelection {
        date,
        category: category.to_string(),
        quantity,
        unit_price: slot.price,
    })
}
