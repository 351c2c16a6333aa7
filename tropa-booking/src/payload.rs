use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tropa_shared::Currency;
use uuid::Uuid;

use crate::allocator::ValidatedSelection;

/// Booking lifecycle status as the API understands it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Wire payload for `POST /bookings`. The server owns the authoritative
/// inventory decrement; the client only ever submits `Pending` requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: Uuid,
    pub excursion_id: Uuid,
    pub ticket_category: String,
    pub date_time: NaiveDate,
    pub quantity: u32,
    pub status: BookingStatus,
    #[serde(rename = "total", with = "tropa_shared::money::decimal_minor")]
    pub total_minor: i64,
    pub currency: Currency,
}

/// Build the request body for a validated selection.
/// `total = unit_price * quantity`, computed in minor units.
pub fn build_booking_payload(
    user_id: Uuid,
    excursion_id: Uuid,
    selection: &ValidatedSelection,
) -> BookingRequest {
    let total = selection.unit_price.times(selection.quantity);

    BookingRequest {
        user_id,
        excursion_id,
        ticket_category: selection.category.clone(),
        date_time: selection.date,
        quantity: selection.quantity,
        status: BookingStatus::Pending,
        total_minor: total.amount_minor,
        currency: total.currency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tropa_shared::Money;

    fn selection(quantity: u32, price_minor: i64) -> ValidatedSelection {
        ValidatedSelection {
            date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            category: "Standard".to_string(),
            quantity,
            unit_price: Money::from_minor(price_minor, Currency::Byn),
        }
    }

    #[test]
    fn test_total_is_unit_price_times_quantity() {
        let payload = build_booking_payload(Uuid::new_v4(), Uuid::new_v4(), &selection(3, 2000));
        assert_eq!(payload.total_minor, 6000);
        assert_eq!(payload.status, BookingStatus::Pending);
    }

    #[test]
    fn test_wire_shape() {
        let user_id = Uuid::new_v4();
        let excursion_id = Uuid::new_v4();
        let payload = build_booking_payload(user_id, excursion_id, &selection(3, 2000));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["userId"], serde_json::json!(user_id.to_string()));
        assert_eq!(value["ticketCategory"], "Standard");
        assert_eq!(value["dateTime"], "2025-05-15");
        assert_eq!(value["quantity"], 3);
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["total"], 60.0);
        assert_eq!(value["currency"], "BYN");
    }
}
