pub mod excursion;
pub mod inventory;

pub use excursion::{Excursion, ExcursionDto, RawTicketSlot};
pub use inventory::{CategoryName, Inventory, NormalizeError, TicketSlot};
