//! Domain layer: the payment protocol itself.
//!
//! - `order` - the shop order referenced by notifications
//! - `payment` - signature codec, receipt/form builders, reconciliation

pub mod order;
pub mod payment;
