use std::sync::Arc;

use crate::event::{AppEvent, EventBus, EventHandler};
use crate::offer::{OfferData, OfferField};

/// Explicit state container for the offer.
///
/// `set_field` is the only way to change [`OfferData`]; each call is
/// broadcast as [`AppEvent::FieldChanged`] so views can react without
/// reaching into each other.
#[derive(Debug)]
pub struct OfferStore {
    data: OfferData,
    bus: Arc<EventBus>,
}

impl OfferStore {
    pub fn new(data: OfferData, bus: Arc<EventBus>) -> Self {
        Self { data, bus }
    }

    pub fn get(&self) -> &OfferData {
        &self.data
    }

    /// Replaces exactly one field. No validation: length caps and color syntax
    /// are the input widgets' business.
    pub fn set_field(&mut self, field: OfferField, value: impl Into<String>) {
        let value = value.into();
        log::debug!("Offer field {:?} set to {:?}", field, value);
        self.data.set(field, value.clone());
        self.bus.emit(AppEvent::FieldChanged { field, value });
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.bus.subscribe(handler);
    }
}
