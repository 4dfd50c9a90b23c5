use uuid::Uuid;

use crate::offer::OfferField;
use crate::state::GenerationStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    FieldChanged {
        field: OfferField,
        value: String,
    },
    StatusChanged {
        old: GenerationStatus,
        new: GenerationStatus,
    },
    BackgroundReplaced {
        image_id: Uuid,
    },
}
