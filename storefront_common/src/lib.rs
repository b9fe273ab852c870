//! Shared wire contracts for the storefront event pipeline.
//!
//! Everything in this crate is part of an interop boundary: the message envelope and
//! payloads carried on the broker queues, the queue names themselves, and the REST
//! shapes exposed by the external user service. Field names are camelCase on the wire
//! and must stay that way; other (unconverted) services parse these payloads as-is.

mod envelope;
mod profile;

pub use envelope::{
    Envelope,
    NewRecommendationData,
    OrderPlacedData,
    OrderStatusUpdateData,
    ORDER_PLACED_QUEUE,
    ORDER_UPDATES_QUEUE,
    RECOMMENDATIONS_QUEUE,
};
pub use profile::{PreferencesError, UserPreferences, UserProfile, UserRecord};
