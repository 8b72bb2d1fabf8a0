//! Developer Profiles
//!
//! Data model, client-side validation, and the chain/cache
//! reconciliation policy for on-chain developer profiles.

mod reconcile;
mod types;
mod validation;

pub use reconcile::{ProfileLookup, ProfilePresence, ProfileReader, ProfileSource};
pub use types::{DeveloperProfile, ProfileForm, ProfileStats, ReputationScore};
pub use validation::{validate_form, FieldError, ValidationLimits};
