// storefront/src/checkout/mod.rs

//! The buyer-facing checkout: district, delivery pin, contact, order.

pub mod catalog;
pub mod contact_form;
pub mod location;
pub mod selection;
pub mod session;
pub mod submit;

pub use catalog::{flatten_catalog, load_districts};
pub use contact_form::{validate, ContactForm};
pub use location::{FixedPosition, Geolocator, LocationPicker, NoGeolocation, PickerState};
pub use selection::ProductSelection;
pub use session::{CheckoutEvent, CheckoutSession, CheckoutState};
pub use submit::{OrderDraft, OrderSettings, OrderSubmitter, SubmissionReceipt};
