// storefront/src/checkout/session.rs

//! The checkout flow as an explicit state machine.
//!
//! Every action first looks up its transition in [`next_state`]; an action that
//! is not allowed from the current state fails with `InvalidTransition` and
//! leaves the session untouched.

use crate::api::StorefrontApi;
use crate::attribution::AttributionStore;
use crate::checkout::catalog;
use crate::checkout::contact_form::ContactForm;
use crate::checkout::location::{Geolocator, LocationPicker};
use crate::checkout::selection::ProductSelection;
use crate::checkout::submit::{OrderDraft, OrderSubmitter, SubmissionReceipt};
use crate::conversions::ClientInfo;
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::contact::{ContactField, ContactInfo};
use crate::models::district::{Coordinate, District};
use crate::models::order::Confirmation;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckoutState {
  SelectDistrict,
  PlacePin,
  EnterContact,
  Submitting,
  Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEvent {
  DistrictSelected,
  PinConfirmed,
  Back,
  SubmitRequested,
  SubmitSucceeded,
  SubmitFailed,
}

/// The transition table. `None` means the event is not accepted in `from`.
pub fn next_state(from: CheckoutState, event: CheckoutEvent) -> Option<CheckoutState> {
  use CheckoutEvent as E;
  use CheckoutState as S;
  match (from, event) {
    (S::SelectDistrict, E::DistrictSelected) => Some(S::PlacePin),
    (S::PlacePin, E::PinConfirmed) => Some(S::EnterContact),
    (S::PlacePin, E::Back) => Some(S::SelectDistrict),
    (S::EnterContact, E::Back) => Some(S::PlacePin),
    (S::EnterContact, E::SubmitRequested) => Some(S::Submitting),
    (S::Submitting, E::SubmitSucceeded) => Some(S::Confirmed),
    (S::Submitting, E::SubmitFailed) => Some(S::EnterContact),
    _ => None,
  }
}

pub struct CheckoutSession {
  state: CheckoutState,
  selection: ProductSelection,
  districts: Vec<District>,
  picker: LocationPicker,
  form: ContactForm,
  confirmation: Option<Confirmation>,
}

impl CheckoutSession {
  pub fn new(selection: ProductSelection) -> Self {
    Self::with_geolocation_timeout(selection, crate::checkout::location::GEOLOCATION_TIMEOUT)
  }

  pub fn with_geolocation_timeout(selection: ProductSelection, timeout: Duration) -> Self {
    Self {
      state: CheckoutState::SelectDistrict,
      selection,
      districts: Vec::new(),
      picker: LocationPicker::new(timeout),
      form: ContactForm::new(),
      confirmation: None,
    }
  }

  fn transition(&self, event: CheckoutEvent, action: &'static str) -> StorefrontResult<CheckoutState> {
    next_state(self.state, event).ok_or(StorefrontError::InvalidTransition {
      from: self.state,
      action,
    })
  }

  fn require(&self, state: CheckoutState, action: &'static str) -> StorefrontResult<()> {
    if self.state == state {
      Ok(())
    } else {
      Err(StorefrontError::InvalidTransition {
        from: self.state,
        action,
      })
    }
  }

  fn enter(&mut self, to: CheckoutState) {
    debug!(from = ?self.state, to = ?to, "Checkout transition.");
    self.state = to;
  }

  /// (Re)loads the district catalog. On failure the previous list is kept and
  /// the session stays on district selection.
  pub async fn load_districts(&mut self, api: &dyn StorefrontApi) -> StorefrontResult<&[District]> {
    self.require(CheckoutState::SelectDistrict, "load_districts")?;
    self.districts = catalog::load_districts(api).await?;
    Ok(&self.districts)
  }

  /// Chooses the district, centres the map on it and tries to locate the device.
  pub async fn select_district(&mut self, district_id: u64, geolocator: &dyn Geolocator) -> StorefrontResult<()> {
    let to = self.transition(CheckoutEvent::DistrictSelected, "select_district")?;
    let district = self
      .districts
      .iter()
      .find(|d| d.id == district_id)
      .cloned()
      .ok_or(StorefrontError::UnknownDistrict(district_id))?;
    self.picker.select_district(district);
    self.enter(to);
    self.picker.locate_device(geolocator).await;
    Ok(())
  }

  pub fn place_pin(&mut self, coordinate: Coordinate) -> StorefrontResult<()> {
    self.require(CheckoutState::PlacePin, "place_pin")?;
    self.picker.place_pin(coordinate)
  }

  /// Returns whether the device position became the pin.
  pub async fn use_current_location(&mut self, geolocator: &dyn Geolocator) -> StorefrontResult<bool> {
    self.require(CheckoutState::PlacePin, "use_current_location")?;
    self.picker.use_current_location(geolocator).await
  }

  pub fn confirm_pin(&mut self) -> StorefrontResult<()> {
    let to = self.transition(CheckoutEvent::PinConfirmed, "confirm_pin")?;
    if !self.picker.can_confirm() {
      return Err(StorefrontError::PinRequired);
    }
    self.enter(to);
    Ok(())
  }

  /// One step back. Leaving the map discards the pin; leaving the form keeps it.
  pub fn back(&mut self) -> StorefrontResult<()> {
    let to = self.transition(CheckoutEvent::Back, "back")?;
    if self.state == CheckoutState::PlacePin {
      self.picker.reset();
    }
    self.enter(to);
    Ok(())
  }

  pub fn edit_contact(&mut self, field: ContactField, value: &str) -> StorefrontResult<()> {
    self.require(CheckoutState::EnterContact, "edit_contact")?;
    self.form.edit(field, value);
    Ok(())
  }

  pub fn fill_contact(&mut self, info: &ContactInfo) -> StorefrontResult<()> {
    for field in ContactField::ALL {
      self.edit_contact(field, info.get(field))?;
    }
    Ok(())
  }

  /// Validates the form and places the order.
  ///
  /// An invalid form stays on the contact step with the per-field errors. A
  /// backend failure returns to the contact step with every field intact, and
  /// so does dropping the returned future before it resolves.
  #[instrument(name = "CheckoutSession::submit", skip_all, err(Display))]
  pub async fn submit(
    &mut self,
    submitter: &OrderSubmitter,
    attribution: &AttributionStore,
    client: ClientInfo,
  ) -> StorefrontResult<SubmissionReceipt> {
    if self.state == CheckoutState::Submitting {
      return Err(StorefrontError::SubmissionInFlight);
    }
    let to = self.transition(CheckoutEvent::SubmitRequested, "submit")?;
    if !self.form.validate() {
      return Err(StorefrontError::Validation(self.form.errors().clone()));
    }
    let draft = self.draft(attribution, client)?;
    self.enter(to);

    let outcome = {
      let guard = SubmittingGuard::new(&mut self.state);
      let outcome = submitter.submit(draft).await;
      guard.disarm();
      outcome
    };

    match outcome {
      Ok(receipt) => {
        let done = self.transition(CheckoutEvent::SubmitSucceeded, "submit")?;
        self.confirmation = Some(receipt.confirmation.clone());
        self.enter(done);
        info!(pickup_code = receipt.confirmation.pickup_code(), "Checkout confirmed.");
        Ok(receipt)
      }
      Err(e) => {
        warn!(error = %e, "Order submission failed; back to contact step.");
        let back = self.transition(CheckoutEvent::SubmitFailed, "submit")?;
        self.enter(back);
        Err(e)
      }
    }
  }

  fn draft(&self, attribution: &AttributionStore, client: ClientInfo) -> StorefrontResult<OrderDraft> {
    let district = self.picker.district().cloned().ok_or(StorefrontError::PinRequired)?;
    let pin = self.picker.pin().ok_or(StorefrontError::PinRequired)?;
    let record = attribution.record();
    let source_url = record.as_ref().map(|r| r.url.clone()).unwrap_or_default();
    let fbclid = record.as_ref().and_then(|r| r.utm_params.fbclid.clone());
    let client = if client.fbc.is_none() && fbclid.is_some() {
      client.with_click_id(fbclid.as_deref(), Utc::now().timestamp_millis())
    } else {
      client
    };
    Ok(OrderDraft {
      selection: self.selection.clone(),
      district,
      pin,
      contact: self.form.info().clone(),
      ad_id: attribution.ad_id(),
      client,
      source_url,
    })
  }

  pub fn state(&self) -> CheckoutState {
    self.state
  }

  pub fn districts(&self) -> &[District] {
    &self.districts
  }

  pub fn picker(&self) -> &LocationPicker {
    &self.picker
  }

  pub fn form(&self) -> &ContactForm {
    &self.form
  }

  pub fn selection(&self) -> &ProductSelection {
    &self.selection
  }

  pub fn confirmation(&self) -> Option<&Confirmation> {
    self.confirmation.as_ref()
  }
}

/// Holds the session in `Submitting` while the order is in flight. Dropped
/// while still armed, it applies `SubmitFailed`.
struct SubmittingGuard<'a> {
  state: &'a mut CheckoutState,
  armed: bool,
}

impl<'a> SubmittingGuard<'a> {
  fn new(state: &'a mut CheckoutState) -> Self {
    Self { state, armed: true }
  }

  fn disarm(mut self) {
    self.armed = false;
  }
}

impl Drop for SubmittingGuard<'_> {
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    if let Some(to) = next_state(*self.state, CheckoutEvent::SubmitFailed) {
      warn!(from = ?self.state, to = ?to, "Submission abandoned before completion.");
      *self.state = to;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use CheckoutEvent as E;
  use CheckoutState as S;

  #[test]
  fn table_accepts_only_listed_transitions() {
    let states = [S::SelectDistrict, S::PlacePin, S::EnterContact, S::Submitting, S::Confirmed];
    let events = [
      E::DistrictSelected,
      E::PinConfirmed,
      E::Back,
      E::SubmitRequested,
      E::SubmitSucceeded,
      E::SubmitFailed,
    ];
    let accepted = states
      .iter()
      .flat_map(|&s| events.iter().map(move |&e| (s, e)))
      .filter(|&(s, e)| next_state(s, e).is_some())
      .count();
    assert_eq!(accepted, 7);
    assert_eq!(next_state(S::Confirmed, E::Back), None);
    assert_eq!(next_state(S::SelectDistrict, E::Back), None);
    assert_eq!(next_state(S::Submitting, E::SubmitFailed), Some(S::EnterContact));
  }

  #[test]
  fn dropped_guard_returns_to_contact_step() {
    let mut state = S::Submitting;
    drop(SubmittingGuard::new(&mut state));
    assert_eq!(state, S::EnterContact);

    let mut state = S::Submitting;
    SubmittingGuard::new(&mut state).disarm();
    assert_eq!(state, S::Submitting);
  }
}
