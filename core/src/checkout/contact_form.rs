// storefront/src/checkout/contact_form.rs
use crate::models::contact::{ContactField, ContactInfo, ValidationErrors};

pub const PHONE_DIGITS: usize = 10;
pub const ADDRESS_MIN_CHARS: usize = 5;
pub const ADDRESS_MAX_CHARS: usize = 200;

/// Keeps ASCII digits only, at most ten of them.
pub fn sanitize_phone(input: &str) -> String {
  input.chars().filter(char::is_ascii_digit).take(PHONE_DIGITS).collect()
}

pub fn sanitize_address(input: &str) -> String {
  input.chars().take(ADDRESS_MAX_CHARS).collect()
}

fn is_local_phone(value: &str) -> bool {
  value.len() == PHONE_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

fn check_phone(value: &str, required: &str) -> Option<String> {
  if value.trim().is_empty() {
    Some(required.to_string())
  } else if !is_local_phone(value) {
    Some("Le numéro doit contenir 10 chiffres".to_string())
  } else {
    None
  }
}

fn check(info: &ContactInfo, field: ContactField) -> Option<String> {
  let value = info.get(field);
  match field {
    ContactField::FullName => value.trim().is_empty().then(|| "Le nom complet est requis".to_string()),
    ContactField::Phone => check_phone(value, "Le numéro de téléphone est requis"),
    ContactField::Whatsapp => check_phone(value, "Le numéro WhatsApp est requis"),
    ContactField::AddressDescription => {
      let trimmed = value.trim();
      let len = trimmed.chars().count();
      if trimmed.is_empty() {
        Some("La description de l'adresse est requise".to_string())
      } else if len < ADDRESS_MIN_CHARS {
        Some("Au moins 5 caractères requis".to_string())
      } else if len > ADDRESS_MAX_CHARS {
        Some("Au maximum 200 caractères".to_string())
      } else {
        None
      }
    }
  }
}

/// Field → message for every invalid field. Empty means the contact is valid.
pub fn validate(info: &ContactInfo) -> ValidationErrors {
  ContactField::ALL
    .iter()
    .filter_map(|&field| check(info, field).map(|message| (field, message)))
    .collect()
}

/// Form state: current input plus the errors from the last full validation.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
  info: ContactInfo,
  errors: ValidationErrors,
}

impl ContactForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_info(info: ContactInfo) -> Self {
    let mut form = Self::new();
    for field in ContactField::ALL {
      form.edit(field, info.get(field));
    }
    form
  }

  /// Applies input handling for the field and drops its previous error.
  pub fn edit(&mut self, field: ContactField, value: &str) {
    let value = match field {
      ContactField::Phone | ContactField::Whatsapp => sanitize_phone(value),
      ContactField::AddressDescription => sanitize_address(value),
      ContactField::FullName => value.to_string(),
    };
    *self.info.slot_mut(field) = value;
    self.errors.remove(&field);
  }

  /// Full re-validation. Returns whether the form can be submitted.
  pub fn validate(&mut self) -> bool {
    self.errors = validate(&self.info);
    self.errors.is_empty()
  }

  pub fn errors(&self) -> &ValidationErrors {
    &self.errors
  }

  pub fn info(&self) -> &ContactInfo {
    &self.info
  }
}
