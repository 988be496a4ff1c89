// storefront/src/models/contact.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
  FullName,
  Phone,
  Whatsapp,
  AddressDescription,
}

impl ContactField {
  pub const ALL: [ContactField; 4] = [
    ContactField::FullName,
    ContactField::Phone,
    ContactField::Whatsapp,
    ContactField::AddressDescription,
  ];
}

impl fmt::Display for ContactField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ContactField::FullName => "fullName",
      ContactField::Phone => "phone",
      ContactField::Whatsapp => "whatsapp",
      ContactField::AddressDescription => "addressDescription",
    };
    f.write_str(name)
  }
}

/// Field → message. Empty means the form is valid.
pub type ValidationErrors = BTreeMap<ContactField, String>;

/// Buyer-entered delivery contact. Phone numbers are stored in local format,
/// without the country calling code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
  pub full_name: String,
  pub phone: String,
  pub whatsapp: String,
  pub address_description: String,
}

impl ContactInfo {
  pub fn get(&self, field: ContactField) -> &str {
    match field {
      ContactField::FullName => &self.full_name,
      ContactField::Phone => &self.phone,
      ContactField::Whatsapp => &self.whatsapp,
      ContactField::AddressDescription => &self.address_description,
    }
  }

  pub(crate) fn slot_mut(&mut self, field: ContactField) -> &mut String {
    match field {
      ContactField::FullName => &mut self.full_name,
      ContactField::Phone => &mut self.phone,
      ContactField::Whatsapp => &mut self.whatsapp,
      ContactField::AddressDescription => &mut self.address_description,
    }
  }
}
