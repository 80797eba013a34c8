//! Record domain model.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

lazy_static::lazy_static! {
    /// Digits, spaces and the usual phone punctuation, 3 to 32 characters.
    pub static ref PHONE_NUMBER_REGEX: regex::Regex =
        regex::Regex::new(r"^[0-9+\-(). ]{3,32}$").unwrap();
}

/// Represents a stored personal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub phone_number: String,
}

/// A validated record that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub phone_number: String,
}

impl NewRecord {
    /// Attaches the store-assigned identifier.
    pub fn with_id(self, id: i32) -> Record {
        Record {
            id,
            name: self.name,
            surname: self.surname,
            age: self.age,
            phone_number: self.phone_number,
        }
    }
}

/// Request payload for creating a record.
///
/// Every field is optional at the JSON level, so an absent field and an
/// explicit `null` both surface as a field-level "required" validation error
/// instead of a deserialization failure. An `id` supplied by the caller is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    #[serde(default)]
    #[validate(
        required(message = "Name is required"),
        length(max = 100, message = "Name must be at most 100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "Surname is required"),
        length(max = 100, message = "Surname must be at most 100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub surname: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "Age is required"),
        range(min = 0, max = 150, message = "Age must be between 0 and 150")
    )]
    pub age: Option<i32>,

    #[serde(default)]
    #[validate(
        required(message = "Phone number is required"),
        regex(
            path = "*PHONE_NUMBER_REGEX",
            message = "Phone number must be 3-32 digits, spaces or + - ( ) ."
        ),
        custom(function = "shared::validation::validate_contains_digit")
    )]
    pub phone_number: Option<String>,
}

impl CreateRecordRequest {
    /// Validates the payload and converts it into a [`NewRecord`].
    pub fn into_new_record(self) -> Result<NewRecord, ValidationErrors> {
        self.validate()?;

        // validate() rejects every missing field
        Ok(NewRecord {
            name: self.name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
        })
    }
}
