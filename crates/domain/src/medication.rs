//! Medication — reference data a drone can carry.
//!
//! Medications are created independently (seeded into the catalog) and
//! referenced, never owned, by drones. The optional image blob is
//! serialized as a base64 string in JSON payloads.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A medication item, keyed by its catalog code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Unique catalog code, `[A-Z_0-9]+`.
    pub code: String,
    /// Human-readable name, `[a-zA-Z0-9_-]+`.
    pub name: String,
    /// Weight in grams.
    pub weight: f64,
    /// Optional case picture, base64 in JSON.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_blob")]
    pub image: Option<Vec<u8>>,
}

impl Medication {
    /// Check field-level invariants.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.is_empty() || !self.code.chars().all(is_code_char) {
            return Err(ValidationError::InvalidMedicationCode);
        }
        if self.name.is_empty() || !self.name.chars().all(is_name_char) {
            return Err(ValidationError::InvalidMedicationName);
        }
        if self.weight <= 0.0 {
            return Err(ValidationError::InvalidMedicationWeight);
        }
        Ok(())
    }
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

mod base64_blob {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medication() -> Medication {
        Medication {
            code: "ASPI004".to_string(),
            name: "Aspirin".to_string(),
            weight: 50.0,
            image: None,
        }
    }

    #[test]
    fn should_accept_valid_medication() {
        assert!(medication().validate().is_ok());
    }

    #[test]
    fn should_accept_code_with_underscore_and_digits() {
        let mut med = medication();
        med.code = "MED_01".to_string();
        assert!(med.validate().is_ok());
    }

    #[test]
    fn should_reject_lowercase_code() {
        let mut med = medication();
        med.code = "aspi004".to_string();
        assert_eq!(med.validate(), Err(ValidationError::InvalidMedicationCode));
    }

    #[test]
    fn should_reject_empty_code() {
        let mut med = medication();
        med.code = String::new();
        assert_eq!(med.validate(), Err(ValidationError::InvalidMedicationCode));
    }

    #[test]
    fn should_reject_name_with_spaces() {
        let mut med = medication();
        med.name = "Aspirin Forte".to_string();
        assert_eq!(med.validate(), Err(ValidationError::InvalidMedicationName));
    }

    #[test]
    fn should_accept_name_with_dash_and_underscore() {
        let mut med = medication();
        med.name = "Aspirin-Forte_500".to_string();
        assert!(med.validate().is_ok());
    }

    #[test]
    fn should_reject_non_positive_weight() {
        let mut med = medication();
        med.weight = 0.0;
        assert_eq!(
            med.validate(),
            Err(ValidationError::InvalidMedicationWeight)
        );
    }

    #[test]
    fn should_serialize_image_as_base64() {
        let mut med = medication();
        med.image = Some(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_value(&med).unwrap();
        assert_eq!(json["image"], "3q2+7w==");
    }

    #[test]
    fn should_omit_missing_image() {
        let json = serde_json::to_value(medication()).unwrap();
        assert!(json.get("image").is_none());
    }

    #[test]
    fn should_deserialize_base64_image() {
        let med: Medication = serde_json::from_str(
            r#"{"code":"ASPI004","name":"Aspirin","weight":50.0,"image":"3q2+7w=="}"#,
        )
        .unwrap();
        assert_eq!(med.image, Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }
}
