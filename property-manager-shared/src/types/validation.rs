use std::borrow::Cow;
use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::Serialize;
use validator::{Validate, ValidateEmail, ValidationError};

/// Field level validation messages collected while checking a form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Collects the field errors `validator` reports for `input`.
    pub fn collect<T: Validate>(input: &T) -> Self {
        match input.validate() {
            Ok(()) => Self::new(),
            Err(report) => report.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(report: validator::ValidationErrors) -> Self {
        let mut errors = Self::new();
        for (field, field_errors) in report.field_errors() {
            for error in field_errors.iter() {
                errors.add(&field, describe(error));
            }
        }
        errors
    }
}

/// Renders a `validator` error as a form message.
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match &*error.code {
        "length" => {
            let max = error.params.get("max").and_then(|v| v.as_u64());
            let len = error
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|v| v.chars().count());
            match (max, len) {
                (Some(max), Some(len)) => {
                    format!("Ensure this value has at most {max} characters (it has {len}).")
                }
                (Some(max), None) => format!("Ensure this value has at most {max} characters."),
                _ => "Ensure this value has a valid length.".to_string(),
            }
        }
        "email" => "Enter a valid email address.".to_string(),
        code => format!("Enter a valid value ({code})."),
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "This field is required."));
    }
    Ok(())
}

/// Email fields are optional; a non-blank value must be an address.
pub(crate) fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "Enter a valid email address."))
    }
}

/// Checks a money amount against a NUMERIC(10, 2) column.
pub(crate) fn money(value: &BigDecimal) -> Result<(), ValidationError> {
    let (_, scale) = value.normalized().as_bigint_and_exponent();
    if scale > 2 {
        return Err(invalid(
            "decimal_places",
            "Ensure that there are no more than 2 decimal places.",
        ));
    }
    let whole = value.with_scale(0).abs();
    if whole != BigDecimal::from(0) && whole.digits() > 8 {
        return Err(invalid(
            "max_digits",
            "Ensure that there are no more than 10 digits in total.",
        ));
    }
    Ok(())
}

pub(crate) fn non_negative_money(value: &BigDecimal) -> Result<(), ValidationError> {
    if *value < BigDecimal::from(0) {
        return Err(invalid(
            "min_value",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    money(value)
}

pub(crate) fn non_negative_area(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid("min_value", "Enter a non-negative number."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[derive(Validate)]
    struct Contact {
        #[validate(custom(function = "not_blank"), length(max = 5))]
        name: String,
        #[validate(custom(function = "optional_email"))]
        email: String,
    }

    fn contact(name: &str, email: &str) -> Contact {
        Contact {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_collect_renders_form_messages() {
        let errors = ValidationErrors::collect(&contact("   ", ""));
        assert_eq!(errors.field("name").unwrap(), ["This field is required."]);
        assert!(errors.field("email").is_none());

        let errors = ValidationErrors::collect(&contact("Ana María", "ana@example.com"));
        assert_eq!(
            errors.field("name").unwrap(),
            ["Ensure this value has at most 5 characters (it has 9)."]
        );
        assert!(errors.into_result().is_err());

        assert!(ValidationErrors::collect(&contact("Ana", "")).is_empty());
    }

    #[test]
    fn test_email_check() {
        assert!(optional_email("").is_ok());
        assert!(optional_email("ana@example.com").is_ok());
        assert!(optional_email("ana.garcia+pisos@mail.example.es").is_ok());
        for bad in [
            "ana.example.com",
            "@example.com",
            "ana@foo@example.com",
            "a na@exa mple.com",
            "ana@example..com",
        ] {
            assert!(optional_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_money_check() {
        for ok in ["12.50", "12.5000", "99999999.99", "0"] {
            assert!(money(&BigDecimal::from_str(ok).unwrap()).is_ok(), "{ok}");
        }
        assert!(money(&BigDecimal::from_str("1.005").unwrap()).is_err());
        assert!(money(&BigDecimal::from_str("123456789").unwrap()).is_err());
        assert!(non_negative_money(&BigDecimal::from_str("-1").unwrap()).is_err());
        assert!(non_negative_area(f64::NAN).is_err());
        assert!(non_negative_area(80.0).is_ok());
    }
}
