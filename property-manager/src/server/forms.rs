//! Form body parsing.
//!
//! Bodies arrive as `application/x-www-form-urlencoded` pairs. Text fields are
//! trimmed; numbers, dates and choices that fail to parse are reported per
//! field with the same messages the validators use.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use property_manager_shared::{
    ContractInput, DocumentInput, IncidentInput, OwnerInput, PayerRole, PaymentInput,
    PaymentTypeInput, RecordId, TenantInput, UnitCategory, UnitInput, ValidationErrors,
};

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A decoded form body. When a key repeats, single-valued reads take the
/// last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The trimmed value for `key`, or `None` when missing or blank.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.raw(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// The trimmed value for `key`, empty when missing.
    pub fn text(&self, key: &str) -> String {
        self.value(key).unwrap_or_default().to_string()
    }

    /// Every non-blank value submitted under `key`.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Checkbox semantics: missing, blank, `false` or `0` is unchecked.
    pub fn checkbox(&self, key: &str) -> bool {
        match self.value(key) {
            None => false,
            Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "off"),
        }
    }
}

/// Reads typed fields while collecting their errors.
struct FieldReader<'a> {
    form: &'a FormData,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    fn new(form: &'a FormData) -> Self {
        Self {
            form,
            errors: ValidationErrors::new(),
        }
    }

    fn parse_optional<T: FromStr>(&mut self, key: &str, message: &str) -> Option<T> {
        let raw = self.form.value(key)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.add(key, message);
                None
            }
        }
    }

    fn parse_required<T: FromStr>(&mut self, key: &str, message: &str) -> Option<T> {
        if self.form.value(key).is_none() {
            self.errors.add(key, REQUIRED);
            return None;
        }
        self.parse_optional(key, message)
    }

    fn required_id(&mut self, key: &str) -> Option<RecordId> {
        self.parse_required(key, INVALID_CHOICE)
    }

    fn optional_id(&mut self, key: &str) -> Option<RecordId> {
        self.parse_optional(key, INVALID_CHOICE)
    }

    fn ids(&mut self, key: &str) -> Vec<RecordId> {
        let mut ids = Vec::new();
        for raw in self.form.values(key) {
            match raw.parse() {
                Ok(id) => ids.push(id),
                Err(_) => self.errors.add(key, format!("“{raw}” is not a valid value.")),
            }
        }
        ids
    }

    fn required_date(&mut self, key: &str) -> Option<NaiveDate> {
        if self.form.value(key).is_none() {
            self.errors.add(key, REQUIRED);
            return None;
        }
        self.optional_date(key)
    }

    fn optional_date(&mut self, key: &str) -> Option<NaiveDate> {
        let raw = self.form.value(key)?;
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.errors.add(key, "Enter a valid date.");
                None
            }
        }
    }

    fn required_decimal(&mut self, key: &str) -> Option<BigDecimal> {
        self.parse_required(key, "Enter a number.")
    }

    fn required_choice<T>(&mut self, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let Some(raw) = self.form.value(key) else {
            self.errors.add(key, REQUIRED);
            return None;
        };
        self.choice(key, raw, parse)
    }

    fn optional_choice<T>(&mut self, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.form.value(key)?;
        self.choice(key, raw, parse)
    }

    fn choice<T>(&mut self, key: &str, raw: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let parsed = parse(raw);
        if parsed.is_none() {
            self.errors.add(
                key,
                format!("Select a valid choice. {raw} is not one of the available choices."),
            );
        }
        parsed
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }

    fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

pub fn owner_input(form: &FormData) -> OwnerInput {
    OwnerInput {
        name: form.text("name"),
        national_id: form.text("national_id"),
        phone: form.text("phone"),
        email: form.text("email"),
        address: form.text("address"),
    }
}

pub fn unit_input(form: &FormData) -> Result<UnitInput, ValidationErrors> {
    let mut reader = FieldReader::new(form);
    let category = reader.required_choice("category", UnitCategory::parse);
    let area = reader.parse_required::<f64>("area", "Enter a number.");
    let rooms = reader.parse_optional::<i32>("rooms", "Enter a whole number.");
    let owner_id = reader.required_id("owner");
    let (Some(category), Some(area), Some(owner_id)) = (category, area, owner_id) else {
        return Err(reader.into_errors());
    };
    reader.finish()?;
    Ok(UnitInput {
        category,
        address: form.text("address"),
        floor: form.text("floor"),
        door: form.text("door"),
        area,
        rooms,
        owner_id,
    })
}

pub fn tenant_input(form: &FormData) -> Result<TenantInput, ValidationErrors> {
    let mut reader = FieldReader::new(form);
    let unit_id = reader.optional_id("unit");
    reader.finish()?;
    Ok(TenantInput {
        name: form.text("name"),
        national_id: form.text("national_id"),
        phone: form.text("phone"),
        email: form.text("email"),
        unit_id,
    })
}

pub fn contract_input(form: &FormData) -> Result<ContractInput, ValidationErrors> {
    let mut reader = FieldReader::new(form);
    let unit_id = reader.required_id("unit");
    let owner_id = reader.required_id("owner");
    let tenant_ids = reader.ids("tenant_ids");
    let start_date = reader.required_date("start_date");
    let end_date = reader.optional_date("end_date");
    let monthly_price = reader.required_decimal("monthly_price");
    let (Some(unit_id), Some(owner_id), Some(start_date), Some(monthly_price)) =
        (unit_id, owner_id, start_date, monthly_price)
    else {
        return Err(reader.into_errors());
    };
    reader.finish()?;
    Ok(ContractInput {
        unit_id,
        owner_id,
        tenant_ids,
        start_date,
        end_date,
        monthly_price,
        terms: form.text("terms"),
    })
}

pub fn payment_type_input(form: &FormData) -> Result<PaymentTypeInput, ValidationErrors> {
    let mut reader = FieldReader::new(form);
    let default_payer = reader.optional_choice("default_payer", PayerRole::parse);
    reader.finish()?;
    Ok(PaymentTypeInput {
        name: form.text("name"),
        description: form.text("description"),
        default_payer,
        active: form.checkbox("active"),
    })
}

/// A blank date is kept as `None`; creation fills in today.
pub fn payment_input(form: &FormData) -> Result<PaymentInput, ValidationErrors> {
    let mut reader = FieldReader::new(form);
    let unit_id = reader.required_id("unit");
    let payment_type_id = reader.required_id("payment_type");
    let date = reader.optional_date("date");
    let amount = reader.required_decimal("amount");
    let payer = reader.required_choice("payer", PayerRole::parse);
    let (Some(unit_id), Some(payment_type_id), Some(amount), Some(payer)) =
        (unit_id, payment_type_id, amount, payer)
    else {
        return Err(reader.into_errors());
    };
    reader.finish()?;
    Ok(PaymentInput {
        unit_id,
        payment_type_id,
        date,
        description: form.text("description"),
        amount,
        paid: form.checkbox("paid"),
        payer,
    })
}

pub fn incident_input(form: &FormData) -> Result<IncidentInput, ValidationErrors> {
    let mut reader = FieldReader::new(form);
    let unit_id = reader.required_id("unit");
    let resolved_on = reader.optional_date("resolved_on");
    let Some(unit_id) = unit_id else {
        return Err(reader.into_errors());
    };
    reader.finish()?;
    Ok(IncidentInput {
        unit_id,
        description: form.text("description"),
        status: form.text("status"),
        resolved_on,
    })
}

/// The unit and description of a document edit.
pub fn document_input(form: &FormData) -> Result<DocumentInput, ValidationErrors> {
    let mut reader = FieldReader::new(form);
    let Some(unit_id) = reader.required_id("unit") else {
        return Err(reader.into_errors());
    };
    reader.finish()?;
    Ok(DocumentInput {
        unit_id,
        description: form.text("description"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_payment_input() {
        let input = payment_input(&form(&[
            ("unit", "1"),
            ("payment_type", "2"),
            ("date", ""),
            ("description", "  June rent "),
            ("amount", "750.50"),
            ("paid", "on"),
            ("payer", "tenant"),
        ]))
        .unwrap();
        assert_eq!(input.unit_id, 1);
        assert_eq!(input.payment_type_id, 2);
        assert_eq!(input.date, None);
        assert_eq!(input.description, "June rent");
        assert_eq!(input.amount, BigDecimal::from_str("750.50").unwrap());
        assert!(input.paid);
        assert_eq!(input.payer, PayerRole::Tenant);
    }

    #[test]
    fn test_payment_input_reports_each_bad_field() {
        let errors = payment_input(&form(&[
            ("unit", "one"),
            ("date", "15/06/2023"),
            ("amount", "lots"),
            ("payer", "landlord"),
        ]))
        .unwrap_err();
        assert!(errors.field("unit").is_some());
        assert_eq!(errors.field("payment_type"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.field("date").is_some());
        assert!(errors.field("amount").is_some());
        assert!(errors.field("payer").is_some());
    }

    #[test]
    fn test_contract_input_collects_tenants() {
        let input = contract_input(&form(&[
            ("unit", "3"),
            ("owner", "1"),
            ("tenant_ids", "4"),
            ("tenant_ids", "5"),
            ("start_date", "2023-01-01"),
            ("end_date", ""),
            ("monthly_price", "800"),
        ]))
        .unwrap();
        assert_eq!(input.tenant_ids, vec![4, 5]);
        assert_eq!(input.end_date, None);

        let errors = contract_input(&form(&[
            ("unit", "3"),
            ("owner", "1"),
            ("tenant_ids", "x"),
            ("start_date", "2023-01-01"),
            ("monthly_price", "800"),
        ]))
        .unwrap_err();
        assert!(errors.field("tenant_ids").is_some());
    }

    #[test]
    fn test_unit_input_optional_rooms() {
        let input = unit_input(&form(&[
            ("category", "garage"),
            ("address", "Calle Luna 3"),
            ("area", "12.5"),
            ("rooms", ""),
            ("owner", "1"),
        ]))
        .unwrap();
        assert_eq!(input.category, UnitCategory::Garage);
        assert_eq!(input.rooms, None);

        let errors = unit_input(&form(&[
            ("category", "garage"),
            ("area", "12.5"),
            ("rooms", "2.5"),
            ("owner", "1"),
        ]))
        .unwrap_err();
        assert!(errors.field("rooms").is_some());
    }

    #[test]
    fn test_checkbox_values() {
        let form = form(&[("a", "on"), ("b", "false"), ("c", ""), ("d", "True")]);
        assert!(form.checkbox("a"));
        assert!(!form.checkbox("b"));
        assert!(!form.checkbox("c"));
        assert!(form.checkbox("d"));
        assert!(!form.checkbox("missing"));
    }
}
