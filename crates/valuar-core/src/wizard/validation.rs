use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Wizard form fields with stable snake_case identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardField {
    ContactName,
    Email,
    Phone,
    CompanyName,
    Industry,
    Revenue,
    Ebitda,
    Location,
    CompetitiveAdvantage,
}

impl WizardField {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardField::ContactName => "contact_name",
            WizardField::Email => "email",
            WizardField::Phone => "phone",
            WizardField::CompanyName => "company_name",
            WizardField::Industry => "industry",
            WizardField::Revenue => "revenue",
            WizardField::Ebitda => "ebitda",
            WizardField::Location => "location",
            WizardField::CompetitiveAdvantage => "competitive_advantage",
        }
    }
}

/// Raw field input as it arrives from the form layer. Numeric fields accept
/// text and parse it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Number(Decimal),
}

impl FieldValue {
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Numeric view of the value. `Err` means present but unparseable.
    pub fn as_number(&self) -> Result<Option<Decimal>, ()> {
        match self {
            FieldValue::Empty => Ok(None),
            FieldValue::Number(d) => Ok(Some(*d)),
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(trimmed).map(Some).map_err(|_| ())
            }
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(d) => d.to_string(),
        }
    }
}

/// Per-field validation rules.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    Required,
    PositiveNumber,
    NonNegativeNumber,
    MaxValue(Decimal),
    Email,
}

/// A single validation failure attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"));

// ---------------------------------------------------------------------------
// FieldValidationEngine
// ---------------------------------------------------------------------------

/// Registry of per-field rules. Produces error lists; never fails itself.
#[derive(Debug, Clone)]
pub struct FieldValidationEngine {
    rules: BTreeMap<WizardField, Vec<ValidationRule>>,
}

impl Default for FieldValidationEngine {
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(WizardField::ContactName, vec![ValidationRule::Required]);
        rules.insert(
            WizardField::Email,
            vec![ValidationRule::Required, ValidationRule::Email],
        );
        rules.insert(WizardField::Phone, vec![]);
        rules.insert(WizardField::CompanyName, vec![ValidationRule::Required]);
        rules.insert(WizardField::Industry, vec![ValidationRule::Required]);
        rules.insert(
            WizardField::Revenue,
            vec![
                ValidationRule::Required,
                ValidationRule::PositiveNumber,
                ValidationRule::MaxValue(Decimal::from(1_000_000_000_000_i64)),
            ],
        );
        rules.insert(
            WizardField::Ebitda,
            vec![
                ValidationRule::Required,
                ValidationRule::NonNegativeNumber,
                ValidationRule::MaxValue(Decimal::from(1_000_000_000_000_i64)),
            ],
        );
        rules.insert(WizardField::Location, vec![ValidationRule::Required]);
        rules.insert(WizardField::CompetitiveAdvantage, vec![]);
        Self { rules }
    }
}

impl FieldValidationEngine {
    /// Override the rules of a single field, mainly for tests.
    pub fn set_rules(&mut self, field: WizardField, rules: Vec<ValidationRule>) {
        self.rules.insert(field, rules);
    }

    /// Evaluate one field against its registered rules.
    pub fn validate(&self, field: WizardField, value: &FieldValue) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let Some(rules) = self.rules.get(&field) else {
            return errors;
        };

        for rule in rules {
            if let Some(message) = check_rule(rule, value) {
                errors.push(FieldError {
                    field: field.as_str().to_string(),
                    message,
                });
            }
        }
        errors
    }
}

fn check_rule(rule: &ValidationRule, value: &FieldValue) -> Option<String> {
    match rule {
        ValidationRule::Required => value
            .is_blank()
            .then(|| "This field is required".to_string()),
        ValidationRule::Email => {
            if value.is_blank() {
                return None;
            }
            let text = value.as_text();
            (!EMAIL_PATTERN.is_match(text.trim()))
                .then(|| "Enter a valid email address".to_string())
        }
        ValidationRule::PositiveNumber => match value.as_number() {
            Err(()) => Some("Must be a valid number".to_string()),
            Ok(Some(n)) if n <= Decimal::ZERO => {
                Some("Must be a positive number".to_string())
            }
            Ok(_) => None,
        },
        ValidationRule::NonNegativeNumber => match value.as_number() {
            Err(()) => Some("Must be a valid number".to_string()),
            Ok(Some(n)) if n < Decimal::ZERO => Some("Cannot be negative".to_string()),
            Ok(_) => None,
        },
        ValidationRule::MaxValue(max) => match value.as_number() {
            Ok(Some(n)) if n > *max => Some(format!("Must be at most {max}")),
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// ValidationState
// ---------------------------------------------------------------------------

/// Aggregated validity state: an error map (a field absent from the map is
/// currently valid) plus a monotonic touched set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationState {
    errors: BTreeMap<String, Vec<FieldError>>,
    touched: BTreeSet<String>,
}

impl ValidationState {
    /// Replace a field's error list; an empty list clears the entry.
    pub fn set_field_errors(&mut self, field: WizardField, errors: Vec<FieldError>) {
        if errors.is_empty() {
            self.errors.remove(field.as_str());
        } else {
            self.errors.insert(field.as_str().to_string(), errors);
        }
    }

    /// Touching is monotonic; only `reset` untouches.
    pub fn touch(&mut self, field: WizardField) {
        self.touched.insert(field.as_str().to_string());
    }

    pub fn is_touched(&self, field: WizardField) -> bool {
        self.touched.contains(field.as_str())
    }

    pub fn is_field_valid(&self, field: WizardField) -> bool {
        !self.errors.contains_key(field.as_str())
    }

    pub fn field_errors(&self, field: WizardField) -> &[FieldError] {
        self.errors
            .get(field.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All simultaneous errors for a field joined into one display string.
    pub fn error_message(&self, field: WizardField) -> Option<String> {
        let errors = self.errors.get(field.as_str())?;
        Some(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// The error shown to the user: only for touched fields, or once a
    /// blocked step transition forces `show_validation`.
    pub fn visible_error(&self, field: WizardField, show_validation: bool) -> Option<String> {
        if show_validation || self.is_touched(field) {
            self.error_message(field)
        } else {
            None
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        self.errors.clear();
        self.touched.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn engine() -> FieldValidationEngine {
        FieldValidationEngine::default()
    }

    #[test]
    fn test_required_rejects_blank_values() {
        for value in [
            FieldValue::Empty,
            FieldValue::Text(String::new()),
            FieldValue::Text("   ".into()),
        ] {
            let errors = engine().validate(WizardField::ContactName, &value);
            assert_eq!(errors.len(), 1, "value {value:?}");
            assert_eq!(errors[0].field, "contact_name");
        }
    }

    #[test]
    fn test_email_format() {
        let e = engine();
        assert!(e
            .validate(WizardField::Email, &FieldValue::Text("ana@empresa.es".into()))
            .is_empty());
        let errors = e.validate(WizardField::Email, &FieldValue::Text("not-an-email".into()));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("email"));
    }

    #[test]
    fn test_revenue_must_be_positive() {
        let e = engine();
        assert!(e
            .validate(WizardField::Revenue, &FieldValue::Number(dec!(1)))
            .is_empty());
        assert!(!e
            .validate(WizardField::Revenue, &FieldValue::Number(Decimal::ZERO))
            .is_empty());
        assert!(!e
            .validate(WizardField::Revenue, &FieldValue::Number(dec!(-5)))
            .is_empty());
    }

    #[test]
    fn test_ebitda_may_be_zero_but_not_negative() {
        let e = engine();
        assert!(e
            .validate(WizardField::Ebitda, &FieldValue::Number(Decimal::ZERO))
            .is_empty());
        assert!(!e
            .validate(WizardField::Ebitda, &FieldValue::Number(dec!(-1)))
            .is_empty());
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        let e = engine();
        assert!(e
            .validate(WizardField::Revenue, &FieldValue::Text("1500000".into()))
            .is_empty());
        let errors = e.validate(WizardField::Revenue, &FieldValue::Text("abc".into()));
        assert_eq!(errors[0].message, "Must be a valid number");
    }

    #[test]
    fn test_max_value_bound() {
        let e = engine();
        let errors = e.validate(
            WizardField::Revenue,
            &FieldValue::Number(dec!(2_000_000_000_000)),
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Must be at most"));
    }

    #[test]
    fn test_optional_fields_have_no_rules() {
        let e = engine();
        assert!(e.validate(WizardField::Phone, &FieldValue::Empty).is_empty());
        assert!(e
            .validate(WizardField::CompetitiveAdvantage, &FieldValue::Empty)
            .is_empty());
    }

    #[test]
    fn test_absent_field_is_valid() {
        let state = ValidationState::default();
        assert!(state.is_field_valid(WizardField::Revenue));
        assert_eq!(state.error_message(WizardField::Revenue), None);
    }

    #[test]
    fn test_errors_concatenated_into_display_string() {
        let mut state = ValidationState::default();
        state.set_field_errors(
            WizardField::Revenue,
            vec![
                FieldError {
                    field: "revenue".into(),
                    message: "This field is required".into(),
                },
                FieldError {
                    field: "revenue".into(),
                    message: "Must be a positive number".into(),
                },
            ],
        );
        assert_eq!(
            state.error_message(WizardField::Revenue).unwrap(),
            "This field is required; Must be a positive number"
        );
    }

    #[test]
    fn test_empty_error_list_clears_entry() {
        let mut state = ValidationState::default();
        state.set_field_errors(
            WizardField::Revenue,
            vec![FieldError {
                field: "revenue".into(),
                message: "Must be a positive number".into(),
            }],
        );
        assert!(!state.is_field_valid(WizardField::Revenue));
        state.set_field_errors(WizardField::Revenue, vec![]);
        assert!(state.is_field_valid(WizardField::Revenue));
    }

    #[test]
    fn test_visibility_gated_on_touched_or_forced() {
        let mut state = ValidationState::default();
        state.set_field_errors(
            WizardField::Email,
            vec![FieldError {
                field: "email".into(),
                message: "Enter a valid email address".into(),
            }],
        );

        // Untouched and not forced: internally invalid but not surfaced.
        assert!(!state.is_field_valid(WizardField::Email));
        assert_eq!(state.visible_error(WizardField::Email, false), None);

        state.touch(WizardField::Email);
        assert!(state.visible_error(WizardField::Email, false).is_some());

        // Forced visibility works without touching.
        let mut untouched = ValidationState::default();
        untouched.set_field_errors(
            WizardField::Email,
            vec![FieldError {
                field: "email".into(),
                message: "Enter a valid email address".into(),
            }],
        );
        assert!(untouched.visible_error(WizardField::Email, true).is_some());
    }

    #[test]
    fn test_touch_is_monotonic_until_reset() {
        let mut state = ValidationState::default();
        state.touch(WizardField::Revenue);
        state.touch(WizardField::Revenue);
        assert!(state.is_touched(WizardField::Revenue));

        state.reset();
        assert!(!state.is_touched(WizardField::Revenue));
        assert!(!state.has_errors());
    }
}
