pub mod controller;
pub mod validation;

pub use controller::{DraftProfile, WizardController, RESULTS_STEP, TOTAL_STEPS};
pub use validation::{
    FieldError, FieldValidationEngine, FieldValue, ValidationRule, ValidationState, WizardField,
};
