use serde::Serialize;

use crate::error::ValuarError;
use crate::scenarios::ScenarioResult;
use crate::strategy::{create_strategy, StrategyConfig};
use crate::types::{CompanyFinancialProfile, Money, ValuationResult};
use crate::wizard::validation::{
    FieldValidationEngine, FieldValue, ValidationState, WizardField,
};
use crate::ValuarResult;

/// Steps: 1 Identification, 2 Financials, 3 Qualitative, 4 Results.
pub const TOTAL_STEPS: u8 = 4;
pub const RESULTS_STEP: u8 = TOTAL_STEPS;

const STEP_IDENTIFICATION: &[WizardField] = &[
    WizardField::ContactName,
    WizardField::Email,
    WizardField::Phone,
    WizardField::CompanyName,
];
const STEP_FINANCIALS: &[WizardField] = &[
    WizardField::Industry,
    WizardField::Revenue,
    WizardField::Ebitda,
];
const STEP_QUALITATIVE: &[WizardField] = &[
    WizardField::Location,
    WizardField::CompetitiveAdvantage,
];

/// Working copy of the profile while the wizard collects it. Numeric fields
/// stay optional until the user supplies a parseable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DraftProfile {
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub industry: String,
    pub revenue: Option<Money>,
    pub ebitda: Option<Money>,
    pub location: String,
    pub competitive_advantage: String,
}

/// Orchestrates step progression, feeds field edits to the validation
/// engine, and invokes the selected strategy once the data is complete.
#[derive(Debug)]
pub struct WizardController {
    engine: FieldValidationEngine,
    validation: ValidationState,
    draft: DraftProfile,
    current_step: u8,
    show_validation: bool,
    strategy_tag: String,
    config: StrategyConfig,
    result: Option<ValuationResult>,
    scenarios: Option<Vec<ScenarioResult>>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new("simple", StrategyConfig::default())
    }
}

impl WizardController {
    pub fn new(strategy_tag: impl Into<String>, config: StrategyConfig) -> Self {
        Self {
            engine: FieldValidationEngine::default(),
            validation: ValidationState::default(),
            draft: DraftProfile::default(),
            current_step: 1,
            show_validation: false,
            strategy_tag: strategy_tag.into(),
            config,
            result: None,
            scenarios: None,
        }
    }

    pub fn fields_for_step(step: u8) -> &'static [WizardField] {
        match step {
            1 => STEP_IDENTIFICATION,
            2 => STEP_FINANCIALS,
            3 => STEP_QUALITATIVE,
            _ => &[],
        }
    }

    // -- field edits --------------------------------------------------------

    /// Write a field into the draft and synchronously re-validate just that
    /// field. Does not mark the field touched.
    pub fn update_field(&mut self, field: WizardField, value: FieldValue) {
        self.store(field, &value);
        let errors = self.engine.validate(field, &value);
        self.validation.set_field_errors(field, errors);
    }

    /// Blur marks the field touched; touched state only controls when an
    /// error is surfaced, not whether the field is valid.
    pub fn handle_field_blur(&mut self, field: WizardField) {
        self.mark_field_touched(field);
    }

    pub fn mark_field_touched(&mut self, field: WizardField) {
        self.validation.touch(field);
    }

    fn store(&mut self, field: WizardField, value: &FieldValue) {
        match field {
            WizardField::ContactName => self.draft.contact_name = value.as_text(),
            WizardField::Email => self.draft.email = value.as_text(),
            WizardField::Phone => self.draft.phone = value.as_text(),
            WizardField::CompanyName => self.draft.company_name = value.as_text(),
            WizardField::Industry => self.draft.industry = value.as_text(),
            WizardField::Revenue => self.draft.revenue = value.as_number().unwrap_or(None),
            WizardField::Ebitda => self.draft.ebitda = value.as_number().unwrap_or(None),
            WizardField::Location => self.draft.location = value.as_text(),
            WizardField::CompetitiveAdvantage => {
                self.draft.competitive_advantage = value.as_text()
            }
        }
    }

    fn current_value(&self, field: WizardField) -> FieldValue {
        fn text(s: &str) -> FieldValue {
            if s.trim().is_empty() {
                FieldValue::Empty
            } else {
                FieldValue::Text(s.to_string())
            }
        }
        match field {
            WizardField::ContactName => text(&self.draft.contact_name),
            WizardField::Email => text(&self.draft.email),
            WizardField::Phone => text(&self.draft.phone),
            WizardField::CompanyName => text(&self.draft.company_name),
            WizardField::Industry => text(&self.draft.industry),
            WizardField::Revenue => self
                .draft
                .revenue
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Empty),
            WizardField::Ebitda => self
                .draft
                .ebitda
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Empty),
            WizardField::Location => text(&self.draft.location),
            WizardField::CompetitiveAdvantage => text(&self.draft.competitive_advantage),
        }
    }

    // -- step progression ---------------------------------------------------

    /// Validity of the current step's fields, independent of touched state.
    pub fn is_current_step_valid(&self) -> bool {
        Self::fields_for_step(self.current_step)
            .iter()
            .all(|&field| {
                self.engine
                    .validate(field, &self.current_value(field))
                    .is_empty()
            })
    }

    /// Guarded advance: touches and re-validates the whole step so errors
    /// become visible, then either blocks (setting `show_validation`) or
    /// advances. Returns whether the step advanced.
    pub fn next_step(&mut self) -> bool {
        for &field in Self::fields_for_step(self.current_step) {
            self.validation.touch(field);
            let errors = self.engine.validate(field, &self.current_value(field));
            self.validation.set_field_errors(field, errors);
        }

        if !self.is_current_step_valid() {
            self.show_validation = true;
            return false;
        }

        self.show_validation = false;
        self.current_step = (self.current_step + 1).min(TOTAL_STEPS);
        true
    }

    /// Going back always succeeds.
    pub fn prev_step(&mut self) {
        self.current_step = self.current_step.saturating_sub(1).max(1);
        self.show_validation = false;
    }

    /// Direct jump, bounds-clamped but deliberately unguarded: sequential
    /// advance validates, arbitrary jumps do not.
    pub fn go_to_step(&mut self, step: u8) {
        self.current_step = step.clamp(1, TOTAL_STEPS);
    }

    // -- calculation --------------------------------------------------------

    /// Run the selected strategy over the collected data, store the result
    /// and scenarios, and force the wizard onto the results step.
    pub fn calculate_valuation(&mut self) -> ValuarResult<()> {
        let profile = self.build_profile()?;
        let strategy = create_strategy(&self.strategy_tag, self.config);

        let result = strategy.calculate(&profile)?;
        self.scenarios = strategy.generate_scenarios(&profile)?;
        self.result = Some(result);
        self.current_step = RESULTS_STEP;
        Ok(())
    }

    fn build_profile(&self) -> ValuarResult<CompanyFinancialProfile> {
        let revenue = self.draft.revenue.ok_or_else(|| ValuarError::InvalidInput {
            field: "revenue".into(),
            reason: "Revenue is required before calculating".into(),
        })?;
        let ebitda = self.draft.ebitda.ok_or_else(|| ValuarError::InvalidInput {
            field: "ebitda".into(),
            reason: "EBITDA is required before calculating".into(),
        })?;

        fn optional(s: &str) -> Option<String> {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        Ok(CompanyFinancialProfile {
            contact_name: self.draft.contact_name.clone(),
            email: self.draft.email.clone(),
            phone: self.draft.phone.clone(),
            company_name: self.draft.company_name.clone(),
            industry: self.draft.industry.clone(),
            revenue,
            ebitda,
            location: optional(&self.draft.location),
            competitive_advantage: optional(&self.draft.competitive_advantage),
            has_recurring_revenue: None,
            owner_dependent: None,
        })
    }

    /// Restore the initial state: default draft, cleared validation, no
    /// result, step 1. The selected strategy is kept.
    pub fn reset(&mut self) {
        self.draft = DraftProfile::default();
        self.validation.reset();
        self.current_step = 1;
        self.show_validation = false;
        self.result = None;
        self.scenarios = None;
    }

    // -- accessors ----------------------------------------------------------

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn show_validation(&self) -> bool {
        self.show_validation
    }

    pub fn result(&self) -> Option<&ValuationResult> {
        self.result.as_ref()
    }

    pub fn scenarios(&self) -> Option<&[ScenarioResult]> {
        self.scenarios.as_deref()
    }

    pub fn draft(&self) -> &DraftProfile {
        &self.draft
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    /// The error currently surfaced to the user for a field, honoring the
    /// touched/show_validation gating.
    pub fn visible_error(&self, field: WizardField) -> Option<String> {
        self.validation.visible_error(field, self.show_validation)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
