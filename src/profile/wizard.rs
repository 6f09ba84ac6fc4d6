//! Step state for the "complete your profile" wizard.
//!
//! The wizard owns the draft, the availability map and the inline error
//! messages. It gates forward movement on the validators of the active step
//! and tells the caller when the final step was accepted so it can submit.
//!
//! ```text
//!  cliente:               1 Personal ─▶ 2 Address ─▶ 3 Role ─▶ submit
//!  trabajador / ambos:    1 Personal ─▶ 2 Address ─▶ 3 Role ─▶ 4 Worker ─▶ submit
//! ```

use crate::profile::availability::AvailabilityMap;
use crate::profile::draft::{Field, ProfileDraft, Role};
use std::collections::{BTreeMap, BTreeSet};

/// Wizard steps, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Personal,
    Address,
    Role,
    Worker,
}

impl Step {
    pub fn from_number(number: usize) -> Option<Step> {
        match number {
            1 => Some(Step::Personal),
            2 => Some(Step::Address),
            3 => Some(Step::Role),
            4 => Some(Step::Worker),
            _ => None,
        }
    }

    pub fn number(&self) -> usize {
        match self {
            Step::Personal => 1,
            Step::Address => 2,
            Step::Role => 3,
            Step::Worker => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Personal => "Datos personales",
            Step::Address => "Dirección",
            Step::Role => "Rol",
            Step::Worker => "Profesión & Experiencia",
        }
    }

    /// Validated fields of the step. The role step has none.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Step::Personal => &[
                Field::FirstName,
                Field::LastName,
                Field::Phone,
                Field::Description,
            ],
            Step::Address => &[Field::Address],
            Step::Role => &[],
            Step::Worker => &[
                Field::Profession,
                Field::YearsExperience,
                Field::ShortDescription,
                Field::Languages,
            ],
        }
    }
}

/// Completion of the required fields of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    pub completed: usize,
    pub total: usize,
}

impl StepProgress {
    /// Fraction in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn label(&self) -> String {
        format!("{} de {} campos", self.completed, self.total)
    }
}

/// What happened on a forward request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Validation passed and the wizard moved to this step number.
    Moved(usize),
    /// The current step has errors; they are now visible.
    Blocked,
    /// The final step is valid; the caller should submit.
    Submit,
    /// A submission is already in flight.
    Busy,
}

/// State container for the profile wizard.
#[derive(Debug, Clone)]
pub struct ProfileWizard {
    draft: ProfileDraft,
    availability: AvailabilityMap,
    selected_services: Vec<u64>,
    current: usize,
    errors: BTreeMap<Field, String>,
    touched: BTreeSet<Field>,
    submitting: bool,
}

impl Default for ProfileWizard {
    fn default() -> Self {
        Self::new(ProfileDraft::default())
    }
}

impl ProfileWizard {
    pub fn new(draft: ProfileDraft) -> Self {
        Self {
            draft,
            availability: AvailabilityMap::new(),
            selected_services: Vec::new(),
            current: 1,
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            submitting: false,
        }
    }

    /// Replace the draft and availability with data loaded from the backend.
    ///
    /// Errors are cleared and the wizard returns to the first step.
    pub fn prefill(&mut self, draft: ProfileDraft, availability: AvailabilityMap, services: Vec<u64>) {
        self.draft = draft;
        self.availability = availability;
        self.selected_services = services;
        self.errors.clear();
        self.touched.clear();
        self.current = 1;
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    pub fn availability(&self) -> &AvailabilityMap {
        &self.availability
    }

    pub fn availability_mut(&mut self) -> &mut AvailabilityMap {
        &mut self.availability
    }

    pub fn selected_services(&self) -> &[u64] {
        &self.selected_services
    }

    /// Select or deselect an offered service.
    pub fn toggle_service(&mut self, id: u64) {
        if let Some(pos) = self.selected_services.iter().position(|s| *s == id) {
            self.selected_services.remove(pos);
        } else {
            self.selected_services.push(id);
        }
    }

    /// 3 for clients, 4 for worker roles.
    pub fn total_steps(&self) -> usize {
        if self.draft.role.is_worker() {
            4
        } else {
            3
        }
    }

    /// Current step number, 1-based.
    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step(&self) -> Step {
        Step::from_number(self.current).unwrap_or(Step::Personal)
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.total_steps()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Inline error for a field, if one is showing.
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    /// Store typed text for a field and validate it.
    ///
    /// Once a field has received input its validator runs on every change, so
    /// the inline message follows the text as it is typed.
    pub fn set_field(&mut self, field: Field, value: &str) {
        self.draft.set_value(field, value);
        self.touched.insert(field);
        match (field.validator())(value) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// True once the field received input since the last prefill.
    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Change role. If the wizard was past the last step of the new role it is pulled back.
    pub fn set_role(&mut self, role: Role) {
        self.draft.role = role;
        if self.current > self.total_steps() {
            self.current = self.total_steps();
        }
        if !role.is_worker() {
            for field in Step::Worker.fields() {
                self.errors.remove(field);
            }
        }
    }

    /// Run the validators of a step without touching the visible errors.
    pub fn validate_step(&self, step: Step) -> BTreeMap<Field, String> {
        step.fields()
            .iter()
            .filter_map(|field| {
                (field.validator())(&self.draft.value(*field)).map(|message| (*field, message))
            })
            .collect()
    }

    /// Validate the current step and move forward, or report that the final step is ready.
    pub fn advance(&mut self) -> Advance {
        if self.submitting {
            return Advance::Busy;
        }

        let step = self.step();
        let step_errors = self.validate_step(step);
        for field in step.fields() {
            self.errors.remove(field);
        }
        if !step_errors.is_empty() {
            self.errors.extend(step_errors);
            return Advance::Blocked;
        }

        if self.is_last_step() {
            Advance::Submit
        } else {
            self.current += 1;
            Advance::Moved(self.current)
        }
    }

    /// Go back one step without validating. Returns false on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Filled required fields of a step.
    pub fn progress(&self, step: Step) -> StepProgress {
        if step == Step::Role {
            // A role is always selected.
            return StepProgress {
                completed: 1,
                total: 1,
            };
        }
        let fields = step.fields();
        let completed = fields
            .iter()
            .filter(|f| !self.draft.value(**f).trim().is_empty())
            .count();
        StepProgress {
            completed,
            total: fields.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_personal(wizard: &mut ProfileWizard) {
        wizard.set_field(Field::FirstName, "Ana");
        wizard.set_field(Field::LastName, "Pérez");
        wizard.set_field(Field::Phone, "+56912345678");
        wizard.set_field(
            Field::Description,
            "Vivo en Santiago y busco servicios confiables para mi hogar.",
        );
    }

    #[test]
    fn test_client_wizard_has_three_steps() {
        let mut wizard = ProfileWizard::default();
        assert_eq!(wizard.total_steps(), 3);

        fill_personal(&mut wizard);
        assert_eq!(wizard.advance(), Advance::Moved(2));
        wizard.set_field(Field::Address, "Calle Libertad 123");
        assert_eq!(wizard.advance(), Advance::Moved(3));
        assert!(wizard.is_last_step());
        assert_eq!(wizard.advance(), Advance::Submit);
        assert_eq!(wizard.current_step(), 3);
    }

    #[test]
    fn test_worker_wizard_submits_on_step_four() {
        let mut wizard = ProfileWizard::default();
        wizard.set_role(Role::Trabajador);
        assert_eq!(wizard.total_steps(), 4);

        fill_personal(&mut wizard);
        wizard.advance();
        wizard.set_field(Field::Address, "Calle Libertad 123");
        wizard.advance();
        assert_eq!(wizard.advance(), Advance::Moved(4));

        assert_eq!(wizard.advance(), Advance::Blocked);
        assert_eq!(wizard.errors().len(), 4);

        wizard.set_field(Field::Profession, "2");
        wizard.set_field(Field::YearsExperience, "5");
        wizard.set_field(Field::ShortDescription, "Gasfíter certificado");
        wizard.set_field(Field::Languages, "Español");
        assert!(wizard.errors().is_empty());
        assert_eq!(wizard.advance(), Advance::Submit);
    }

    #[test]
    fn test_blocked_advance_keeps_step_and_shows_errors() {
        let mut wizard = ProfileWizard::default();
        wizard.set_field(Field::FirstName, "Ana123");
        assert_eq!(wizard.advance(), Advance::Blocked);
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.error(Field::FirstName).unwrap().contains("letras"));
        assert!(wizard.error(Field::Phone).is_some());
    }

    #[test]
    fn test_error_clears_on_next_valid_keystroke() {
        let mut wizard = ProfileWizard::default();
        wizard.set_field(Field::FirstName, "Ana123");
        wizard.advance();
        assert!(wizard.error(Field::FirstName).is_some());

        wizard.set_field(Field::FirstName, "Ana12");
        assert!(wizard.error(Field::FirstName).is_some());
        wizard.set_field(Field::FirstName, "Ana");
        assert!(wizard.error(Field::FirstName).is_none());
    }

    #[test]
    fn test_retreat_skips_validation() {
        let mut wizard = ProfileWizard::default();
        fill_personal(&mut wizard);
        wizard.advance();
        assert!(wizard.retreat());
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.error(Field::Address).is_none());
        assert!(wizard.errors().is_empty());
        assert!(!wizard.retreat());
    }

    #[test]
    fn test_typing_validates_without_advance() {
        let mut wizard = ProfileWizard::default();
        assert!(!wizard.is_touched(Field::FirstName));

        wizard.set_field(Field::FirstName, "Ana123");
        assert!(wizard.is_touched(Field::FirstName));
        assert!(wizard.error(Field::FirstName).unwrap().contains("letras"));
        assert!(wizard.error(Field::LastName).is_none());
        assert_eq!(wizard.current_step(), 1);

        wizard.set_field(Field::FirstName, "Ana");
        assert!(wizard.error(Field::FirstName).is_none());
    }

    #[test]
    fn test_prefill_forgets_touched_fields() {
        let mut wizard = ProfileWizard::default();
        wizard.set_field(Field::Phone, "123");
        assert!(wizard.error(Field::Phone).is_some());

        wizard.prefill(ProfileDraft::default(), AvailabilityMap::new(), Vec::new());
        assert!(!wizard.is_touched(Field::Phone));
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn test_switching_to_client_on_step_four_clamps() {
        let mut wizard = ProfileWizard::default();
        wizard.set_role(Role::Ambos);
        fill_personal(&mut wizard);
        wizard.advance();
        wizard.set_field(Field::Address, "Calle Libertad 123");
        wizard.advance();
        wizard.advance();
        assert_eq!(wizard.current_step(), 4);

        wizard.set_role(Role::Cliente);
        assert_eq!(wizard.current_step(), 3);
        assert_eq!(wizard.advance(), Advance::Submit);
    }

    #[test]
    fn test_busy_while_submitting() {
        let mut wizard = ProfileWizard::default();
        wizard.set_submitting(true);
        assert_eq!(wizard.advance(), Advance::Busy);
        assert_eq!(wizard.current_step(), 1);
    }

    #[test]
    fn test_progress_counts_filled_fields() {
        let mut wizard = ProfileWizard::default();
        assert_eq!(wizard.progress(Step::Personal).label(), "0 de 4 campos");
        wizard.set_field(Field::FirstName, "Ana");
        wizard.set_field(Field::Phone, "   ");
        let progress = wizard.progress(Step::Personal);
        assert_eq!(progress, StepProgress { completed: 1, total: 4 });
        assert!((progress.ratio() - 0.25).abs() < f64::EPSILON);
        assert_eq!(wizard.progress(Step::Role).label(), "1 de 1 campos");
        assert_eq!(wizard.progress(Step::Address).completed, 0);
    }

    #[test]
    fn test_toggle_service() {
        let mut wizard = ProfileWizard::default();
        wizard.toggle_service(3);
        wizard.toggle_service(5);
        wizard.toggle_service(3);
        assert_eq!(wizard.selected_services(), &[5]);
    }
}
