//! Intake wizard state.
//!
//! The multi-step intake is a linear state machine driven by an explicit
//! `WizardState` value the caller threads through each step handler —
//! there is no ambient session global. The state holds which student the
//! session is building and the session's role; the role check is a
//! capability gate, not a machine state.

use thiserror::Error;

/// Internal student key (the `students.id` column).
pub type StudentKey = i64;

/// Session role supplied by the identity/session layer. The core trusts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

/// The wizard steps, in their only allowed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Identity,
    Admission,
    Courses,
    Research,
    Competency,
    CommitteePlan,
    Review,
}

impl Step {
    pub fn first() -> Step {
        Step::Identity
    }

    /// The step after this one; `None` at the terminal Review step.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Identity => Some(Step::Admission),
            Step::Admission => Some(Step::Courses),
            Step::Courses => Some(Step::Research),
            Step::Research => Some(Step::Competency),
            Step::Competency => Some(Step::CommitteePlan),
            Step::CommitteePlan => Some(Step::Review),
            Step::Review => None,
        }
    }
}

/// Where a step entry should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step may render/save.
    Proceed,
    /// No student is selected yet; dependents cannot be saved for an
    /// unknown student. Go back to Identity.
    RedirectToIdentity,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    /// Role mismatch: a student session attempted a wizard operation.
    /// Fails closed with no partial effect.
    #[error("Permission denied: administrative operation")]
    PermissionDenied,
}

/// Per-session intake progress.
#[derive(Debug, Clone)]
pub struct WizardState {
    current_student: Option<StudentKey>,
    role: Role,
}

impl WizardState {
    pub fn new(role: Role) -> Self {
        Self {
            current_student: None,
            role,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn current_student(&self) -> Option<StudentKey> {
        self.current_student
    }

    fn require_admin(&self) -> Result<(), WizardError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Student => Err(WizardError::PermissionDenied),
        }
    }

    /// Guard for entering a step. Students are barred from every step;
    /// any step past Identity without a selected student redirects back.
    pub fn enter(&self, step: Step) -> Result<StepOutcome, WizardError> {
        self.require_admin()?;
        if step != Step::Identity && self.current_student.is_none() {
            return Ok(StepOutcome::RedirectToIdentity);
        }
        Ok(StepOutcome::Proceed)
    }

    /// Records a successful Identity save (the key comes from the insert,
    /// or is the existing key when editing) and advances to Admission.
    pub fn complete_identity(&mut self, key: StudentKey) -> Result<Step, WizardError> {
        self.require_admin()?;
        self.current_student = Some(key);
        Ok(Step::Admission)
    }

    /// Records a successful save of a dependent step and returns the step
    /// to advance to. Without a selected student this lands on Identity;
    /// Review is terminal.
    pub fn advance(&mut self, step: Step) -> Result<Step, WizardError> {
        self.require_admin()?;
        if self.current_student.is_none() {
            return Ok(Step::Identity);
        }
        Ok(step.next().unwrap_or(Step::Review))
    }

    /// Admin shortcut: select an existing student and jump to editing at
    /// Identity. This and `open_review` are the only non-linear entries.
    pub fn open_record(&mut self, key: StudentKey) -> Result<Step, WizardError> {
        self.require_admin()?;
        self.current_student = Some(key);
        Ok(Step::Identity)
    }

    /// Admin shortcut: select an existing student and jump to Review.
    pub fn open_review(&mut self, key: StudentKey) -> Result<Step, WizardError> {
        self.require_admin()?;
        self.current_student = Some(key);
        Ok(Step::Review)
    }

    /// Clears the selected student for a fresh intake. Saved students are
    /// untouched.
    pub fn reset(&mut self) -> Step {
        self.current_student = None;
        Step::Identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_order() {
        let mut step = Step::first();
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            seen.push(next);
            step = next;
        }
        assert_eq!(
            seen,
            vec![
                Step::Identity,
                Step::Admission,
                Step::Courses,
                Step::Research,
                Step::Competency,
                Step::CommitteePlan,
                Step::Review,
            ]
        );
    }

    #[test]
    fn test_dependent_step_without_student_redirects() {
        let state = WizardState::new(Role::Admin);
        assert_eq!(state.enter(Step::Identity).unwrap(), StepOutcome::Proceed);
        assert_eq!(
            state.enter(Step::Admission).unwrap(),
            StepOutcome::RedirectToIdentity
        );
        assert_eq!(
            state.enter(Step::Review).unwrap(),
            StepOutcome::RedirectToIdentity
        );
    }

    #[test]
    fn test_full_flow() {
        let mut state = WizardState::new(Role::Admin);
        assert_eq!(state.complete_identity(7).unwrap(), Step::Admission);
        assert_eq!(state.current_student(), Some(7));

        assert_eq!(state.enter(Step::Admission).unwrap(), StepOutcome::Proceed);
        assert_eq!(state.advance(Step::Admission).unwrap(), Step::Courses);
        assert_eq!(state.advance(Step::Courses).unwrap(), Step::Research);
        assert_eq!(state.advance(Step::Research).unwrap(), Step::Competency);
        assert_eq!(state.advance(Step::Competency).unwrap(), Step::CommitteePlan);
        assert_eq!(state.advance(Step::CommitteePlan).unwrap(), Step::Review);
        // Review is terminal.
        assert_eq!(state.advance(Step::Review).unwrap(), Step::Review);
    }

    #[test]
    fn test_student_role_is_barred() {
        let mut state = WizardState::new(Role::Student);
        assert_eq!(
            state.enter(Step::Identity).unwrap_err(),
            WizardError::PermissionDenied
        );
        assert_eq!(
            state.complete_identity(1).unwrap_err(),
            WizardError::PermissionDenied
        );
        assert_eq!(
            state.open_review(1).unwrap_err(),
            WizardError::PermissionDenied
        );
        // Failed closed: nothing was selected.
        assert_eq!(state.current_student(), None);
    }

    #[test]
    fn test_open_existing_record() {
        let mut state = WizardState::new(Role::Admin);
        assert_eq!(state.open_review(42).unwrap(), Step::Review);
        assert_eq!(state.current_student(), Some(42));

        assert_eq!(state.open_record(43).unwrap(), Step::Identity);
        assert_eq!(state.current_student(), Some(43));
    }

    #[test]
    fn test_reset_clears_selection() {
        let mut state = WizardState::new(Role::Admin);
        state.complete_identity(7).unwrap();
        assert_eq!(state.reset(), Step::Identity);
        assert_eq!(state.current_student(), None);
        assert_eq!(
            state.enter(Step::Admission).unwrap(),
            StepOutcome::RedirectToIdentity
        );
    }
}
