//! Form checks that stay on the originating screen. None of these change
//! the controller's state; they produce the inline message to show.

use thiserror::Error;
use time::{Date, OffsetDateTime};

use crate::assistant::QuestValidation;
use crate::defaults::Defaults;
use crate::types::QuestType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid code. Please try again.")]
    InvalidCode,
    #[error("Please enter all 6 digits of the code.")]
    IncompleteCode,
    #[error("Please enter a username and phone number.")]
    MissingSignupFields,
    #[error("Please enter a valid phone number.")]
    InvalidGuardianPhone,
    #[error("Please fill in every field and accept the terms.")]
    IncompleteAdultSignup,
    #[error("Please enter a valid bid amount.")]
    InvalidBidAmount,
    #[error("Please write a proposal of at least 20 characters.")]
    ProposalTooShort,
    #[error("Please fill in the title, description, and budget before analyzing.")]
    IncompleteAnalysisInput,
    #[error("Please fill in every field.")]
    IncompleteQuest,
    #[error("Please enter a valid budget.")]
    InvalidBudget,
    #[error("Please enter the deadline as YYYY-MM-DD.")]
    InvalidDeadline,
    #[error("Deadline must be in the future.")]
    DeadlineInPast,
    #[error("Analyze the quest with AI before posting.")]
    AnalysisRequired,
    #[error("This looks like a job posting, not a quest: {0}")]
    JobPosting(String),
    #[error("Please write something before submitting.")]
    EmptySubmission,
    #[error("Type a message first.")]
    EmptyMessage,
}

pub const MIN_PROPOSAL_CHARS: usize = 20;
pub const MIN_GUARDIAN_PHONE_CHARS: usize = 10;

/// Digits typed into the code boxes. Returns the six-digit code or the
/// reason it is not ready to submit.
pub fn entered_code(digits: &str) -> Result<String, ValidationError> {
    if digits.len() != Defaults::CODE_LENGTH || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::IncompleteCode);
    }
    Ok(digits.to_string())
}

/// Pasted text fills all boxes only when it holds exactly six digits.
pub fn pasted_code(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits.len() == Defaults::CODE_LENGTH).then_some(digits)
}

pub fn check_code(entered: &str, expected: &str) -> Result<(), ValidationError> {
    let entered = entered_code(entered)?;
    if entered == expected {
        Ok(())
    } else {
        Err(ValidationError::InvalidCode)
    }
}

pub fn teen_signup(username: &str, phone: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() || phone.trim().is_empty() {
        return Err(ValidationError::MissingSignupFields);
    }
    Ok(())
}

pub fn guardian_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().chars().count() < MIN_GUARDIAN_PHONE_CHARS {
        return Err(ValidationError::InvalidGuardianPhone);
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct AdultSignup {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub agreed: bool,
}

pub fn adult_signup(form: &AdultSignup) -> Result<(), ValidationError> {
    if form.full_name.is_empty() || form.email.is_empty() || form.password.is_empty() || !form.agreed {
        return Err(ValidationError::IncompleteAdultSignup);
    }
    Ok(())
}

/// 0..=4: longer than seven chars, has uppercase, has a digit, has a symbol.
pub fn password_strength(password: &str) -> u8 {
    let mut strength = 0;
    if password.chars().count() > 7 {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        strength += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        strength += 1;
    }
    strength
}

pub fn bid(amount: &str, proposal: &str) -> Result<u64, ValidationError> {
    let amount: u64 = amount.trim().parse().map_err(|_| ValidationError::InvalidBidAmount)?;
    bid_terms(amount, proposal)?;
    Ok(amount)
}

pub fn bid_terms(amount: u64, proposal: &str) -> Result<(), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::InvalidBidAmount);
    }
    if proposal.trim().chars().count() < MIN_PROPOSAL_CHARS {
        return Err(ValidationError::ProposalTooShort);
    }
    Ok(())
}

pub fn submission(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptySubmission);
    }
    Ok(())
}

/// Raw quest-creation form as typed.
#[derive(Debug, Clone)]
pub struct QuestForm {
    pub title: String,
    pub description: String,
    pub budget: String,
    pub deadline: String,
    pub kind: QuestType,
}

impl Default for QuestForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            budget: String::new(),
            deadline: String::new(),
            kind: QuestType::Professional,
        }
    }
}

impl QuestForm {
    /// Title, description and budget, checked enough to send for analysis.
    pub fn analysis_input(&self) -> Result<(String, String, u64), ValidationError> {
        if self.title.is_empty() || self.description.is_empty() || self.budget.is_empty() {
            return Err(ValidationError::IncompleteAnalysisInput);
        }
        let budget = parse_budget(&self.budget)?;
        Ok((self.title.clone(), self.description.clone(), budget))
    }

    /// Apply the assistant's rewrite: improved description, and the suggested
    /// budget ceiling when the proposed budget was judged unrealistic.
    pub fn use_suggestion(&mut self, analysis: &QuestValidation) {
        self.description = analysis.improved_description.clone();
        if !analysis.is_budget_realistic {
            self.budget = analysis.suggested_max_budget.round().max(0.0).to_string();
        }
    }
}

/// A quest ready to be posted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestDraft {
    pub title: String,
    pub description: String,
    pub budget: u64,
    pub kind: QuestType,
    pub deadline: OffsetDateTime,
}

fn parse_budget(raw: &str) -> Result<u64, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(b) if b > 0 => Ok(b),
        _ => Err(ValidationError::InvalidBudget),
    }
}

fn parse_deadline(raw: &str) -> Result<Date, ValidationError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), &format).map_err(|_| ValidationError::InvalidDeadline)
}

/// Check a quest form for posting. The deadline may be today but not earlier,
/// and the post must have passed an AI analysis that did not flag it as a job.
pub fn quest_draft(
    form: &QuestForm,
    analysis: Option<&QuestValidation>,
    now: OffsetDateTime,
) -> Result<QuestDraft, ValidationError> {
    if form.title.is_empty() || form.description.is_empty() || form.budget.is_empty() || form.deadline.is_empty() {
        return Err(ValidationError::IncompleteQuest);
    }
    let budget = parse_budget(&form.budget)?;
    let date = parse_deadline(&form.deadline)?;
    if date < now.date() {
        return Err(ValidationError::DeadlineInPast);
    }
    match analysis {
        None => return Err(ValidationError::AnalysisRequired),
        Some(a) if a.is_job_posting => return Err(ValidationError::JobPosting(a.job_posting_reason.clone())),
        Some(_) => {}
    }
    Ok(QuestDraft {
        title: form.title.clone(),
        description: form.description.clone(),
        budget,
        kind: form.kind,
        deadline: date.midnight().assume_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn analysis(job: bool) -> QuestValidation {
        QuestValidation {
            is_job_posting: job,
            job_posting_reason: if job { "Full-time role".into() } else { String::new() },
            is_budget_realistic: false,
            suggested_max_budget: 2500.0,
            suggestion: "Be specific".into(),
            improved_description: "A crisper description".into(),
        }
    }

    fn form() -> QuestForm {
        QuestForm {
            title: "Logo".into(),
            description: "Make a logo".into(),
            budget: "1500".into(),
            deadline: "2030-01-05".into(),
            kind: QuestType::Creative,
        }
    }

    #[test]
    fn code_must_match_exactly() {
        assert_eq!(check_code("111111", "111111"), Ok(()));
        assert_eq!(check_code("123456", "111111"), Err(ValidationError::InvalidCode));
        assert_eq!(check_code("11111", "111111"), Err(ValidationError::IncompleteCode));
        assert_eq!(check_code("11a111", "111111"), Err(ValidationError::IncompleteCode));
    }

    #[test]
    fn paste_keeps_digits_only() {
        assert_eq!(pasted_code("111-111"), Some("111111".into()));
        assert_eq!(pasted_code("12345"), None);
    }

    #[test]
    fn bid_rules() {
        assert_eq!(bid("4000", "I have designed twenty logos before."), Ok(4000));
        assert_eq!(bid("0", "I have designed twenty logos before."), Err(ValidationError::InvalidBidAmount));
        assert_eq!(bid("abc", "I have designed twenty logos before."), Err(ValidationError::InvalidBidAmount));
        assert_eq!(bid("10", "   too short   "), Err(ValidationError::ProposalTooShort));
    }

    #[test]
    fn guardian_phone_needs_ten_chars() {
        assert!(guardian_phone("999888777").is_err());
        assert!(guardian_phone(" 9998887777 ").is_ok());
    }

    #[test]
    fn adult_signup_needs_terms() {
        let mut f = AdultSignup {
            full_name: "Priya".into(),
            email: "p@x.in".into(),
            password: "pw".into(),
            agreed: false,
        };
        assert!(adult_signup(&f).is_err());
        f.agreed = true;
        assert!(adult_signup(&f).is_ok());
    }

    #[test]
    fn strength_scores() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abcdefgh"), 1);
        assert_eq!(password_strength("Abcdefg1!"), 4);
    }

    #[test]
    fn draft_requires_clean_analysis() {
        let now = datetime!(2030-01-01 12:00 UTC);
        assert_eq!(quest_draft(&form(), None, now), Err(ValidationError::AnalysisRequired));
        assert!(matches!(quest_draft(&form(), Some(&analysis(true)), now), Err(ValidationError::JobPosting(_))));

        let draft = quest_draft(&form(), Some(&analysis(false)), now).unwrap();
        assert_eq!(draft.budget, 1500);
        assert_eq!(draft.deadline, datetime!(2030-01-05 0:00 UTC));
    }

    #[test]
    fn draft_deadline_today_is_fine_yesterday_is_not() {
        let now = datetime!(2030-01-05 18:00 UTC);
        assert!(quest_draft(&form(), Some(&analysis(false)), now).is_ok());
        let later = datetime!(2030-01-06 0:00 UTC);
        assert_eq!(quest_draft(&form(), Some(&analysis(false)), later), Err(ValidationError::DeadlineInPast));
    }

    #[test]
    fn suggestion_rewrites_description_and_budget() {
        let mut f = form();
        f.use_suggestion(&analysis(false));
        assert_eq!(f.description, "A crisper description");
        assert_eq!(f.budget, "2500");
    }
}
