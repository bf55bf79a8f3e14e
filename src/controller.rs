//! The application state machine.
//!
//! One [`Controller`] owns everything that changes while the app runs: the
//! current [`Screen`], the signed-in user, the quest collection and whatever a
//! flow is carrying between screens. Screens render from it and call back into
//! it through the handlers below; nothing else mutates it.
//!
//! Handlers are synchronous. Work that has to wait on the outside world (code
//! delivery, AI calls) is recorded as the single outstanding [`PendingCall`] and
//! performed by [`Controller::run_pending`], so the guard screen (e.g.
//! `submitting_task`) can be drawn before the call starts. Artificial delays are
//! a [`ScheduledAdvance`] owned by the current screen: any screen change drops
//! it, so a delay can never fire after the user has navigated away.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assistant::{Assistant, QuestValidation};
use crate::config::{Config, TimingConfig};
use crate::defaults::Defaults;
use crate::fixtures::Fixtures;
use crate::otp::{Channel, CodeSender};
use crate::types::{
    Bid, ChatMessage, ChatRole, Pricing, Quest, QuestBook, QuestId, QuestStatus, Submission, Tribe, TribeMember,
    TribeWar, User,
};
use crate::validation::{self, AdultSignup, QuestForm, ValidationError};
use crate::verification::{ChallengeKind, PhotoCheck, PhotoPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainView {
    #[default]
    Home,
    Quests,
    Tribes,
    Profile,
}

impl MainView {
    pub fn all() -> [MainView; 4] {
        [MainView::Home, MainView::Quests, MainView::Tribes, MainView::Profile]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MainView::Home => "Home",
            MainView::Quests => "Quests",
            MainView::Tribes => "Tribes",
            MainView::Profile => "Profile",
        }
    }
}

/// Where an issued code was sent and what the user has to type back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCheck {
    pub contact: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Splash,
    AgeSelection,
    TeenSignup,
    TeenOtpVerification(CodeCheck),
    GuardianVerification,
    GuardianOtpVerification(CodeCheck),
    AdultSignup,
    AdultOtpVerification(CodeCheck),
    KycVerification(PhotoCheck),
    PaymentSetup,
    ProfileSetup,
    OnboardingComplete,
    MainApp(MainView),
    QuestDetail { quest_id: QuestId },
    QuestApplication { quest_id: QuestId },
    ApplicationSubmitted { quest_id: QuestId },
    QuestBidding { quest_id: QuestId },
    BidSubmitted { quest_id: QuestId },
    ActiveTask { quest_id: QuestId },
    SubmittingTask { quest_id: QuestId },
    SubmissionConfirmation { quest_id: QuestId },
    QuestPhotoVerification { quest_id: QuestId, check: PhotoCheck },
    SubmissionRejected { quest_id: QuestId, reason: String },
    QuestComplete { quest_id: QuestId, credited: u64 },
    TribeDetail(Tribe),
    CreateQuest { analysis: Option<QuestValidation> },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Splash => "splash",
            Screen::AgeSelection => "age_selection",
            Screen::TeenSignup => "teen_signup",
            Screen::TeenOtpVerification(_) => "teen_otp_verification",
            Screen::GuardianVerification => "guardian_verification",
            Screen::GuardianOtpVerification(_) => "guardian_otp_verification",
            Screen::AdultSignup => "adult_signup",
            Screen::AdultOtpVerification(_) => "adult_otp_verification",
            Screen::KycVerification(_) => "kyc_verification",
            Screen::PaymentSetup => "payment_setup",
            Screen::ProfileSetup => "profile_setup",
            Screen::OnboardingComplete => "onboarding_complete",
            Screen::MainApp(_) => "main_app",
            Screen::QuestDetail { .. } => "quest_detail",
            Screen::QuestApplication { .. } => "quest_application",
            Screen::ApplicationSubmitted { .. } => "application_submitted",
            Screen::QuestBidding { .. } => "quest_bidding",
            Screen::BidSubmitted { .. } => "bid_submitted",
            Screen::ActiveTask { .. } => "active_task",
            Screen::SubmittingTask { .. } => "submitting_task",
            Screen::SubmissionConfirmation { .. } => "submission_confirmation",
            Screen::QuestPhotoVerification { .. } => "quest_photo_verification",
            Screen::SubmissionRejected { .. } => "submission_rejected",
            Screen::QuestComplete { .. } => "quest_complete",
            Screen::TribeDetail(_) => "tribe_detail",
            Screen::CreateQuest { .. } => "create_quest",
        }
    }

    /// The quest a quest-flow screen is about.
    pub fn quest_id(&self) -> Option<&str> {
        match self {
            Screen::QuestDetail { quest_id }
            | Screen::QuestApplication { quest_id }
            | Screen::ApplicationSubmitted { quest_id }
            | Screen::QuestBidding { quest_id }
            | Screen::BidSubmitted { quest_id }
            | Screen::ActiveTask { quest_id }
            | Screen::SubmittingTask { quest_id }
            | Screen::SubmissionConfirmation { quest_id }
            | Screen::QuestPhotoVerification { quest_id, .. }
            | Screen::SubmissionRejected { quest_id, .. }
            | Screen::QuestComplete { quest_id, .. } => Some(quest_id),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{action} is not available on the {screen} screen")]
    Unavailable { action: &'static str, screen: &'static str },
    #[error("a request is already in flight")]
    Busy,
    #[error("nobody is signed in")]
    NoUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodePurpose {
    Teen { username: String },
    Guardian,
    Adult,
}

/// External work a handler started and the controller has not yet finished.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingCall {
    SendCode { channel: Channel, contact: String, purpose: CodePurpose },
    Moderate { quest_id: QuestId, content: String },
    Challenge { kind: ChallengeKind },
    VerifyPhoto { kind: ChallengeKind, photo: PhotoPayload, code: String },
    AnalyzeQuest { title: String, description: String, budget: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    LeaveSplash,
    ConfirmSubmission { quest_id: QuestId },
    IdentityVerified,
    QuestVerified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAdvance {
    pub due: Instant,
    pub advance: Advance,
}

/// The outside world the controller talks to.
#[derive(Clone)]
pub struct Services {
    pub assistant: Arc<dyn Assistant>,
    pub codes: Arc<dyn CodeSender>,
}

pub struct Controller {
    screen: Screen,
    last_view: MainView,
    user: Option<User>,
    quests: QuestBook,
    tribe_chat: Vec<ChatMessage>,
    fixtures: Fixtures,
    pending: Option<(Uuid, PendingCall)>,
    scheduled: Option<ScheduledAdvance>,
    notice: Option<String>,
    timing: TimingConfig,
    fallback_reward: u64,
    services: Services,
    clock: fn() -> OffsetDateTime,
}

type Flow = Result<(), FlowError>;

impl Controller {
    pub fn new(fixtures: Fixtures, services: Services, config: &Config) -> Self {
        let mut controller = Self {
            screen: Screen::Splash,
            last_view: MainView::Home,
            user: None,
            quests: fixtures.quests.clone(),
            tribe_chat: fixtures.tribe_chat.clone(),
            fixtures,
            pending: None,
            scheduled: None,
            notice: None,
            timing: config.timing.clone(),
            fallback_reward: config.rewards.fallback_reward,
            services,
            clock: OffsetDateTime::now_utc,
        };
        controller.schedule(controller.timing.splash(), Advance::LeaveSplash);
        controller
    }

    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /* ───────────── read side ───────────── */

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn quests(&self) -> &QuestBook {
        &self.quests
    }

    pub fn tribes(&self) -> &[Tribe] {
        &self.fixtures.tribes
    }

    pub fn home_tribe(&self) -> &Tribe {
        &self.fixtures.home_tribe
    }

    pub fn home_members(&self) -> &[TribeMember] {
        &self.fixtures.home_members
    }

    pub fn tribe_chat(&self) -> &[ChatMessage] {
        &self.tribe_chat
    }

    pub fn tribe_war(&self) -> &TribeWar {
        &self.fixtures.tribe_war
    }

    /// Quest the current screen is about. `None` on non-quest screens, and on
    /// a quest screen whose quest is gone, in which case the screen draws nothing.
    pub fn selected_quest(&self) -> Option<&Quest> {
        self.screen.quest_id().and_then(|id| self.quests.get(id))
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn pending(&self) -> Option<&PendingCall> {
        self.pending.as_ref().map(|(_, call)| call)
    }

    pub fn scheduled(&self) -> Option<&ScheduledAdvance> {
        self.scheduled.as_ref()
    }

    pub fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }

    /* ───────────── plumbing ───────────── */

    fn set_screen(&mut self, next: Screen) {
        if self.screen.name() != next.name() {
            info!(from = self.screen.name(), to = next.name(), "screen");
        }
        self.screen = next;
        self.scheduled = None;
        self.notice = None;
    }

    fn schedule(&mut self, after: std::time::Duration, advance: Advance) {
        debug!(?advance, ?after, "scheduled");
        self.scheduled = Some(ScheduledAdvance { due: Instant::now() + after, advance });
    }

    fn begin(&mut self, call: PendingCall) -> Flow {
        if self.pending.is_some() {
            return Err(FlowError::Busy);
        }
        let id = Uuid::new_v4();
        debug!(%id, ?call, "pending call");
        self.pending = Some((id, call));
        Ok(())
    }

    fn unavailable(&self, action: &'static str) -> FlowError {
        warn!(action, screen = self.screen.name(), "handler not available here");
        FlowError::Unavailable { action, screen: self.screen.name() }
    }

    fn enter_main(&mut self, view: MainView) {
        if self.user.is_none() {
            self.set_screen(Screen::AgeSelection);
            return;
        }
        self.last_view = view;
        self.set_screen(Screen::MainApp(view));
    }

    fn require_user(&self) -> Result<&User, FlowError> {
        self.user.as_ref().ok_or(FlowError::NoUser)
    }

    /* ───────────── onboarding ───────────── */

    pub fn dismiss_splash(&mut self) -> Flow {
        match self.screen {
            Screen::Splash => {
                self.set_screen(Screen::AgeSelection);
                Ok(())
            }
            _ => Err(self.unavailable("dismiss_splash")),
        }
    }

    pub fn select_teen(&mut self) -> Flow {
        match self.screen {
            Screen::AgeSelection => {
                self.set_screen(Screen::TeenSignup);
                Ok(())
            }
            _ => Err(self.unavailable("select_teen")),
        }
    }

    pub fn select_adult(&mut self) -> Flow {
        match self.screen {
            Screen::AgeSelection => {
                self.set_screen(Screen::AdultSignup);
                Ok(())
            }
            _ => Err(self.unavailable("select_adult")),
        }
    }

    /// Request a code for the teen's phone. Advances once the code is sent.
    pub fn teen_signup(&mut self, username: &str, phone: &str) -> Flow {
        if !matches!(self.screen, Screen::TeenSignup) {
            return Err(self.unavailable("teen_signup"));
        }
        validation::teen_signup(username, phone)?;
        self.begin(PendingCall::SendCode {
            channel: Channel::Sms,
            contact: phone.to_string(),
            purpose: CodePurpose::Teen { username: username.to_string() },
        })
    }

    pub fn guardian_verification(&mut self, phone: &str) -> Flow {
        if !matches!(self.screen, Screen::GuardianVerification) {
            return Err(self.unavailable("guardian_verification"));
        }
        validation::guardian_phone(phone)?;
        self.begin(PendingCall::SendCode {
            channel: Channel::Sms,
            contact: phone.to_string(),
            purpose: CodePurpose::Guardian,
        })
    }

    pub fn adult_signup(&mut self, form: &AdultSignup) -> Flow {
        if !matches!(self.screen, Screen::AdultSignup) {
            return Err(self.unavailable("adult_signup"));
        }
        validation::adult_signup(form)?;
        self.begin(PendingCall::SendCode {
            channel: Channel::Email,
            contact: form.email.clone(),
            purpose: CodePurpose::Adult,
        })
    }

    /// Compare the typed digits with the issued code. A mismatch leaves the
    /// screen as it is and reports the inline error.
    pub fn verify_code(&mut self, entered: &str) -> Flow {
        let (check, next) = match &self.screen {
            Screen::TeenOtpVerification(c) => (c, Screen::GuardianVerification),
            Screen::GuardianOtpVerification(c) => (c, Screen::MainApp(MainView::Home)),
            Screen::AdultOtpVerification(c) => (c, Screen::KycVerification(PhotoCheck::Idle)),
            _ => return Err(self.unavailable("verify_code")),
        };
        validation::check_code(entered, &check.expected)?;
        match next {
            Screen::MainApp(view) => self.enter_main(view),
            other => self.set_screen(other),
        }
        Ok(())
    }

    pub fn complete_kyc(&mut self) -> Flow {
        match &self.screen {
            Screen::KycVerification(check) if check.is_verified() => {
                self.set_screen(Screen::PaymentSetup);
                Ok(())
            }
            _ => Err(self.unavailable("complete_kyc")),
        }
    }

    pub fn complete_payment(&mut self) -> Flow {
        match self.screen {
            Screen::PaymentSetup => {
                self.set_screen(Screen::ProfileSetup);
                Ok(())
            }
            _ => Err(self.unavailable("complete_payment")),
        }
    }

    /// Adult accounts get their full profile here.
    pub fn complete_profile(&mut self) -> Flow {
        match self.screen {
            Screen::ProfileSetup => {
                self.user = Some(self.fixtures.adult_profile.clone());
                self.set_screen(Screen::OnboardingComplete);
                Ok(())
            }
            _ => Err(self.unavailable("complete_profile")),
        }
    }

    pub fn finish_onboarding(&mut self) -> Flow {
        match self.screen {
            Screen::OnboardingComplete => {
                self.enter_main(MainView::Home);
                Ok(())
            }
            _ => Err(self.unavailable("finish_onboarding")),
        }
    }

    /* ───────────── photo checks (KYC and quest completion) ───────────── */

    fn photo_check(&self) -> Option<(&PhotoCheck, ChallengeKind)> {
        match &self.screen {
            Screen::KycVerification(check) => Some((check, ChallengeKind::Identity)),
            Screen::QuestPhotoVerification { quest_id, check } => {
                let quest = self.quests.get(quest_id)?;
                Some((
                    check,
                    ChallengeKind::QuestCompletion { title: quest.title.clone(), description: quest.description.clone() },
                ))
            }
            _ => None,
        }
    }

    fn replace_check(&mut self, next: PhotoCheck) {
        let screen = match &self.screen {
            Screen::KycVerification(_) => Screen::KycVerification(next),
            Screen::QuestPhotoVerification { quest_id, .. } => {
                Screen::QuestPhotoVerification { quest_id: quest_id.clone(), check: next }
            }
            _ => return,
        };
        self.set_screen(screen);
    }

    fn step_check(
        &mut self,
        action: &'static str,
        step: impl FnOnce(&PhotoCheck) -> Option<PhotoCheck>,
    ) -> Result<(PhotoCheck, ChallengeKind), FlowError> {
        let stepped = self.photo_check().map(|(check, kind)| (step(check), kind));
        let Some((Some(next), kind)) = stepped else {
            return Err(self.unavailable(action));
        };
        self.replace_check(next.clone());
        Ok((next, kind))
    }

    /// Ask for an identity challenge (KYC starts idle).
    pub fn start_photo_check(&mut self) -> Flow {
        if self.pending.is_some() {
            return Err(FlowError::Busy);
        }
        let (_, kind) = self.step_check("start_photo_check", PhotoCheck::start)?;
        self.begin(PendingCall::Challenge { kind })
    }

    pub fn open_camera(&mut self) -> Flow {
        self.step_check("open_camera", PhotoCheck::open_camera).map(|_| ())
    }

    pub fn cancel_camera(&mut self) -> Flow {
        self.step_check("cancel_camera", PhotoCheck::cancel_camera).map(|_| ())
    }

    pub fn capture_photo(&mut self, photo: PhotoPayload) -> Flow {
        if self.pending.is_some() {
            return Err(FlowError::Busy);
        }
        let (next, kind) = self.step_check("capture_photo", PhotoCheck::capture)?;
        let code = next.challenge().map(|c| c.code.clone()).unwrap_or_default();
        self.begin(PendingCall::VerifyPhoto { kind, photo, code })
    }

    pub fn retry_photo(&mut self) -> Flow {
        if self.pending.is_some() {
            return Err(FlowError::Busy);
        }
        let (next, kind) = self.step_check("retry_photo", PhotoCheck::retry)?;
        if matches!(next, PhotoCheck::Generating) {
            self.begin(PendingCall::Challenge { kind })?;
        }
        Ok(())
    }

    /* ───────────── main app & quests ───────────── */

    pub fn navigate(&mut self, view: MainView) -> Flow {
        match self.screen {
            Screen::MainApp(_) => {
                self.enter_main(view);
                Ok(())
            }
            _ => Err(self.unavailable("navigate")),
        }
    }

    pub fn select_quest(&mut self, quest_id: &str) -> Flow {
        if !matches!(self.screen, Screen::MainApp(_)) {
            return Err(self.unavailable("select_quest"));
        }
        if self.quests.get(quest_id).is_none() {
            return Err(self.unavailable("select_quest"));
        }
        self.set_screen(Screen::QuestDetail { quest_id: quest_id.to_string() });
        Ok(())
    }

    /// Apply or bid: budgeted quests take bids, fixed-reward quests take applications.
    pub fn quest_action(&mut self) -> Flow {
        let Screen::QuestDetail { quest_id } = &self.screen else {
            return Err(self.unavailable("quest_action"));
        };
        let Some(quest) = self.quests.get(quest_id) else {
            return Err(self.unavailable("quest_action"));
        };
        let quest_id = quest_id.clone();
        let next = match quest.pricing {
            Pricing::Budget(_) => Screen::QuestBidding { quest_id },
            Pricing::Reward(_) => Screen::QuestApplication { quest_id },
        };
        self.set_screen(next);
        Ok(())
    }

    pub fn submit_application(&mut self) -> Flow {
        let Screen::QuestApplication { quest_id } = &self.screen else {
            return Err(self.unavailable("submit_application"));
        };
        let quest_id = quest_id.clone();
        self.set_screen(Screen::ApplicationSubmitted { quest_id });
        Ok(())
    }

    pub fn continue_to_task(&mut self) -> Flow {
        let Screen::ApplicationSubmitted { quest_id } = &self.screen else {
            return Err(self.unavailable("continue_to_task"));
        };
        let quest_id = quest_id.clone();
        self.set_screen(Screen::ActiveTask { quest_id });
        Ok(())
    }

    /// Append the user's bid to the quest being bid on.
    pub fn place_bid(&mut self, amount: u64, proposal: &str) -> Flow {
        let Screen::QuestBidding { quest_id } = &self.screen else {
            return Err(self.unavailable("place_bid"));
        };
        let quest_id = quest_id.clone();
        validation::bid_terms(amount, proposal)?;
        let user = self.require_user()?;
        let bid = Bid::new(user, amount, proposal, self.now());
        info!(quest = %quest_id, amount, user = %bid.username, "bid placed");
        self.quests = self.quests.with_bid(&quest_id, bid);
        self.set_screen(Screen::BidSubmitted { quest_id });
        Ok(())
    }

    pub fn finish_bid(&mut self) -> Flow {
        match self.screen {
            Screen::BidSubmitted { .. } => {
                self.enter_main(MainView::Quests);
                Ok(())
            }
            _ => Err(self.unavailable("finish_bid")),
        }
    }

    /// Send the work for moderation. The screen switches to `submitting_task`
    /// immediately; the verdict arrives through [`Controller::run_pending`].
    pub fn submit_task(&mut self, content: &str) -> Flow {
        let Screen::ActiveTask { quest_id } = &self.screen else {
            return Err(self.unavailable("submit_task"));
        };
        let quest_id = quest_id.clone();
        validation::submission(content)?;
        self.require_user()?;
        let resubmittable = self
            .quests
            .get(&quest_id)
            .is_some_and(|q| q.status.can_advance_to(QuestStatus::PendingVerification));
        if !resubmittable {
            return Err(self.unavailable("submit_task"));
        }
        self.begin(PendingCall::Moderate { quest_id: quest_id.clone(), content: content.to_string() })?;
        self.set_screen(Screen::SubmittingTask { quest_id });
        Ok(())
    }

    pub fn retry_submission(&mut self) -> Flow {
        let Screen::SubmissionRejected { quest_id, .. } = &self.screen else {
            return Err(self.unavailable("retry_submission"));
        };
        let quest_id = quest_id.clone();
        self.set_screen(Screen::ActiveTask { quest_id });
        Ok(())
    }

    pub fn continue_to_photo_verification(&mut self) -> Flow {
        let Screen::SubmissionConfirmation { quest_id } = &self.screen else {
            return Err(self.unavailable("continue_to_photo_verification"));
        };
        let Some(quest) = self.quests.get(quest_id) else {
            return Err(self.unavailable("continue_to_photo_verification"));
        };
        let kind = ChallengeKind::QuestCompletion { title: quest.title.clone(), description: quest.description.clone() };
        let quest_id = quest_id.clone();
        self.begin(PendingCall::Challenge { kind })?;
        self.set_screen(Screen::QuestPhotoVerification { quest_id, check: PhotoCheck::Generating });
        Ok(())
    }

    /// Mark the verified quest completed and credit the user.
    pub fn complete_quest(&mut self) -> Flow {
        let Screen::QuestPhotoVerification { quest_id, check } = &self.screen else {
            return Err(self.unavailable("complete_quest"));
        };
        if !check.is_verified() {
            return Err(self.unavailable("complete_quest"));
        }
        let quest_id = quest_id.clone();
        let Some(quest) = self.quests.get(&quest_id) else {
            return Err(self.unavailable("complete_quest"));
        };
        let credited = quest.payout().unwrap_or(self.fallback_reward);
        let status = quest.status;
        let user = self.require_user()?.credited(credited);
        if status.can_advance_to(QuestStatus::Completed) {
            self.quests = self.quests.with_status(&quest_id, QuestStatus::Completed);
        } else {
            warn!(quest = %quest_id, ?status, "quest completed from unexpected status");
        }
        info!(quest = %quest_id, credited, xp = user.xp, "quest completed");
        self.user = Some(user);
        self.set_screen(Screen::QuestComplete { quest_id, credited });
        Ok(())
    }

    pub fn finish_quest(&mut self) -> Flow {
        match self.screen {
            Screen::QuestComplete { .. } => {
                self.enter_main(self.last_view);
                Ok(())
            }
            _ => Err(self.unavailable("finish_quest")),
        }
    }

    /* ───────────── tribes ───────────── */

    pub fn select_tribe(&mut self, tribe_id: &str) -> Flow {
        if !matches!(self.screen, Screen::MainApp(_)) {
            return Err(self.unavailable("select_tribe"));
        }
        let Some(tribe) = self.fixtures.tribes.iter().find(|t| t.id == tribe_id).cloned() else {
            return Err(self.unavailable("select_tribe"));
        };
        self.set_screen(Screen::TribeDetail(tribe));
        Ok(())
    }

    pub fn join_tribe(&mut self) -> Flow {
        let Screen::TribeDetail(tribe) = &self.screen else {
            return Err(self.unavailable("join_tribe"));
        };
        info!(tribe = %tribe.id, "joined tribe");
        if let Some(user) = &self.user {
            self.user = Some(User { is_tribe_member: true, ..user.clone() });
        }
        self.enter_main(MainView::Tribes);
        Ok(())
    }

    /// Post to the home tribe's chat. Members only, from the tribes view.
    pub fn send_tribe_message(&mut self, text: &str) -> Flow {
        if self.screen != Screen::MainApp(MainView::Tribes) {
            return Err(self.unavailable("send_tribe_message"));
        }
        if !self.require_user()?.is_tribe_member {
            return Err(self.unavailable("send_tribe_message"));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        debug!(chars = text.len(), "tribe message sent");
        self.tribe_chat.push(ChatMessage::new(ChatRole::Own, text));
        Ok(())
    }

    /* ───────────── quest creation ───────────── */

    pub fn open_create_quest(&mut self) -> Flow {
        match self.screen {
            Screen::MainApp(_) => {
                self.set_screen(Screen::CreateQuest { analysis: None });
                Ok(())
            }
            _ => Err(self.unavailable("open_create_quest")),
        }
    }

    pub fn analyze_quest(&mut self, form: &QuestForm) -> Flow {
        if !matches!(self.screen, Screen::CreateQuest { .. }) {
            return Err(self.unavailable("analyze_quest"));
        }
        let (title, description, budget) = form.analysis_input()?;
        self.begin(PendingCall::AnalyzeQuest { title, description, budget })?;
        self.set_screen(Screen::CreateQuest { analysis: None });
        Ok(())
    }

    /// Post the quest: open, no bids, created by the current user, first in the list.
    pub fn create_quest(&mut self, form: &QuestForm) -> Flow {
        let Screen::CreateQuest { analysis } = &self.screen else {
            return Err(self.unavailable("create_quest"));
        };
        let draft = validation::quest_draft(form, analysis.as_ref(), self.now())?;
        let user = self.require_user()?;
        let quest = Quest {
            id: self.quests.next_id(),
            title: draft.title,
            description: draft.description,
            company: user.display_name().to_string(),
            logo: Defaults::CREATED_QUEST_LOGO.into(),
            kind: draft.kind,
            deadline: draft.deadline,
            level: user.level,
            pricing: Pricing::Budget(draft.budget),
            creator_id: user.username.clone(),
            status: QuestStatus::Open,
            bids: Vec::new(),
            winner: None,
            submission: None,
        };
        info!(quest = %quest.id, creator = %quest.creator_id, "quest created");
        self.quests = self.quests.prepend(quest);
        self.enter_main(MainView::Quests);
        Ok(())
    }

    /* ───────────── back navigation ───────────── */

    pub fn back(&mut self) -> Flow {
        let next = match &self.screen {
            Screen::TeenOtpVerification(_) => Screen::TeenSignup,
            Screen::GuardianOtpVerification(_) => Screen::GuardianVerification,
            Screen::AdultOtpVerification(_) => Screen::AdultSignup,
            Screen::QuestApplication { quest_id } | Screen::QuestBidding { quest_id } => {
                Screen::QuestDetail { quest_id: quest_id.clone() }
            }
            Screen::QuestPhotoVerification { quest_id, .. } => Screen::ActiveTask { quest_id: quest_id.clone() },
            Screen::QuestDetail { .. } | Screen::TribeDetail(_) | Screen::CreateQuest { .. } => {
                Screen::MainApp(self.last_view)
            }
            Screen::MainApp(view) if *view != MainView::Home => Screen::MainApp(MainView::Home),
            _ => return Err(self.unavailable("back")),
        };
        if self.pending.is_some() {
            return Err(FlowError::Busy);
        }
        match next {
            Screen::MainApp(view) => self.enter_main(view),
            other => self.set_screen(other),
        }
        Ok(())
    }

    /* ───────────── time & outside world ───────────── */

    /// Fire the scheduled advance if it is due.
    pub fn tick(&mut self, now: Instant) {
        let Some(due) = self.scheduled.as_ref().map(|s| s.due) else {
            return;
        };
        if due > now {
            return;
        }
        let Some(ScheduledAdvance { advance, .. }) = self.scheduled.take() else {
            return;
        };
        debug!(?advance, "advance due");
        let result = match advance {
            Advance::LeaveSplash => self.dismiss_splash(),
            Advance::ConfirmSubmission { quest_id } => {
                if matches!(&self.screen, Screen::SubmittingTask { quest_id: q } if *q == quest_id) {
                    self.set_screen(Screen::SubmissionConfirmation { quest_id });
                    Ok(())
                } else {
                    Err(self.unavailable("confirm_submission"))
                }
            }
            Advance::IdentityVerified => self.complete_kyc(),
            Advance::QuestVerified => self.complete_quest(),
        };
        if let Err(e) = result {
            debug!(error = %e, "scheduled advance dropped");
        }
    }

    /// Perform the outstanding call, if any, and apply its outcome.
    pub async fn run_pending(&mut self) {
        let Some((id, call)) = self.pending.take() else {
            return;
        };
        debug!(%id, "running pending call");
        match call {
            PendingCall::SendCode { channel, contact, purpose } => {
                let codes = self.services.codes.clone();
                let result = codes.send(channel, &contact).await;
                self.code_sent(purpose, contact, result);
            }
            PendingCall::Moderate { quest_id, content } => {
                let assistant = self.services.assistant.clone();
                let verdict = assistant.moderate_content(&content).await;
                self.moderated(quest_id, content, verdict);
            }
            PendingCall::Challenge { kind } => {
                let assistant = self.services.assistant.clone();
                let result = match &kind {
                    ChallengeKind::Identity => assistant.generate_verification_task().await,
                    ChallengeKind::QuestCompletion { title, .. } => {
                        assistant.generate_quest_verification_task(title).await
                    }
                };
                if let Err(e) = &result {
                    warn!(error = %e, "challenge generation failed");
                }
                let next = self.photo_check().and_then(|(check, _)| check.challenge_ready(&kind, result));
                if let Some(next) = next {
                    self.replace_check(next);
                }
            }
            PendingCall::VerifyPhoto { kind, photo, code } => {
                let assistant = self.services.assistant.clone();
                let result = match &kind {
                    ChallengeKind::Identity => assistant.verify_photo_task(photo.as_base64(), &code).await,
                    ChallengeKind::QuestCompletion { title, description } => {
                        assistant
                            .verify_quest_completion_photo(photo.as_base64(), &code, title, description)
                            .await
                    }
                };
                if let Err(e) = &result {
                    warn!(error = %e, "photo verification failed");
                }
                self.photo_judged(&kind, result);
            }
            PendingCall::AnalyzeQuest { title, description, budget } => {
                let assistant = self.services.assistant.clone();
                let result = assistant.validate_quest_creation(&title, &description, budget).await;
                if !matches!(self.screen, Screen::CreateQuest { .. }) {
                    return;
                }
                match result {
                    Ok(analysis) => self.set_screen(Screen::CreateQuest { analysis: Some(analysis) }),
                    Err(e) => {
                        warn!(error = %e, "quest analysis failed");
                        self.notice = Some(Defaults::MSG_ANALYSIS_FAILED.into());
                    }
                }
            }
        }
    }

    fn code_sent(&mut self, purpose: CodePurpose, contact: String, result: anyhow::Result<String>) {
        let expected = match result {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "code delivery failed");
                self.notice = Some("Couldn't send the code. Please try again.".into());
                return;
            }
        };
        let check = CodeCheck { contact, expected };
        let next = match (&purpose, &self.screen) {
            (CodePurpose::Teen { .. }, Screen::TeenSignup) => Screen::TeenOtpVerification(check),
            (CodePurpose::Guardian, Screen::GuardianVerification) => Screen::GuardianOtpVerification(check),
            (CodePurpose::Adult, Screen::AdultSignup) => Screen::AdultOtpVerification(check),
            _ => {
                debug!("code arrived after leaving the signup screen");
                return;
            }
        };
        if let CodePurpose::Teen { username } = purpose {
            self.user = Some(User { username, ..self.fixtures.teen_template.clone() });
        }
        self.set_screen(next);
    }

    /// Moderation fails closed: a service error rejects like a flag does.
    fn moderated(
        &mut self,
        quest_id: QuestId,
        content: String,
        verdict: Result<crate::assistant::ModerationVerdict, crate::assistant::AssistantError>,
    ) {
        if !matches!(&self.screen, Screen::SubmittingTask { quest_id: q } if *q == quest_id) {
            return;
        }
        let reason = match verdict {
            Ok(v) if !v.is_flagged => None,
            Ok(v) => Some(v.reason.filter(|r| !r.is_empty()).unwrap_or_else(|| Defaults::MSG_FLAGGED_DEFAULT.into())),
            Err(e) => {
                warn!(error = %e, "moderation failed");
                Some(Defaults::MSG_MODERATION_UNAVAILABLE.into())
            }
        };
        match reason {
            Some(reason) => {
                info!(quest = %quest_id, %reason, "submission rejected");
                self.set_screen(Screen::SubmissionRejected { quest_id, reason });
            }
            None => {
                let username = self.user.as_ref().map(|u| u.username.clone()).unwrap_or_default();
                self.quests = self.quests.with_submission(&quest_id, Submission { user_id: username, content });
                self.schedule(self.timing.submission_confirm(), Advance::ConfirmSubmission { quest_id });
            }
        }
    }

    fn photo_judged(
        &mut self,
        kind: &ChallengeKind,
        result: Result<crate::assistant::PhotoVerdict, crate::assistant::AssistantError>,
    ) {
        let Some(next) = self.photo_check().and_then(|(check, _)| check.verdict(kind, result)) else {
            return;
        };
        let verified = next.is_verified();
        self.replace_check(next);
        if verified {
            let advance = match kind {
                ChallengeKind::Identity => Advance::IdentityVerified,
                ChallengeKind::QuestCompletion { .. } => Advance::QuestVerified,
            };
            self.schedule(self.timing.verified_advance(), advance);
        }
    }

    /// Run outstanding calls and wait out scheduled advances until the
    /// machine is idle.
    pub async fn settle(&mut self) {
        loop {
            if self.pending.is_some() {
                self.run_pending().await;
                continue;
            }
            match self.scheduled.as_ref().map(|s| s.due) {
                Some(due) => {
                    tokio::time::sleep_until(due).await;
                    self.tick(Instant::now());
                }
                None => break,
            }
        }
    }
}
