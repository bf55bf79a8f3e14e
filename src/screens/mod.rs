pub mod active_task;
pub mod bidding;
pub mod confirm_quit;
pub mod create_quest;
pub mod main_app;
pub mod message;
pub mod otp;
pub mod photo_check;
pub mod quest_detail;
pub mod signup;
pub mod tribe_detail;
pub mod welcome;

pub use active_task::ActiveTaskScreen;
pub use bidding::BiddingScreen;
pub use confirm_quit::ConfirmQuitScreen;
pub use create_quest::CreateQuestScreen;
pub use main_app::MainAppScreen;
pub use message::MessageScreen;
pub use otp::OtpScreen;
pub use photo_check::PhotoCheckScreen;
pub use quest_detail::QuestDetailScreen;
pub use signup::{AdultSignupScreen, GuardianScreen, TeenSignupScreen};
pub use tribe_detail::TribeDetailScreen;
pub use welcome::{AgeSelectionScreen, SplashScreen};

use crate::app::{AppCtx, ScreenWidget};
use crate::controller::Screen;

/// Widget for whatever screen the controller is on.
pub fn build(ctx: &AppCtx) -> Box<dyn ScreenWidget> {
    match ctx.controller.screen() {
        Screen::Splash => Box::new(SplashScreen),
        Screen::AgeSelection => Box::new(AgeSelectionScreen::default()),
        Screen::TeenSignup => Box::new(TeenSignupScreen::new()),
        Screen::GuardianVerification => Box::new(GuardianScreen::new()),
        Screen::AdultSignup => Box::new(AdultSignupScreen::new()),
        Screen::TeenOtpVerification(_) | Screen::GuardianOtpVerification(_) | Screen::AdultOtpVerification(_) => {
            Box::new(OtpScreen::default())
        }
        Screen::KycVerification(_) | Screen::QuestPhotoVerification { .. } => Box::new(PhotoCheckScreen::default()),
        Screen::PaymentSetup => Box::new(MessageScreen::payment_setup()),
        Screen::ProfileSetup => Box::new(MessageScreen::profile_setup()),
        Screen::OnboardingComplete => Box::new(MessageScreen::onboarding_complete()),
        Screen::MainApp(_) => Box::new(MainAppScreen::new(ctx)),
        Screen::QuestDetail { .. } => Box::new(QuestDetailScreen::default()),
        Screen::QuestApplication { .. } => Box::new(ActiveTaskScreen::application()),
        Screen::ApplicationSubmitted { .. } => Box::new(MessageScreen::application_submitted()),
        Screen::QuestBidding { .. } => Box::new(BiddingScreen::new()),
        Screen::BidSubmitted { .. } => Box::new(MessageScreen::bid_submitted()),
        Screen::ActiveTask { .. } => Box::new(ActiveTaskScreen::task()),
        Screen::SubmittingTask { .. } => Box::new(MessageScreen::submitting_task()),
        Screen::SubmissionConfirmation { .. } => Box::new(MessageScreen::submission_confirmation()),
        Screen::SubmissionRejected { .. } => Box::new(MessageScreen::submission_rejected()),
        Screen::QuestComplete { .. } => Box::new(MessageScreen::quest_complete()),
        Screen::TribeDetail(_) => Box::new(TribeDetailScreen::default()),
        Screen::CreateQuest { .. } => Box::new(CreateQuestScreen::new()),
    }
}

/// Message to show under a form for a handler's result. Screen mismatches
/// are not the user's doing and stay silent.
pub(crate) fn inline_error(result: Result<(), crate::controller::FlowError>) -> Option<String> {
    use crate::controller::FlowError;
    match result {
        Ok(()) => None,
        Err(FlowError::Validation(e)) => Some(e.to_string()),
        Err(FlowError::Busy) => Some("Still working on the last request...".into()),
        Err(FlowError::NoUser) => Some("Please sign in first.".into()),
        Err(FlowError::Unavailable { .. }) => None,
    }
}
