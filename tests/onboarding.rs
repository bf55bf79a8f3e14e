mod common;

use std::time::Duration;

use tasktribe::controller::{FlowError, MainView, Screen};
use tasktribe::testing::{controller, ScriptedAssistant};
use tasktribe::validation::ValidationError;
use tasktribe::verification::PhotoCheck;

use common::{adult_on_home, photo, teen_on_home};

#[tokio::test(start_paused = true)]
async fn teen_signs_up_with_guardian_consent() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;

    let user = c.user().unwrap();
    assert_eq!(user.username, "alex");
    assert!(!user.is_adult);
    assert_eq!(user.xp, 150);
}

#[tokio::test(start_paused = true)]
async fn code_arrives_after_send_delay() {
    let mut c = controller(ScriptedAssistant::default());
    c.dismiss_splash().unwrap();
    c.select_teen().unwrap();
    c.teen_signup("alex", "9998887777").unwrap();
    assert_eq!(c.screen(), &Screen::TeenSignup);

    let start = tokio::time::Instant::now();
    c.run_pending().await;
    assert!(start.elapsed() >= Duration::from_millis(1000));
    let Screen::TeenOtpVerification(check) = c.screen() else { panic!("expected teen otp") };
    assert_eq!(check.contact, "9998887777");
    assert_eq!(check.expected, "111111");
}

#[tokio::test(start_paused = true)]
async fn wrong_code_stays_on_otp_screen() {
    let mut c = controller(ScriptedAssistant::default());
    c.dismiss_splash().unwrap();
    c.select_teen().unwrap();
    c.teen_signup("alex", "9998887777").unwrap();
    c.run_pending().await;
    let before = c.screen().clone();

    assert_eq!(c.verify_code("123456"), Err(FlowError::Validation(ValidationError::InvalidCode)));
    assert_eq!(c.verify_code("12"), Err(FlowError::Validation(ValidationError::IncompleteCode)));
    assert_eq!(c.screen(), &before);

    c.verify_code("111111").unwrap();
    assert_eq!(c.screen(), &Screen::GuardianVerification);
}

#[tokio::test(start_paused = true)]
async fn short_guardian_phone_is_rejected_locally() {
    let mut c = controller(ScriptedAssistant::default());
    c.dismiss_splash().unwrap();
    c.select_teen().unwrap();
    c.teen_signup("alex", "9998887777").unwrap();
    c.run_pending().await;
    c.verify_code("111111").unwrap();

    assert_eq!(
        c.guardian_verification("12345"),
        Err(FlowError::Validation(ValidationError::InvalidGuardianPhone))
    );
    assert!(c.pending().is_none());
    assert_eq!(c.screen(), &Screen::GuardianVerification);
}

#[tokio::test(start_paused = true)]
async fn adult_onboarding_assigns_full_profile() {
    let mut c = controller(ScriptedAssistant::default());
    adult_on_home(&mut c).await;

    let user = c.user().unwrap();
    assert!(user.is_adult);
    assert_eq!(user.username, "Priya_Designs");
    assert_eq!(user.display_name(), "Priya Sharma");
}

#[tokio::test(start_paused = true)]
async fn identity_photo_rejection_can_be_retried() {
    let mut c = controller(ScriptedAssistant::rejecting_photos("The code is not visible."));
    c.dismiss_splash().unwrap();
    c.select_adult().unwrap();
    let form = tasktribe::validation::AdultSignup {
        full_name: "Priya".into(),
        email: "p@example.in".into(),
        password: "pw".into(),
        agreed: true,
    };
    c.adult_signup(&form).unwrap();
    c.run_pending().await;
    c.verify_code("111111").unwrap();
    c.start_photo_check().unwrap();
    c.run_pending().await;
    c.open_camera().unwrap();
    c.capture_photo(photo()).unwrap();
    c.run_pending().await;

    let Screen::KycVerification(PhotoCheck::Failed { reason, challenge: Some(_) }) = c.screen() else {
        panic!("expected failed check, got {:?}", c.screen());
    };
    assert_eq!(reason, "The code is not visible.");
    assert!(c.scheduled().is_none());

    // Retrying keeps the same challenge instead of asking for a new one.
    c.retry_photo().unwrap();
    assert!(c.pending().is_none());
    assert!(matches!(c.screen(), Screen::KycVerification(PhotoCheck::Task(ch)) if ch.code == "TT-4821"));
    assert_eq!(c.complete_kyc(), Err(FlowError::Unavailable { action: "complete_kyc", screen: "kyc_verification" }));
}

#[tokio::test(start_paused = true)]
async fn verified_identity_waits_before_payment() {
    let mut c = controller(ScriptedAssistant::default());
    c.dismiss_splash().unwrap();
    c.select_adult().unwrap();
    let form = tasktribe::validation::AdultSignup {
        full_name: "Priya".into(),
        email: "p@example.in".into(),
        password: "pw".into(),
        agreed: true,
    };
    c.adult_signup(&form).unwrap();
    c.run_pending().await;
    c.verify_code("111111").unwrap();
    c.start_photo_check().unwrap();
    c.run_pending().await;
    c.open_camera().unwrap();
    c.capture_photo(photo()).unwrap();
    c.run_pending().await;
    assert!(matches!(c.screen(), Screen::KycVerification(PhotoCheck::Verified { .. })));

    tokio::time::advance(Duration::from_millis(1999)).await;
    c.tick(tokio::time::Instant::now());
    assert!(matches!(c.screen(), Screen::KycVerification(_)));

    tokio::time::advance(Duration::from_millis(1)).await;
    c.tick(tokio::time::Instant::now());
    assert_eq!(c.screen(), &Screen::PaymentSetup);
}

#[tokio::test(start_paused = true)]
async fn back_from_secondary_tab_goes_home() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    c.navigate(MainView::Profile).unwrap();
    c.back().unwrap();
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Home));
    assert!(matches!(c.back(), Err(FlowError::Unavailable { action: "back", .. })));
}
