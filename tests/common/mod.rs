#![allow(dead_code)]

use tasktribe::controller::{Controller, MainView, Screen};
use tasktribe::validation::AdultSignup;
use tasktribe::verification::PhotoPayload;

pub const PROPOSAL: &str = "I have designed logos for five eco brands.";

pub fn photo() -> PhotoPayload {
    PhotoPayload::from_jpeg_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
}

/// Splash through guardian OTP, signed in as teen `alex`.
pub async fn teen_on_home(c: &mut Controller) {
    c.dismiss_splash().unwrap();
    c.select_teen().unwrap();
    c.teen_signup("alex", "9998887777").unwrap();
    c.run_pending().await;
    c.verify_code("111111").unwrap();
    assert_eq!(c.screen(), &Screen::GuardianVerification);
    c.guardian_verification("9876543210").unwrap();
    c.run_pending().await;
    c.verify_code("111111").unwrap();
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Home));
}

/// Splash through KYC, payment and profile, signed in with the adult profile.
pub async fn adult_on_home(c: &mut Controller) {
    c.dismiss_splash().unwrap();
    c.select_adult().unwrap();
    let form = AdultSignup {
        full_name: "Priya Sharma".into(),
        email: "priya@example.in".into(),
        password: "Str0ng!pass".into(),
        agreed: true,
    };
    c.adult_signup(&form).unwrap();
    c.run_pending().await;
    c.verify_code("111111").unwrap();
    c.start_photo_check().unwrap();
    c.run_pending().await;
    c.open_camera().unwrap();
    c.capture_photo(photo()).unwrap();
    c.settle().await;
    assert_eq!(c.screen(), &Screen::PaymentSetup);
    c.complete_payment().unwrap();
    c.complete_profile().unwrap();
    c.finish_onboarding().unwrap();
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Home));
}

/// From home, apply to the fixed-reward quest and land on its task screen.
pub fn open_task_on_q2(c: &mut Controller) {
    c.select_quest("q2").unwrap();
    c.quest_action().unwrap();
    assert_eq!(c.screen(), &Screen::QuestApplication { quest_id: "q2".into() });
    c.submit_application().unwrap();
    c.continue_to_task().unwrap();
    assert_eq!(c.screen(), &Screen::ActiveTask { quest_id: "q2".into() });
}
