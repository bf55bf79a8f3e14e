mod common;

use std::time::Duration;

use tasktribe::controller::{FlowError, MainView, Screen};
use tasktribe::defaults::Defaults;
use tasktribe::testing::{controller, ScriptedAssistant};
use tasktribe::types::{Pricing, QuestStatus};
use tasktribe::validation::ValidationError;
use tasktribe::verification::PhotoCheck;

use common::{open_task_on_q2, photo, teen_on_home, PROPOSAL};

#[tokio::test(start_paused = true)]
async fn budgeted_quest_takes_bids_and_fixed_reward_takes_applications() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;

    c.select_quest("q1").unwrap();
    c.quest_action().unwrap();
    assert_eq!(c.screen(), &Screen::QuestBidding { quest_id: "q1".into() });

    c.back().unwrap();
    c.back().unwrap();
    c.select_quest("q2").unwrap();
    c.quest_action().unwrap();
    assert_eq!(c.screen(), &Screen::QuestApplication { quest_id: "q2".into() });
}

#[tokio::test(start_paused = true)]
async fn bid_lands_on_its_quest_only() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    let before = c.quests().clone();

    c.select_quest("q1").unwrap();
    c.quest_action().unwrap();
    c.place_bid(4500, PROPOSAL).unwrap();
    assert_eq!(c.screen(), &Screen::BidSubmitted { quest_id: "q1".into() });

    let q1 = c.quests().get("q1").unwrap();
    assert_eq!(q1.bids.len(), 1);
    let bid = &q1.bids[0];
    assert_eq!((bid.username.as_str(), bid.amount, bid.proposal.as_str()), ("alex", 4500, PROPOSAL));
    assert_eq!(bid.avatar_url, "https://placehold.co/64x64/86efac/FFFFFF?text=A");
    for id in ["q2", "q3"] {
        assert_eq!(c.quests().get(id), before.get(id));
    }
    // The earlier snapshot is untouched.
    assert!(before.get("q1").unwrap().bids.is_empty());

    c.finish_bid().unwrap();
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Quests));
}

#[tokio::test(start_paused = true)]
async fn bad_bids_do_not_change_anything() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    c.select_quest("q1").unwrap();
    c.quest_action().unwrap();

    assert_eq!(c.place_bid(0, PROPOSAL), Err(FlowError::Validation(ValidationError::InvalidBidAmount)));
    assert_eq!(c.place_bid(100, "  too short  "), Err(FlowError::Validation(ValidationError::ProposalTooShort)));
    assert!(c.quests().get("q1").unwrap().bids.is_empty());
    assert_eq!(c.screen(), &Screen::QuestBidding { quest_id: "q1".into() });
}

#[tokio::test(start_paused = true)]
async fn clean_submission_is_confirmed_after_delay() {
    let assistant = std::sync::Arc::new(ScriptedAssistant::default());
    let mut c = tasktribe::testing::controller_with(assistant.clone(), &Default::default());
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);

    c.submit_task("Here are the three posts: https://docs.example/posts").unwrap();
    assert_eq!(c.screen(), &Screen::SubmittingTask { quest_id: "q2".into() });
    assert!(c.pending().is_some());

    c.run_pending().await;
    assert_eq!(c.screen(), &Screen::SubmittingTask { quest_id: "q2".into() });
    let q2 = c.quests().get("q2").unwrap();
    assert_eq!(q2.status, QuestStatus::PendingVerification);
    assert_eq!(q2.submission.as_ref().map(|s| s.user_id.as_str()), Some("alex"));

    tokio::time::advance(Duration::from_millis(1500)).await;
    c.tick(tokio::time::Instant::now());
    assert_eq!(c.screen(), &Screen::SubmissionConfirmation { quest_id: "q2".into() });
    assert_eq!(assistant.calls(), vec!["moderate_content"]);
}

#[tokio::test(start_paused = true)]
async fn flagged_submission_shows_reason() {
    let mut c = controller(ScriptedAssistant::flagging(Some("Contains a phone number.")));
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);

    c.submit_task("call me on 9998887777").unwrap();
    c.settle().await;
    assert_eq!(
        c.screen(),
        &Screen::SubmissionRejected { quest_id: "q2".into(), reason: "Contains a phone number.".into() }
    );
    let q2 = c.quests().get("q2").unwrap();
    assert_eq!(q2.status, QuestStatus::Open);
    assert!(q2.submission.is_none());

    c.retry_submission().unwrap();
    assert_eq!(c.screen(), &Screen::ActiveTask { quest_id: "q2".into() });
}

#[tokio::test(start_paused = true)]
async fn flag_without_reason_uses_default_message() {
    let mut c = controller(ScriptedAssistant::flagging(None));
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);

    c.submit_task("something").unwrap();
    c.settle().await;
    assert_eq!(
        c.screen(),
        &Screen::SubmissionRejected { quest_id: "q2".into(), reason: Defaults::MSG_FLAGGED_DEFAULT.into() }
    );
}

#[tokio::test(start_paused = true)]
async fn moderation_outage_rejects_the_submission() {
    let mut c = controller(ScriptedAssistant::offline());
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);

    c.submit_task("something").unwrap();
    c.settle().await;
    assert_eq!(
        c.screen(),
        &Screen::SubmissionRejected { quest_id: "q2".into(), reason: Defaults::MSG_MODERATION_UNAVAILABLE.into() }
    );
    assert_eq!(c.quests().get("q2").unwrap().status, QuestStatus::Open);
}

#[tokio::test(start_paused = true)]
async fn empty_submission_stays_on_task() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);

    assert_eq!(c.submit_task("   "), Err(FlowError::Validation(ValidationError::EmptySubmission)));
    assert!(c.pending().is_none());
    assert_eq!(c.screen(), &Screen::ActiveTask { quest_id: "q2".into() });
}

#[tokio::test(start_paused = true)]
async fn verified_work_completes_quest_and_credits_reward() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    c.navigate(MainView::Quests).unwrap();
    open_task_on_q2(&mut c);

    c.submit_task("Posts are live.").unwrap();
    c.settle().await;
    c.continue_to_photo_verification().unwrap();
    assert!(matches!(c.screen(), Screen::QuestPhotoVerification { check: PhotoCheck::Generating, .. }));
    c.run_pending().await;
    let Screen::QuestPhotoVerification { check: PhotoCheck::Task(challenge), .. } = c.screen() else {
        panic!("expected a task, got {:?}", c.screen());
    };
    assert_eq!(challenge.code, "aB3$7!x");

    c.open_camera().unwrap();
    c.capture_photo(photo()).unwrap();
    c.settle().await;

    assert_eq!(c.screen(), &Screen::QuestComplete { quest_id: "q2".into(), credited: 3000 });
    assert_eq!(c.quests().get("q2").unwrap().status, QuestStatus::Completed);
    let user = c.user().unwrap();
    assert_eq!(user.xp, 3150);
    assert_eq!(user.tasks_completed, 1);

    c.finish_quest().unwrap();
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Quests));
}

#[tokio::test(start_paused = true)]
async fn leaving_verified_photo_cancels_the_completion() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);
    c.submit_task("Posts are live.").unwrap();
    c.settle().await;
    c.continue_to_photo_verification().unwrap();
    c.run_pending().await;
    c.open_camera().unwrap();
    c.capture_photo(photo()).unwrap();
    c.run_pending().await;
    assert!(c.scheduled().is_some());

    c.back().unwrap();
    assert_eq!(c.screen(), &Screen::ActiveTask { quest_id: "q2".into() });
    assert!(c.scheduled().is_none());

    tokio::time::advance(Duration::from_secs(10)).await;
    c.tick(tokio::time::Instant::now());
    assert_eq!(c.screen(), &Screen::ActiveTask { quest_id: "q2".into() });
    assert_eq!(c.user().unwrap().xp, 150);
    assert_eq!(c.quests().get("q2").unwrap().status, QuestStatus::PendingVerification);
}

#[tokio::test(start_paused = true)]
async fn failed_challenge_generation_retries_with_a_new_request() {
    let assistant = ScriptedAssistant { quest_challenge: None, ..ScriptedAssistant::default() };
    let mut c = controller(assistant);
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);
    c.submit_task("Posts are live.").unwrap();
    c.settle().await;
    c.continue_to_photo_verification().unwrap();
    c.run_pending().await;

    let Screen::QuestPhotoVerification { check: PhotoCheck::Failed { challenge: None, reason }, .. } = c.screen()
    else {
        panic!("expected failure, got {:?}", c.screen());
    };
    assert_eq!(reason, "Failed to generate a verification task. Please try again.");

    c.retry_photo().unwrap();
    assert!(matches!(c.screen(), Screen::QuestPhotoVerification { check: PhotoCheck::Generating, .. }));
    assert!(c.pending().is_some());
}

#[tokio::test(start_paused = true)]
async fn back_is_refused_while_a_call_is_outstanding() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    open_task_on_q2(&mut c);
    c.submit_task("Posts are live.").unwrap();
    c.settle().await;
    c.continue_to_photo_verification().unwrap();

    assert_eq!(c.back(), Err(FlowError::Busy));
    assert!(matches!(c.screen(), Screen::QuestPhotoVerification { .. }));
}

#[tokio::test(start_paused = true)]
async fn adult_profile_owns_the_budgeted_seed_quests() {
    let mut c = controller(ScriptedAssistant::default());
    common::adult_on_home(&mut c).await;
    let own = c.quests().posted_by("Priya_Designs");
    assert_eq!(own.iter().map(|q| q.id.as_str()).collect::<Vec<_>>(), vec!["q1", "q3"]);
    assert!(own.iter().all(|q| matches!(q.pricing, Pricing::Budget(_))));
}
