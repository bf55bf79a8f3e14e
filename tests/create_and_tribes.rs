mod common;

use std::sync::Arc;

use tasktribe::controller::{FlowError, MainView, PendingCall, Screen};
use tasktribe::defaults::Defaults;
use tasktribe::fixtures::Fixtures;
use tasktribe::testing::{controller, controller_over, ScriptedAssistant};
use tasktribe::types::{ChatMessage, ChatRole, Pricing, QuestBook, QuestStatus, QuestType};
use tasktribe::validation::{QuestForm, ValidationError};

use common::{adult_on_home, teen_on_home};

fn form() -> QuestForm {
    QuestForm {
        title: "Illustrate a children's book cover".into(),
        description: "One cover illustration, print ready, for a picture book about monsoon birds.".into(),
        budget: "6000".into(),
        deadline: "2099-01-05".into(),
        kind: QuestType::Creative,
    }
}

#[tokio::test(start_paused = true)]
async fn posting_needs_an_analysis_first() {
    let mut c = controller(ScriptedAssistant::default());
    adult_on_home(&mut c).await;
    c.open_create_quest().unwrap();

    assert_eq!(c.create_quest(&form()), Err(FlowError::Validation(ValidationError::AnalysisRequired)));
    assert_eq!(c.quests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn analysed_quest_is_posted_first_and_open() {
    let mut c = controller(ScriptedAssistant::default());
    adult_on_home(&mut c).await;
    c.open_create_quest().unwrap();

    c.analyze_quest(&form()).unwrap();
    assert!(matches!(c.pending(), Some(PendingCall::AnalyzeQuest { budget: 6000, .. })));
    c.run_pending().await;
    assert!(matches!(c.screen(), Screen::CreateQuest { analysis: Some(_) }));

    c.create_quest(&form()).unwrap();
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Quests));
    assert_eq!(c.quests().len(), 4);

    let posted = c.quests().iter().next().unwrap();
    assert_eq!(posted.id, "q4");
    assert_eq!(posted.title, "Illustrate a children's book cover");
    assert_eq!(posted.pricing, Pricing::Budget(6000));
    assert_eq!(posted.status, QuestStatus::Open);
    assert_eq!(posted.creator_id, "Priya_Designs");
    assert_eq!(posted.company, "Priya Sharma");
    assert_eq!(posted.logo, Defaults::CREATED_QUEST_LOGO);
    assert_eq!(posted.level, 24);
    assert!(posted.bids.is_empty());
    assert_eq!(posted.deadline.date().to_string(), "2099-01-05");
}

#[tokio::test(start_paused = true)]
async fn posted_quest_id_is_unique_when_seed_ids_have_gaps() {
    let mut fixtures = Fixtures::builtin(time::OffsetDateTime::now_utc());
    fixtures.quests = QuestBook::new(fixtures.quests.iter().filter(|q| q.id != "q2").cloned().collect());
    let mut c = controller_over(fixtures, Arc::new(ScriptedAssistant::default()), &Default::default());
    adult_on_home(&mut c).await;
    let q3 = c.quests().get("q3").cloned();

    c.open_create_quest().unwrap();
    c.analyze_quest(&form()).unwrap();
    c.run_pending().await;
    c.create_quest(&form()).unwrap();

    let ids: Vec<_> = c.quests().iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["q4", "q1", "q3"]);
    assert_eq!(c.quests().get("q3").cloned(), q3);
}

#[tokio::test(start_paused = true)]
async fn job_posting_is_refused() {
    let mut c = controller(ScriptedAssistant::spotting_job_posting("It describes a salaried role."));
    adult_on_home(&mut c).await;
    c.open_create_quest().unwrap();
    c.analyze_quest(&form()).unwrap();
    c.run_pending().await;

    assert_eq!(
        c.create_quest(&form()),
        Err(FlowError::Validation(ValidationError::JobPosting("It describes a salaried role.".into())))
    );
    assert_eq!(c.quests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn past_deadline_is_refused() {
    let mut c = controller(ScriptedAssistant::default());
    adult_on_home(&mut c).await;
    c.open_create_quest().unwrap();
    c.analyze_quest(&form()).unwrap();
    c.run_pending().await;

    let stale = QuestForm { deadline: "2001-01-01".into(), ..form() };
    assert_eq!(c.create_quest(&stale), Err(FlowError::Validation(ValidationError::DeadlineInPast)));
}

#[tokio::test(start_paused = true)]
async fn analysis_outage_leaves_a_notice() {
    let mut c = controller(ScriptedAssistant { analysis: None, ..ScriptedAssistant::default() });
    adult_on_home(&mut c).await;
    c.open_create_quest().unwrap();
    c.analyze_quest(&form()).unwrap();
    c.run_pending().await;

    assert_eq!(c.screen(), &Screen::CreateQuest { analysis: None });
    assert_eq!(c.notice(), Some(Defaults::MSG_ANALYSIS_FAILED));
}

#[tokio::test(start_paused = true)]
async fn incomplete_form_is_not_sent_for_analysis() {
    let mut c = controller(ScriptedAssistant::default());
    adult_on_home(&mut c).await;
    c.open_create_quest().unwrap();

    let blank = QuestForm { description: String::new(), ..form() };
    assert_eq!(c.analyze_quest(&blank), Err(FlowError::Validation(ValidationError::IncompleteAnalysisInput)));
    assert!(c.pending().is_none());
}

#[tokio::test(start_paused = true)]
async fn joining_a_tribe_shows_the_member_view() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    assert!(!c.user().unwrap().is_tribe_member);

    c.select_tribe("t3").unwrap();
    let Screen::TribeDetail(tribe) = c.screen() else { panic!("expected tribe detail") };
    assert_eq!(tribe.name, "Eco Warriors");

    c.join_tribe().unwrap();
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Tribes));
    assert!(c.user().unwrap().is_tribe_member);
}

#[tokio::test(start_paused = true)]
async fn only_members_can_talk_in_the_tribe_chat() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    c.navigate(MainView::Tribes).unwrap();
    assert!(matches!(c.send_tribe_message("hello"), Err(FlowError::Unavailable { .. })));
    assert_eq!(c.tribe_chat().len(), 3);

    c.navigate(MainView::Home).unwrap();
    c.select_tribe("t3").unwrap();
    c.join_tribe().unwrap();

    assert_eq!(c.send_tribe_message("   "), Err(FlowError::Validation(ValidationError::EmptyMessage)));
    c.send_tribe_message("  Count me in for the war  ").unwrap();
    assert_eq!(c.tribe_chat().len(), 4);
    assert_eq!(c.tribe_chat().last(), Some(&ChatMessage::new(ChatRole::Own, "Count me in for the war")));
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Tribes));

    c.navigate(MainView::Home).unwrap();
    assert!(matches!(c.send_tribe_message("still here"), Err(FlowError::Unavailable { .. })));
    assert_eq!(c.tribe_war().standings.iter().filter(|s| s.is_user_tribe).count(), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_tribe_is_a_no_op() {
    let mut c = controller(ScriptedAssistant::default());
    teen_on_home(&mut c).await;
    assert!(matches!(c.select_tribe("t9"), Err(FlowError::Unavailable { .. })));
    assert_eq!(c.screen(), &Screen::MainApp(MainView::Home));
}

fn fixed_clock() -> time::OffsetDateTime {
    time::macros::datetime!(2031-03-10 18:30 UTC)
}

#[tokio::test(start_paused = true)]
async fn deadline_today_is_accepted_against_the_injected_clock() {
    let mut c = controller(ScriptedAssistant::default()).with_clock(fixed_clock);
    adult_on_home(&mut c).await;
    c.open_create_quest().unwrap();
    c.analyze_quest(&form()).unwrap();
    c.run_pending().await;

    let yesterday = QuestForm { deadline: "2031-03-09".into(), ..form() };
    assert_eq!(c.create_quest(&yesterday), Err(FlowError::Validation(ValidationError::DeadlineInPast)));
    let today = QuestForm { deadline: "2031-03-10".into(), ..form() };
    c.create_quest(&today).unwrap();
    assert_eq!(c.quests().iter().next().unwrap().deadline, time::macros::datetime!(2031-03-10 0:00 UTC));
}

#[tokio::test(start_paused = true)]
async fn bids_are_stamped_with_the_controller_clock() {
    let mut c = controller(ScriptedAssistant::default()).with_clock(fixed_clock);
    teen_on_home(&mut c).await;
    c.select_quest("q1").unwrap();
    c.quest_action().unwrap();
    c.place_bid(4000, common::PROPOSAL).unwrap();
    assert_eq!(c.quests().get("q1").unwrap().bids[0].timestamp, fixed_clock());
}
