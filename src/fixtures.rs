//! Seed data the controller starts from.
//!
//! Nothing here is persisted. `Fixtures::builtin` reproduces the demo
//! marketplace; `Fixtures::load` reads the same shape from a JSON file so a
//! different marketplace can be injected without touching the state machine.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::types::{
    ChatMessage, ChatRole, Pricing, Quest, QuestBook, QuestStatus, QuestType, Tribe, TribeMember, TribeStatus,
    TribeWar, User, UserRole, WarMission, WarStanding, Winner,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    /// Template for teen accounts; the chosen username replaces the template's.
    pub teen_template: User,
    /// Full profile assigned when adult onboarding completes.
    pub adult_profile: User,
    pub quests: QuestBook,
    pub tribes: Vec<Tribe>,
    /// Tribe shown on the tribes tab once the user is a member.
    pub home_tribe: Tribe,
    pub home_members: Vec<TribeMember>,
    /// Opening lines of the home tribe's chat.
    #[serde(default)]
    pub tribe_chat: Vec<ChatMessage>,
    #[serde(default)]
    pub tribe_war: TribeWar,
}

impl Fixtures {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing fixtures {}", path.display()))
    }

    pub fn builtin(now: OffsetDateTime) -> Self {
        let tribes = builtin_tribes();
        Self {
            teen_template: User {
                username: "Alex_Design".into(),
                is_adult: false,
                level: 1,
                xp: 150,
                is_tribe_member: false,
                tasks_completed: 0,
                rating: None,
                full_name: None,
                headline: None,
                bio: None,
                skills: None,
            },
            adult_profile: User {
                username: "Priya_Designs".into(),
                is_adult: true,
                level: 24,
                xp: 23500,
                is_tribe_member: true,
                tasks_completed: 42,
                rating: Some(4.9),
                full_name: Some("Priya Sharma".into()),
                headline: Some("UX/UI Designer & Illustrator".into()),
                bio: Some(
                    "Passionate designer with 5+ years of experience creating intuitive and beautiful digital \
                     products. Let's build something amazing together!"
                        .into(),
                ),
                skills: Some(
                    ["UI/UX Design", "Figma", "Illustration", "Prototyping", "Web Design"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                ),
            },
            quests: builtin_quests(now),
            tribe_war: builtin_war(&tribes[0]),
            home_tribe: tribes[0].clone(),
            tribes,
            home_members: builtin_members(),
            tribe_chat: vec![
                ChatMessage::new(ChatRole::Notice, "Priya_Designs started a vote to join the Weekend War."),
                ChatMessage::new(ChatRole::Member, "Hey team! Let's do the weekend war? We can win this!"),
                ChatMessage::new(ChatRole::Own, "I'm in!"),
            ],
        }
    }
}

fn builtin_quests(now: OffsetDateTime) -> QuestBook {
    QuestBook::new(vec![
        Quest {
            id: "q1".into(),
            title: "Design a Logo for \"EcoFresh\" startup".into(),
            description: "We need a modern, minimalist logo for our new eco-friendly cleaning products brand.".into(),
            company: "EcoFresh Inc.".into(),
            logo: "https://placehold.co/64x64/28a745/FFFFFF?text=E".into(),
            kind: QuestType::Creative,
            deadline: now + Duration::days(2),
            level: 5,
            pricing: Pricing::Budget(5000),
            creator_id: "Priya_Designs".into(),
            status: QuestStatus::Open,
            bids: vec![],
            winner: None,
            submission: None,
        },
        Quest {
            id: "q2".into(),
            title: "Write 3 Blog Posts about Sustainable Living".into(),
            description: "Looking for a writer to create three 500-word blog posts on topics related to sustainability."
                .into(),
            company: "GreenThumb Blog".into(),
            logo: "https://placehold.co/64x64/17a2b8/FFFFFF?text=G".into(),
            kind: QuestType::Professional,
            deadline: now + Duration::days(5),
            level: 8,
            pricing: Pricing::Reward(3000),
            creator_id: "some_other_user".into(),
            status: QuestStatus::Open,
            bids: vec![],
            winner: None,
            submission: None,
        },
        Quest {
            id: "q3".into(),
            title: "Create a Short promotional video".into(),
            description: "Create a 15-second video for social media promoting our new app.".into(),
            company: "Appify".into(),
            logo: "https://placehold.co/64x64/6f42c1/FFFFFF?text=A".into(),
            kind: QuestType::Creative,
            deadline: now + Duration::hours(18),
            level: 10,
            pricing: Pricing::Budget(8000),
            creator_id: "Priya_Designs".into(),
            status: QuestStatus::PendingVerification,
            bids: vec![],
            winner: Some(Winner { user_id: "Alex_Design".into(), bid_amount: 7500 }),
            submission: None,
        },
    ])
}

fn tribe(
    id: &str,
    name: &str,
    tagline: &str,
    (level, level_name): (u32, &str),
    (members, max_members): (u32, u32),
    (rank, win_rate): (u32, u32),
    tags: &[&str],
    status: TribeStatus,
    (banner_url, icon_url): (&str, &str),
) -> Tribe {
    Tribe {
        id: id.into(),
        name: name.into(),
        tagline: tagline.into(),
        level,
        level_name: level_name.into(),
        members,
        max_members,
        rank,
        win_rate,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status,
        banner_url: banner_url.into(),
        icon_url: icon_url.into(),
    }
}

fn builtin_tribes() -> Vec<Tribe> {
    vec![
        tribe(
            "t1",
            "Design Warriors",
            "Creating beauty, one pixel at a time",
            (18, "Gold"),
            (42, 50),
            (3, 67),
            &["Design", "Creative", "Active"],
            TribeStatus::Recruiting,
            ("https://placehold.co/600x200/1a1a2e/e94560", "https://placehold.co/64x64/e94560/1a1a2e?text=DW"),
        ),
        tribe(
            "t2",
            "Tech Titans",
            "Building the future, one line of code",
            (25, "Platinum"),
            (50, 50),
            (1, 82),
            &["Tech", "Community", "All-Rounder"],
            TribeStatus::Full,
            ("https://placehold.co/600x200/007BFF/FFFFFF", "https://placehold.co/64x64/FFFFFF/007BFF?text=TT"),
        ),
        tribe(
            "t3",
            "Eco Warriors",
            "Saving the planet, one task at a time",
            (12, "Silver"),
            (35, 40),
            (8, 55),
            &["Community", "Social Good"],
            TribeStatus::Recruiting,
            ("https://placehold.co/600x200/28a745/FFFFFF", "https://placehold.co/64x64/FFFFFF/28a745?text=EW"),
        ),
    ]
}

fn builtin_members() -> Vec<TribeMember> {
    let member = |id, name: &str, level, role, colour: &str, xp, quests_completed| TribeMember {
        id,
        name: name.to_string(),
        level,
        role,
        avatar_url: crate::types::avatar_url(name).replace("86efac", colour),
        xp,
        quests_completed,
        bio: "...".into(),
        skills: vec![],
    };
    vec![
        member(1, "Priya_Designs", 24, UserRole::Leader, "a78bfa", 23500, 42),
        member(2, "Rahul_Design", 22, UserRole::CoLeader, "7dd3fc", 21000, 38),
        member(3, "Samira_Art", 18, UserRole::Member, "fcd34d", 15000, 25),
        member(4, "Alex_Design", 1, UserRole::Member, "86efac", 150, 1),
    ]
}

fn builtin_war(home: &Tribe) -> TribeWar {
    let standing = |rank, name: &str, xp, is_user_tribe| WarStanding { rank, name: name.into(), xp, is_user_tribe };
    TribeWar {
        title: "Weekend War #48".into(),
        ends_in: "14h 23m".into(),
        standings: vec![
            standing(1, "Code Crushers", 4890, false),
            standing(2, "Eco Warriors", 4102, false),
            standing(3, "Tech Titans", 3756, false),
            standing(5, &home.name, 2340, true),
        ],
        missions: vec![
            WarMission {
                title: "Speed Run: Complete 5 tasks in 3 hours".into(),
                reward: "+200 tribe XP".into(),
                progress: None,
            },
            WarMission {
                title: "Tribe Unity: 30 members complete 1 task each".into(),
                reward: "+500 tribe XP".into(),
                progress: Some("18/30 Complete".into()),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn builtin_quests_cover_both_pricing_modes() {
        let f = Fixtures::builtin(datetime!(2030-01-01 0:00 UTC));
        assert_eq!(f.quests.len(), 3);
        assert!(f.quests.get("q1").unwrap().pricing.is_bidding());
        assert_eq!(f.quests.get("q2").unwrap().pricing, Pricing::Reward(3000));
        assert_eq!(f.quests.get("q3").unwrap().winner.as_ref().unwrap().bid_amount, 7500);
        assert_eq!(f.home_tribe.id, "t1");
        assert_eq!(f.home_members[3].avatar_url, "https://placehold.co/64x64/86efac/FFFFFF?text=A");
        assert_eq!(f.tribe_chat.len(), 3);
        let own = f.tribe_war.standings.iter().find(|s| s.is_user_tribe).unwrap();
        assert_eq!((own.rank, own.name.as_str()), (5, "Design Warriors"));
    }

    #[test]
    fn load_reads_what_builtin_writes() {
        let f = Fixtures::builtin(datetime!(2030-01-01 0:00 UTC));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        std::fs::write(&path, serde_json::to_string_pretty(&f).unwrap()).unwrap();

        let loaded = Fixtures::load(&path).unwrap();
        assert_eq!(loaded.quests, f.quests);
        assert_eq!(loaded.adult_profile, f.adult_profile);
        assert_eq!(loaded.tribes.len(), 3);
    }

    #[test]
    fn load_rejects_quest_with_both_or_neither_price() {
        let f = Fixtures::builtin(datetime!(2030-01-01 0:00 UTC));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");

        let mut v = serde_json::to_value(&f).unwrap();
        v["quests"][0]["reward"] = 1.into();
        std::fs::write(&path, v.to_string()).unwrap();
        let err = Fixtures::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("both reward and budget"), "{err:#}");

        let q1 = v["quests"][0].as_object_mut().unwrap();
        q1.remove("reward");
        q1.remove("budget");
        std::fs::write(&path, v.to_string()).unwrap();
        let err = Fixtures::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("neither reward nor budget"), "{err:#}");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Fixtures::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
