use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::defaults::Defaults;

pub type QuestId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestType {
    Skill,
    Creative,
    Community,
    Professional,
}

impl QuestType {
    pub fn all() -> [QuestType; 4] {
        [QuestType::Skill, QuestType::Creative, QuestType::Community, QuestType::Professional]
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestType::Skill => "Skill",
            QuestType::Creative => "Creative",
            QuestType::Community => "Community",
            QuestType::Professional => "Professional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestStatus {
    Open,
    InProgress,
    PendingVerification,
    Completed,
    Cancelled,
}

impl QuestStatus {
    /// Status only moves forward. The one self-loop is PENDING_VERIFICATION being
    /// re-entered by a resubmission after a rejected attempt.
    pub fn can_advance_to(self, next: QuestStatus) -> bool {
        use QuestStatus::*;
        matches!(
            (self, next),
            (Open, InProgress)
                | (Open, PendingVerification)
                | (InProgress, PendingVerification)
                | (PendingVerification, PendingVerification)
                | (PendingVerification, Completed)
                | (Open, Cancelled)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestStatus::Open => "Open",
            QuestStatus::InProgress => "In progress",
            QuestStatus::PendingVerification => "Pending verification",
            QuestStatus::Completed => "Completed",
            QuestStatus::Cancelled => "Cancelled",
        }
    }
}

/// How a quest pays out. Fixed-reward quests take direct applications,
/// budgeted quests take bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PricingFields", into = "PricingFields")]
pub enum Pricing {
    Reward(u64),
    Budget(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("quest sets both reward and budget")]
    Both,
    #[error("quest sets neither reward nor budget")]
    Neither,
}

/// Wire form of [`Pricing`]: two optional keys, exactly one of them present.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PricingFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reward: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget: Option<u64>,
}

impl TryFrom<PricingFields> for Pricing {
    type Error = PricingError;

    fn try_from(fields: PricingFields) -> Result<Self, Self::Error> {
        match (fields.reward, fields.budget) {
            (Some(r), None) => Ok(Pricing::Reward(r)),
            (None, Some(b)) => Ok(Pricing::Budget(b)),
            (Some(_), Some(_)) => Err(PricingError::Both),
            (None, None) => Err(PricingError::Neither),
        }
    }
}

impl From<Pricing> for PricingFields {
    fn from(pricing: Pricing) -> Self {
        match pricing {
            Pricing::Reward(r) => PricingFields { reward: Some(r), budget: None },
            Pricing::Budget(b) => PricingFields { reward: None, budget: Some(b) },
        }
    }
}

impl Pricing {
    pub fn reward(&self) -> Option<u64> {
        match self {
            Pricing::Reward(r) => Some(*r),
            Pricing::Budget(_) => None,
        }
    }

    pub fn budget(&self) -> Option<u64> {
        match self {
            Pricing::Budget(b) => Some(*b),
            Pricing::Reward(_) => None,
        }
    }

    pub fn is_bidding(&self) -> bool {
        matches!(self, Pricing::Budget(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub user_id: String,
    pub username: String,
    pub amount: u64,
    pub proposal: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub avatar_url: String,
}

impl Bid {
    pub fn new(user: &User, amount: u64, proposal: &str, timestamp: OffsetDateTime) -> Self {
        Self {
            user_id: user.username.clone(),
            username: user.username.clone(),
            amount,
            proposal: proposal.to_string(),
            timestamp,
            avatar_url: avatar_url(&user.username),
        }
    }
}

/// Placeholder avatar keyed on the first letter of the username.
pub fn avatar_url(username: &str) -> String {
    let initial: String = username.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
    format!("{}{}", Defaults::BID_AVATAR_BASE, initial)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub user_id: String,
    pub bid_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub user_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub company: String,
    pub logo: String,
    #[serde(rename = "type")]
    pub kind: QuestType,
    #[serde(with = "time::serde::rfc3339")]
    pub deadline: OffsetDateTime,
    pub level: u32,
    #[serde(flatten)]
    pub pricing: Pricing,
    pub creator_id: String,
    pub status: QuestStatus,
    #[serde(default)]
    pub bids: Vec<Bid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

impl Quest {
    /// Amount credited on completion: the fixed reward, else the accepted bid.
    pub fn payout(&self) -> Option<u64> {
        self.pricing
            .reward()
            .or_else(|| self.winner.as_ref().map(|w| w.bid_amount))
    }
}

/// The in-memory quest collection. Every update returns a new book and
/// leaves the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestBook {
    quests: Vec<Quest>,
}

impl QuestBook {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self { quests }
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// `q<N>` one past the highest numbered id, so injected books with gaps
    /// never get a duplicate.
    pub fn next_id(&self) -> QuestId {
        let highest = self
            .quests
            .iter()
            .filter_map(|q| q.id.strip_prefix('q')?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("q{}", highest + 1)
    }

    fn replace_one(&self, id: &str, f: impl Fn(&Quest) -> Quest) -> QuestBook {
        QuestBook {
            quests: self
                .quests
                .iter()
                .map(|q| if q.id == id { f(q) } else { q.clone() })
                .collect(),
        }
    }

    pub fn with_bid(&self, id: &str, bid: Bid) -> QuestBook {
        self.replace_one(id, |q| {
            let mut bids = q.bids.clone();
            bids.push(bid.clone());
            Quest { bids, ..q.clone() }
        })
    }

    pub fn with_status(&self, id: &str, status: QuestStatus) -> QuestBook {
        self.replace_one(id, |q| Quest { status, ..q.clone() })
    }

    pub fn with_submission(&self, id: &str, submission: Submission) -> QuestBook {
        self.replace_one(id, |q| Quest {
            status: QuestStatus::PendingVerification,
            submission: Some(submission.clone()),
            ..q.clone()
        })
    }

    pub fn prepend(&self, quest: Quest) -> QuestBook {
        let mut quests = Vec::with_capacity(self.quests.len() + 1);
        quests.push(quest);
        quests.extend(self.quests.iter().cloned());
        QuestBook { quests }
    }

    /// Open quests in collection order, or by ascending deadline.
    pub fn open(&self, by_deadline: bool) -> Vec<&Quest> {
        let mut open: Vec<&Quest> = self.quests.iter().filter(|q| q.status == QuestStatus::Open).collect();
        if by_deadline {
            open.sort_by_key(|q| q.deadline);
        }
        open
    }

    /// Open quests the user could take on (not their own).
    pub fn findable_by(&self, username: &str) -> Vec<&Quest> {
        self.quests
            .iter()
            .filter(|q| q.status == QuestStatus::Open && q.creator_id != username)
            .collect()
    }

    /// Quests the user posted or won.
    pub fn involving(&self, username: &str) -> Vec<&Quest> {
        self.quests
            .iter()
            .filter(|q| q.creator_id == username || q.winner.as_ref().is_some_and(|w| w.user_id == username))
            .collect()
    }

    pub fn posted_by(&self, username: &str) -> Vec<&Quest> {
        self.quests.iter().filter(|q| q.creator_id == username).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub is_adult: bool,
    pub level: u32,
    pub xp: u64,
    pub is_tribe_member: bool,
    pub tasks_completed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

impl User {
    pub fn credited(&self, amount: u64) -> User {
        User {
            xp: self.xp + amount,
            tasks_completed: self.tasks_completed + 1,
            ..self.clone()
        }
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TribeStatus {
    Recruiting,
    #[serde(rename = "Invite Only")]
    InviteOnly,
    Full,
}

impl TribeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TribeStatus::Recruiting => "Recruiting",
            TribeStatus::InviteOnly => "Invite Only",
            TribeStatus::Full => "Full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tribe {
    pub id: String,
    pub name: String,
    pub tagline: String,
    pub level: u32,
    pub level_name: String,
    pub members: u32,
    pub max_members: u32,
    pub rank: u32,
    pub win_rate: u32,
    pub tags: Vec<String>,
    pub status: TribeStatus,
    pub banner_url: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Leader,
    #[serde(rename = "Co-Leader")]
    CoLeader,
    Member,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Leader => "Leader",
            UserRole::CoLeader => "Co-Leader",
            UserRole::Member => "Member",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TribeMember {
    pub id: u32,
    pub name: String,
    pub level: u32,
    pub role: UserRole,
    pub avatar_url: String,
    pub xp: u64,
    pub quests_completed: u32,
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Who wrote a tribe chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    /// Tribe-wide announcement, e.g. a vote being opened.
    #[serde(rename = "system")]
    Notice,
    #[serde(rename = "model")]
    Member,
    /// The signed-in user.
    #[serde(rename = "user")]
    Own,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarStanding {
    pub rank: u32,
    pub name: String,
    pub xp: u64,
    #[serde(default)]
    pub is_user_tribe: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarMission {
    pub title: String,
    pub reward: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

/// The live inter-tribe event shown to members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TribeWar {
    pub title: String,
    pub ends_in: String,
    pub standings: Vec<WarStanding>,
    pub missions: Vec<WarMission>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn quest(id: &str, pricing: Pricing) -> Quest {
        Quest {
            id: id.into(),
            title: format!("Quest {id}"),
            description: "desc".into(),
            company: "Co".into(),
            logo: "logo".into(),
            kind: QuestType::Creative,
            deadline: datetime!(2030-01-01 0:00 UTC),
            level: 1,
            pricing,
            creator_id: "someone".into(),
            status: QuestStatus::Open,
            bids: vec![],
            winner: None,
            submission: None,
        }
    }

    fn user(name: &str) -> User {
        User {
            username: name.into(),
            is_adult: false,
            level: 1,
            xp: 0,
            is_tribe_member: false,
            tasks_completed: 0,
            rating: None,
            full_name: None,
            headline: None,
            bio: None,
            skills: None,
        }
    }

    #[test]
    fn pricing_serializes_as_single_flat_field() {
        let q = quest("q1", Pricing::Budget(5000));
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["budget"], 5000);
        assert!(v.get("reward").is_none());
        assert_eq!(v["status"], "OPEN");
        assert_eq!(v["type"], "Creative");

        let back: Quest = serde_json::from_value(v).unwrap();
        assert_eq!(back.pricing, Pricing::Budget(5000));
    }

    #[test]
    fn quest_with_both_or_neither_price_is_rejected() {
        let mut v = serde_json::to_value(quest("q1", Pricing::Budget(5000))).unwrap();
        v["reward"] = 1.into();
        let err = serde_json::from_value::<Quest>(v.clone()).unwrap_err();
        assert!(err.to_string().contains("both reward and budget"), "{err}");

        v.as_object_mut().unwrap().remove("reward");
        v.as_object_mut().unwrap().remove("budget");
        let err = serde_json::from_value::<Quest>(v).unwrap_err();
        assert!(err.to_string().contains("neither reward nor budget"), "{err}");
    }

    #[test]
    fn next_id_skips_past_gaps() {
        let book = QuestBook::new(vec![quest("q1", Pricing::Reward(1)), quest("q3", Pricing::Budget(2))]);
        assert_eq!(book.next_id(), "q4");
        assert_eq!(QuestBook::default().next_id(), "q1");

        let odd = QuestBook::new(vec![quest("launch", Pricing::Reward(1)), quest("q2", Pricing::Reward(1))]);
        assert_eq!(odd.next_id(), "q3");
    }

    #[test]
    fn with_bid_touches_only_the_target() {
        let book = QuestBook::new(vec![quest("q1", Pricing::Budget(5000)), quest("q2", Pricing::Budget(100))]);
        let bid = Bid::new(&user("alex"), 4000, "a proposal that is long enough", datetime!(2030-01-01 0:00 UTC));
        let next = book.with_bid("q1", bid);

        assert_eq!(next.get("q1").unwrap().bids.len(), 1);
        assert_eq!(next.get("q2").unwrap().bids.len(), 0);
        // the original collection is not modified
        assert_eq!(book.get("q1").unwrap().bids.len(), 0);
    }

    #[test]
    fn bid_avatar_uses_uppercased_initial() {
        let bid = Bid::new(&user("priya"), 1, "x", datetime!(2030-01-01 0:00 UTC));
        assert_eq!(bid.avatar_url, "https://placehold.co/64x64/86efac/FFFFFF?text=P");
    }

    #[test]
    fn status_moves_forward_only() {
        use QuestStatus::*;
        assert!(Open.can_advance_to(PendingVerification));
        assert!(PendingVerification.can_advance_to(Completed));
        assert!(Open.can_advance_to(Cancelled));
        assert!(!Completed.can_advance_to(Open));
        assert!(!Cancelled.can_advance_to(PendingVerification));
        assert!(!PendingVerification.can_advance_to(Open));
    }

    #[test]
    fn payout_prefers_reward_then_winner() {
        let fixed = quest("a", Pricing::Reward(3000));
        assert_eq!(fixed.payout(), Some(3000));

        let mut won = quest("b", Pricing::Budget(8000));
        assert_eq!(won.payout(), None);
        won.winner = Some(Winner { user_id: "alex".into(), bid_amount: 7500 });
        assert_eq!(won.payout(), Some(7500));
    }

    #[test]
    fn listing_queries() {
        let mut mine = quest("q1", Pricing::Budget(10));
        mine.creator_id = "alex".into();
        let mut won = quest("q2", Pricing::Budget(10));
        won.status = QuestStatus::PendingVerification;
        won.winner = Some(Winner { user_id: "alex".into(), bid_amount: 5 });
        let other = quest("q3", Pricing::Reward(10));
        let book = QuestBook::new(vec![mine, won, other]);

        let find: Vec<_> = book.findable_by("alex").iter().map(|q| q.id.clone()).collect();
        assert_eq!(find, vec!["q3"]);
        let yours: Vec<_> = book.involving("alex").iter().map(|q| q.id.clone()).collect();
        assert_eq!(yours, vec!["q1", "q2"]);
        assert_eq!(book.posted_by("alex").len(), 1);
        assert_eq!(book.open(false).len(), 2);
    }

    #[test]
    fn prepend_puts_new_quest_first() {
        let book = QuestBook::new(vec![quest("q1", Pricing::Reward(1))]);
        assert_eq!(book.next_id(), "q2");
        let next = book.prepend(quest("q2", Pricing::Budget(2)));
        assert_eq!(next.iter().next().unwrap().id, "q2");
        assert_eq!(next.len(), 2);
    }
}
