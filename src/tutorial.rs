//! First-run walkthrough shown on the home view, and the small key/value
//! file that remembers it was seen.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::defaults::Defaults;
use crate::types::User;

pub struct TutorialStep {
    pub title: &'static str,
    pub text: &'static str,
}

pub const STEPS: [TutorialStep; 5] = [
    TutorialStep { title: "This is your XP!", text: "Complete tasks to level up." },
    TutorialStep {
        title: "These are Quests",
        text: "Fun tasks you can do to earn Skill Points. Open a quest to apply or bid.",
    },
    TutorialStep { title: "Join a Tribe!", text: "Team up with friends and compete!" },
    TutorialStep { title: "Build your profile", text: "Build your profile with badges and skills." },
    TutorialStep {
        title: "Your Vault stores Skill Points",
        text: "When you turn 18, you can convert them to real money!",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tutorial {
    step: usize,
}

impl Default for Tutorial {
    fn default() -> Self {
        Self { step: 1 }
    }
}

impl Tutorial {
    /// 1-based.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn current(&self) -> &'static TutorialStep {
        &STEPS[self.step - 1]
    }

    /// Advance one step. Returns `true` once the last step has been acknowledged.
    pub fn next(&mut self) -> bool {
        if self.step >= STEPS.len() {
            return true;
        }
        self.step += 1;
        false
    }
}

/// Flat string map persisted as JSON.
#[derive(Debug)]
pub struct Prefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl Prefs {
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path: path.to_path_buf(), values })
    }

    pub fn in_dir(data_dir: &Path) -> Result<Self> {
        Self::open(&data_dir.join(Defaults::PREFS_FILE))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))?;
        debug!(key, path = %self.path.display(), "pref saved");
        Ok(())
    }

    pub fn tutorial_completed(&self) -> bool {
        self.get(Defaults::TUTORIAL_KEY).is_some()
    }

    pub fn mark_tutorial_completed(&mut self) -> Result<()> {
        self.set(Defaults::TUTORIAL_KEY, "true")
    }
}

/// Teens see the walkthrough until they finish or skip it once.
pub fn should_show(user: &User, prefs: &Prefs) -> bool {
    !user.is_adult && !prefs.tutorial_completed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;
    use time::OffsetDateTime;

    #[test]
    fn five_steps_then_done() {
        let mut t = Tutorial::default();
        assert_eq!(t.current().title, "This is your XP!");
        for _ in 0..4 {
            assert!(!t.next());
        }
        assert_eq!(t.step(), 5);
        assert!(t.current().title.starts_with("Your Vault"));
        assert!(t.next());
    }

    #[test]
    fn completion_flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixtures::builtin(OffsetDateTime::now_utc());

        let mut prefs = Prefs::in_dir(dir.path()).unwrap();
        assert!(should_show(&fx.teen_template, &prefs));
        assert!(!should_show(&fx.adult_profile, &prefs));
        prefs.mark_tutorial_completed().unwrap();

        let reopened = Prefs::in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get("tasktribe_tutorial_completed"), Some("true"));
        assert!(!should_show(&fx.teen_template, &reopened));
    }

    #[test]
    fn corrupt_prefs_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Prefs::open(&path).is_err());
    }
}
