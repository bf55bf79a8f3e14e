use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::fixtures::Fixtures;
use crate::types::Quest;

pub fn list(fixtures: &Fixtures) -> Vec<Quest> {
    fixtures.quests.iter().cloned().collect()
}

pub fn emit(quests: Vec<Quest>, out: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(&quests)?;
    if let Some(p) = out {
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&p, json).with_context(|| format!("writing {}", p.display()))?;
        println!("✓ Wrote {} quests to {}", quests.len(), p.display());
    } else {
        println!("{json}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn emitted_file_loads_back_as_quests() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/quests.json");
        let quests = list(&Fixtures::builtin(datetime!(2025-06-01 12:00 UTC)));
        emit(quests.clone(), Some(out.clone())).unwrap();

        let text = fs::read_to_string(out).unwrap();
        let back: Vec<Quest> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, quests);
        assert!(text.contains("\"PENDING_VERIFICATION\""));
    }
}
