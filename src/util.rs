// src/util.rs
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use time::OffsetDateTime;

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Seven character verification code: two letters, two digits, two symbols
/// and one character from any class, shuffled.
pub fn generate_complex_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut pick = |set: &[u8]| set[rng.gen_range(0..set.len())] as char;
    let any: Vec<u8> = [LETTERS, DIGITS, SYMBOLS].concat();

    let mut code = vec![
        pick(LETTERS),
        pick(LETTERS),
        pick(DIGITS),
        pick(DIGITS),
        pick(SYMBOLS),
        pick(SYMBOLS),
        pick(&any),
    ];
    code.shuffle(rng);
    code.into_iter().collect()
}

/// Read a whole file, refusing anything over `max` bytes.
pub fn read_capped(path: &Path, max: u64) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut bytes = Vec::new();
    // one byte past the cap is enough to tell it was too big
    file.take(max + 1)
        .read_to_end(&mut bytes)
        .with_context(|| format!("reading {}", path.display()))?;
    if bytes.len() as u64 > max {
        bail!("{} is larger than {} bytes", path.display(), max);
    }
    Ok(bytes)
}

pub fn time_left(deadline: OffsetDateTime, now: OffsetDateTime) -> String {
    let diff = deadline - now;
    if diff.whole_milliseconds() <= 0 {
        return "Deadline passed".into();
    }
    let days = diff.whole_days();
    if days > 1 {
        return format!("{days} days left");
    }
    let hours = diff.whole_hours();
    if hours > 1 {
        return format!("{hours} hours left");
    }
    format!("{} minutes left", diff.whole_minutes())
}

pub fn time_ago(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let seconds = (now - then).whole_seconds() as f64;
    let units = [
        (31_536_000.0, "years"),
        (2_592_000.0, "months"),
        (86_400.0, "days"),
        (3_600.0, "hours"),
        (60.0, "minutes"),
    ];
    for (size, name) in units {
        let interval = seconds / size;
        if interval > 1.0 {
            return format!("{} {name} ago", interval.floor() as i64);
        }
    }
    "just now".into()
}

/// Amounts are shown in rupees.
pub fn rupees(amount: u64) -> String {
    format!("₹{amount}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use time::macros::datetime;
    use time::Duration;

    #[test]
    fn read_capped_refuses_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [7u8; 16]).unwrap();

        assert_eq!(read_capped(&path, 16).unwrap().len(), 16);
        let err = read_capped(&path, 15).unwrap_err();
        assert!(err.to_string().contains("larger than 15 bytes"), "{err}");
    }

    #[test]
    fn complex_code_has_every_class() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = generate_complex_code(&mut rng);
            assert_eq!(code.chars().count(), 7);
            assert!(code.chars().filter(|c| c.is_ascii_alphabetic()).count() >= 2);
            assert!(code.chars().filter(|c| c.is_ascii_digit()).count() >= 2);
            assert!(code.chars().filter(|c| SYMBOLS.contains(&(*c as u8))).count() >= 2);
        }
    }

    #[test]
    fn time_left_buckets() {
        let now = datetime!(2030-01-01 0:00 UTC);
        assert_eq!(time_left(now - Duration::minutes(1), now), "Deadline passed");
        assert_eq!(time_left(now + Duration::days(5), now), "5 days left");
        assert_eq!(time_left(now + Duration::hours(18), now), "18 hours left");
        assert_eq!(time_left(now + Duration::minutes(45), now), "45 minutes left");
    }

    #[test]
    fn time_ago_buckets() {
        let now = datetime!(2030-06-01 0:00 UTC);
        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3 days ago");
        assert_eq!(time_ago(now - Duration::days(400), now), "1 years ago");
    }
}
