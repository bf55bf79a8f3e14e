//! Central place for all default values.
//! Update these and the whole app picks them up.

pub struct Defaults;

impl Defaults {
    /* Timers (milliseconds) */
    pub const SPLASH_MS: u64 = 2500;
    pub const SUBMISSION_CONFIRM_MS: u64 = 1500;
    pub const VERIFIED_ADVANCE_MS: u64 = 2000;
    pub const CODE_SEND_DELAY_MS: u64 = 1000;

    /* Simulated code senders */
    pub const SIMULATED_CODE: &'static str = "111111";
    pub const CODE_LENGTH: usize = 6;

    /* Rewards */
    pub const FALLBACK_REWARD: u64 = 50;

    /* Generative AI service */
    pub const ASSISTANT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    pub const FLASH_MODEL: &'static str = "gemini-2.5-flash";
    pub const PRO_MODEL: &'static str = "gemini-2.5-pro";
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
    // Inline media must fit a 20 MB request once base64 encoded.
    pub const MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;
    pub const MAX_VIDEO_BYTES: u64 = 14 * 1024 * 1024;

    /* Storage */
    pub const DATA_DIR_NAME: &'static str = "tasktribe";
    pub const LOG_FILE: &'static str = "tasktribe.log";
    pub const PREFS_FILE: &'static str = "prefs.json";
    pub const TUTORIAL_KEY: &'static str = "tasktribe_tutorial_completed";

    /* Placeholder artwork */
    pub const CREATED_QUEST_LOGO: &str = "https://placehold.co/64x64/6f42c1/FFFFFF?text=C";
    pub const BID_AVATAR_BASE: &str = "https://placehold.co/64x64/86efac/FFFFFF?text=";

    /* Messages */
    pub const MSG_FLAGGED_DEFAULT: &'static str = "Content violates community guidelines.";
    pub const MSG_MODERATION_UNAVAILABLE: &'static str =
        "An error occurred during verification. Please check your connection and try again.";
    pub const MSG_UNKNOWN_REJECTION: &'static str = "An unknown error occurred.";
    pub const MSG_ANALYSIS_FAILED: &'static str = "Couldn't get AI feedback. Please try again.";
}
