use serde_json::{json, Value};

pub fn moderation(text: &str) -> String {
    format!(
        r#"You are a content moderator for TaskTribe, a platform used by teenagers.
Keep the platform safe and respectful. Check the text below for:
- Profanity or explicit language
- Hate speech, racism, or discrimination
- Bullying or harassment
- Spam or scams
- Self-harm or dangerous content
- Anything else inappropriate for a teenage audience.

Text: "{text}"

Answer in the requested JSON format. If the text is safe set "isFlagged" to false.
If it breaks the guidelines set "isFlagged" to true and give a short, user-friendly "reason"."#
    )
}

pub fn moderation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isFlagged": { "type": "BOOLEAN", "description": "Whether the content violates guidelines." },
            "reason": { "type": "STRING", "description": "A brief, user-friendly reason for flagging." }
        },
        "required": ["isFlagged"]
    })
}

pub fn quest_validation(title: &str, description: &str, budget: u64) -> String {
    format!(
        r#"Review this task posting for TaskTribe.

Rules:
1. TaskTribe hosts short "quests" (single, completable gigs), not permanent or full-time jobs.
2. The budget is in Indian Rupees (₹). Judge whether it is realistic for the task; simple tasks may pay little.
3. Suggest a more descriptive and appealing description.
4. Answer only in the requested JSON format.

Task Title: "{title}"
Task Description: "{description}"
Proposed Budget: ₹{budget}"#
    )
}

pub fn quest_validation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isJobPosting": { "type": "BOOLEAN" },
            "jobPostingReason": { "type": "STRING" },
            "isBudgetRealistic": { "type": "BOOLEAN" },
            "suggestedMaxBudget": { "type": "NUMBER" },
            "suggestion": { "type": "STRING" },
            "improvedDescription": { "type": "STRING" }
        }
    })
}

pub const IDENTITY_TASK: &str = r#"Generate a simple, unique verification task. The user will write a short random alphanumeric code on paper.
The code is 6 characters long, formatted XX-XXX or XXX-XX.
Answer in the requested JSON format with the code and a friendly instruction such as
"Write the following code on a piece of paper and hold it clearly in a selfie:"."#;

pub fn identity_task_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "code": { "type": "STRING", "description": "A random 6-character alphanumeric code." },
            "instruction": { "type": "STRING", "description": "A user-friendly instruction to write the code and take a photo." }
        },
        "required": ["code", "instruction"]
    })
}

pub fn identity_check(code: &str) -> String {
    format!(
        r#"You are a strict identity verification checker. Confirm the user completed a real-world task.

The user received the code "{code}" and was told to write it on paper and take a selfie holding it.
ALL of the following must hold:
1. Person present and holding the paper: a real face is clearly visible and the person holds the paper. A photo of only the paper fails.
2. Code correct and handwritten: the paper shows exactly "{code}", handwritten, not typed or added digitally.
3. Authentic image: a genuine photograph, not a picture of a screen, a printed photo, or an edited image.

Answer in the requested JSON format. Set "isVerified" to true only if all three hold.
"reason" explains the decision: on failure name the unmet condition
(e.g. "Verification failed because no person was visible in the photo."); on success say
"User and code verified successfully.""#
    )
}

pub fn quest_task(title: &str, code: &str) -> String {
    format!(
        r#"A user finished the task "{title}". To prove it they will photograph the work next to a unique code: "{code}".
Write a simple, friendly instruction telling them to write the code on paper and place it next to the completed work in a photo
(for a design on a screen, the paper goes next to the screen). Answer with a JSON object holding an "instruction" field."#
    )
}

pub fn quest_task_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": { "instruction": { "type": "STRING" } },
        "required": ["instruction"]
    })
}

pub fn quest_check(code: &str, title: &str, description: &str) -> String {
    format!(
        r#"You are a strict verifier for TaskTribe. A user submitted a photo to prove they finished a task.

Task:
- Title: "{title}"
- Description: "{description}"

The photo must show the completed work next to a handwritten code on paper. The code is "{code}".
ALL of the following must hold:
1. Completed work visible: the photo clearly shows the deliverable expected from the title and description.
2. Code correct and handwritten: paper showing exactly "{code}", handwritten.
3. Authentic image: a real photograph, not a screenshot or a photo of a composite on another screen.

Answer in the requested JSON format. Set "isVerified" to true only if all three hold.
"reason" explains the decision: on failure name the unmet condition
(e.g. "Verification failed because the completed work was not visible."); on success say
"Completed work and code verified successfully.""#
    )
}

pub fn verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isVerified": { "type": "BOOLEAN" },
            "reason": { "type": "STRING" }
        },
        "required": ["isVerified", "reason"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_inputs() {
        assert!(moderation("hello there").contains("\"hello there\""));
        assert!(quest_validation("Logo", "Make one", 1500).contains("₹1500"));
        assert!(identity_check("AB-123").matches("AB-123").count() >= 2);
        assert!(quest_check("x1", "Logo", "Make one").contains("\"Logo\""));
    }

    #[test]
    fn verdict_schema_requires_both_fields() {
        let s = verdict_schema();
        assert_eq!(s["required"], json!(["isVerified", "reason"]));
    }
}
