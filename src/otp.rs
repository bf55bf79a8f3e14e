//! One-time code delivery. Only a simulated sender exists: it "sends" by
//! logging and always issues the same code.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::defaults::Defaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Sms,
    Email,
}

#[async_trait]
pub trait CodeSender: Send + Sync {
    /// Deliver a code to `contact` and return the code that was issued.
    async fn send(&self, channel: Channel, contact: &str) -> anyhow::Result<String>;
}

pub struct SimulatedCodeSender {
    delay: Duration,
}

impl SimulatedCodeSender {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedCodeSender {
    fn default() -> Self {
        Self::new(Duration::from_millis(Defaults::CODE_SEND_DELAY_MS))
    }
}

#[async_trait]
impl CodeSender for SimulatedCodeSender {
    async fn send(&self, channel: Channel, contact: &str) -> anyhow::Result<String> {
        let code = Defaults::SIMULATED_CODE.to_string();
        match channel {
            Channel::Sms => info!(to = %contact, %code, "simulated SMS: your TaskTribe verification code"),
            Channel::Email => info!(to = %contact, %code, "simulated email: your TaskTribe one-time password"),
        }
        tokio::time::sleep(self.delay).await;
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_sender_issues_constant_code_after_delay() {
        let sender = SimulatedCodeSender::default();
        let start = tokio::time::Instant::now();
        let code = sender.send(Channel::Sms, "9998887777").await.unwrap();
        assert_eq!(code, "111111");
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
