use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{AlertMessage, Notifier};
use crate::config::TelegramConfig;
use crate::utils::error::AppError;
use crate::Result;

pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            config,
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, message: &AlertMessage) -> Result<()> {
        let text = message.render();
        let form = [("chat_id", self.config.chat_id.as_str()), ("text", text.as_str())];

        // The request URL embeds the bot token, strip it from transport errors.
        let response = self
            .client
            .post(self.send_message_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notification {
                channel: self.name().to_string(),
                status: status.as_u16(),
            });
        }

        debug!("Telegram alert delivered for {}", message.item_name);
        Ok(())
    }
}
