use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DiscordConfig {
    #[serde(rename = "botToken")]
    pub bot_token: Option<String>,
    #[serde(rename = "guildId")]
    pub guild_id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl DiscordConfig {
    pub fn with_env_fallbacks(mut self) -> Self {
        if self.bot_token.is_none() {
            self.bot_token = std::env::var("DC_TOKEN").ok();
        }
        if self.guild_id.is_none() {
            self.guild_id = std::env::var("DC_GID").ok();
        }
        if self.user_id.is_none() {
            self.user_id = std::env::var("DC_UID").ok();
        }
        self
    }
}
