use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::common::WidgetError;
use crate::configs::DiscordConfig;

const API_BASE: &str = "https://discord.com/api/v10";
const CDN_BASE: &str = "https://cdn.discordapp.com";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordAvatar {
    pub avatar_url: String,
}

pub struct DiscordWidget {
    client: reqwest::Client,
    config: DiscordConfig,
}

impl DiscordWidget {
    pub fn new(client: reqwest::Client, config: DiscordConfig) -> Self {
        Self { client, config }
    }

    /// Resolves the member's guild avatar, falling back to the deterministic
    /// default-embed avatar when none is set.
    pub async fn fetch_avatar(&self) -> Result<DiscordAvatar, WidgetError> {
        let (token, guild_id, user_id) = match (
            self.config.bot_token.as_deref(),
            self.config.guild_id.as_deref(),
            self.config.user_id.as_deref(),
        ) {
            (Some(token), Some(guild_id), Some(user_id)) => (token, guild_id, user_id),
            _ => {
                return Err(WidgetError::Config(
                    "Discord bot token, guild id and user id must be set".to_string(),
                ));
            }
        };

        debug!("Fetching Discord avatar for member {}", user_id);

        let resp = self
            .client
            .get(format!("{}/guilds/{}/members/{}", API_BASE, guild_id, user_id))
            .header("Authorization", format!("Bot {}", token))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WidgetError::Auth(format!("Discord API returned {}", status)));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WidgetError::Payload(format!(
                "guild member {} not found",
                user_id
            )));
        }
        if !status.is_success() {
            return Err(WidgetError::Transient(format!(
                "Discord API returned {}",
                status
            )));
        }

        let member: Value = resp
            .json()
            .await
            .map_err(|e| WidgetError::Payload(e.to_string()))?;

        let avatar_url = match member.get("avatar").and_then(|a| a.as_str()) {
            Some(hash) => guild_avatar_url(guild_id, user_id, hash),
            None => {
                let uid: u64 = user_id.parse().map_err(|_| {
                    WidgetError::Payload(format!("user id '{}' is not a snowflake", user_id))
                })?;
                let discriminator = member
                    .pointer("/user/discriminator")
                    .and_then(|d| d.as_str())
                    .unwrap_or("0");
                default_avatar_url(uid, discriminator)
            }
        };

        Ok(DiscordAvatar { avatar_url })
    }
}

fn guild_avatar_url(guild_id: &str, user_id: &str, hash: &str) -> String {
    format!(
        "{}/guilds/{}/users/{}/avatars/{}.png?size=4096",
        CDN_BASE, guild_id, user_id, hash
    )
}

/// Index of the default embed avatar: the new username system hashes the
/// snowflake, the legacy system hashes the discriminator.
fn default_avatar_index(user_id: u64, discriminator: &str) -> u64 {
    match discriminator.parse::<u64>() {
        Ok(0) | Err(_) => (user_id >> 22) % 6,
        Ok(d) => d % 5,
    }
}

fn default_avatar_url(user_id: u64, discriminator: &str) -> String {
    format!(
        "{}/embed/avatars/{}.png",
        CDN_BASE,
        default_avatar_index(user_id, discriminator)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guild_avatar_url_shape() {
        assert_eq!(
            guild_avatar_url("1234", "5678", "a1b2c3"),
            "https://cdn.discordapp.com/guilds/1234/users/5678/avatars/a1b2c3.png?size=4096"
        );
    }

    #[test]
    fn test_default_avatar_index_new_system() {
        // Discriminator "0" means the new username system: (uid >> 22) % 6.
        let uid: u64 = 302_050_872_383_242_240;
        assert_eq!(default_avatar_index(uid, "0"), (uid >> 22) % 6);
        assert!(default_avatar_index(uid, "0") < 6);
    }

    #[test]
    fn test_default_avatar_index_legacy_system() {
        assert_eq!(default_avatar_index(1, "0001"), 1);
        assert_eq!(default_avatar_index(1, "1337"), 1337 % 5);
        assert!(default_avatar_index(99, "9999") < 5);
    }

    #[test]
    fn test_default_avatar_url_shape() {
        let url = default_avatar_url(4194304, "0"); // (uid >> 22) == 1
        assert_eq!(url, "https://cdn.discordapp.com/embed/avatars/1.png");
    }
}
