use std::sync::Arc;

use crate::configs::Config;
use crate::widgets::discord::DiscordWidget;
use crate::widgets::github::GitHubWidget;
use crate::widgets::spotify::SpotifyWidget;

/// Widget registry, built once at startup from the enable flags.
pub struct WidgetManager {
    pub spotify: Option<Arc<SpotifyWidget>>,
    pub github: Option<Arc<GitHubWidget>>,
    pub discord: Option<Arc<DiscordWidget>>,
}

impl WidgetManager {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        let spotify = if config.widgets.spotify {
            tracing::info!("Enabled widget: Spotify now-playing");
            Some(Arc::new(SpotifyWidget::new(
                client.clone(),
                config.spotify.clone().unwrap_or_default(),
            )))
        } else {
            None
        };

        let github = if config.widgets.github {
            tracing::info!("Enabled widget: GitHub contributions");
            Some(Arc::new(GitHubWidget::new(
                client.clone(),
                config.github.clone().unwrap_or_default(),
            )))
        } else {
            None
        };

        let discord = if config.widgets.discord {
            tracing::info!("Enabled widget: Discord avatar");
            Some(Arc::new(DiscordWidget::new(
                client.clone(),
                config.discord.clone().unwrap_or_default(),
            )))
        } else {
            None
        };

        Self {
            spotify,
            github,
            discord,
        }
    }

    pub fn widget_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.spotify.is_some() {
            names.push("spotify".to_string());
        }
        if self.github.is_some() {
            names.push("github".to_string());
        }
        if self.discord.is_some() {
            names.push("discord".to_string());
        }
        names
    }
}
