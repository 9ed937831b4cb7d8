use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitHubConfig {
    pub token: Option<String>,
    #[serde(default = "default_username")]
    pub username: String,
}

fn default_username() -> String {
    "unfortunatelyalex".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            username: default_username(),
        }
    }
}

impl GitHubConfig {
    pub fn with_env_fallbacks(mut self) -> Self {
        if self.token.is_none() {
            self.token = std::env::var("GITHUB_TOKEN").ok();
        }
        self
    }
}
