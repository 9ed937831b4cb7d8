pub mod calendar;

pub use calendar::{ContributionDay, MonthLabel, contribution_level, month_labels, tooltip_for};

use serde::Serialize;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::common::WidgetError;
use crate::configs::GitHubConfig;

const GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// The calendar query spans slightly more than a year so the first visible
/// week column is always fully populated.
const QUERY_PERIOD_DAYS: i64 = 371;

const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!, $from: DateTime!, $to: DateTime!) {
    user(login: $username) {
        contributionsCollection(from: $from, to: $to) {
            contributionCalendar {
                totalContributions
                weeks {
                    contributionDays {
                        contributionCount
                        date
                    }
                }
            }
        }
        avatarUrl
    }
}
"#;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub username: String,
    pub total_contributions: u32,
    pub avatar_url: String,
    /// Week columns, oldest first; each week holds up to seven day cells.
    pub weeks: Vec<Vec<ContributionDay>>,
    pub months: Vec<MonthLabel>,
}

pub struct GitHubWidget {
    client: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubWidget {
    pub fn new(client: reqwest::Client, config: GitHubConfig) -> Self {
        Self { client, config }
    }

    /// Fetches and shapes the trailing-year contribution calendar.
    pub async fn fetch_contributions(&self) -> Result<ContributionCalendar, WidgetError> {
        let token = self.config.token.as_deref().ok_or_else(|| {
            WidgetError::Config("GitHub token not set (GITHUB_TOKEN or [github].token)".to_string())
        })?;

        let to = OffsetDateTime::now_utc();
        let from = to - Duration::days(QUERY_PERIOD_DAYS);
        let rfc3339 = time::format_description::well_known::Rfc3339;

        debug!("Fetching GitHub contributions for {}", self.config.username);

        let resp = self
            .client
            .post(GRAPHQL_URL)
            .bearer_auth(token)
            .json(&json!({
                "query": CONTRIBUTIONS_QUERY,
                "variables": {
                    "username": self.config.username,
                    "from": from.format(&rfc3339).unwrap_or_default(),
                    "to": to.format(&rfc3339).unwrap_or_default(),
                },
            }))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WidgetError::Auth(format!(
                "GitHub GraphQL endpoint returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(WidgetError::Transient(format!(
                "GitHub GraphQL endpoint returned {}",
                status
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| WidgetError::Payload(e.to_string()))?;

        if let Some(message) = body.pointer("/errors/0/message").and_then(|m| m.as_str()) {
            return Err(WidgetError::Payload(format!("GitHub API error: {}", message)));
        }

        let user = body
            .pointer("/data/user")
            .filter(|u| !u.is_null())
            .ok_or_else(|| {
                WidgetError::Payload(format!("user '{}' not found", self.config.username))
            })?;

        Ok(shape_calendar(
            user,
            self.config.username.clone(),
            to.date(),
        ))
    }
}

/// Buckets the GraphQL user payload into the view the chart renders.
fn shape_calendar(user: &Value, username: String, today: time::Date) -> ContributionCalendar {
    let calendar = user.pointer("/contributionsCollection/contributionCalendar");

    let total_contributions = calendar
        .and_then(|c| c.get("totalContributions"))
        .and_then(|t| t.as_u64())
        .unwrap_or(0) as u32;

    let weeks = calendar
        .and_then(|c| c.get("weeks"))
        .and_then(|w| w.as_array())
        .map(|weeks| {
            weeks
                .iter()
                .map(|week| {
                    week
                        .pointer("/contributionDays")
                        .and_then(|d| d.as_array())
                        .map(|days| {
                            days
                                .iter()
                                .map(|day| {
                                    let date = day
                                        .get("date")
                                        .and_then(|d| d.as_str())
                                        .unwrap_or_default()
                                        .to_string();
                                    let count = day
                                        .get("contributionCount")
                                        .and_then(|c| c.as_u64())
                                        .unwrap_or(0) as u32;
                                    ContributionDay {
                                        tooltip: tooltip_for(&date, count),
                                        level: contribution_level(count),
                                        date,
                                        count,
                                    }
                                })
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default();

    ContributionCalendar {
        username,
        total_contributions,
        avatar_url: user
            .get("avatarUrl")
            .and_then(|u| u.as_str())
            .unwrap_or_default()
            .to_string(),
        weeks,
        months: month_labels(today),
    }
}
