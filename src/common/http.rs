use std::time::Duration;

use reqwest::{Client, Error};

const DEFAULT_USER_AGENT: &str = concat!("dashlink/", env!("CARGO_PKG_VERSION"));

pub struct HttpClient;

impl HttpClient {
    pub fn default_user_agent() -> String {
        DEFAULT_USER_AGENT.to_string()
    }

    pub fn new() -> Result<Client, Error> {
        Client::builder()
            .user_agent(Self::default_user_agent())
            .timeout(Duration::from_secs(10))
            .build()
    }
}
