use serde::{Deserialize, Serialize};

/// Enable flags for the individual widget backends.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct WidgetsConfig {
    pub spotify: bool,
    pub github: bool,
    pub discord: bool,
}
