use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEMO_SOURCE_NAME: &str = "DEMO";
pub const DEMO_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/haldenl/nlpcapstone/master/data/model_data_1.json";

/// A named location an attention payload can be loaded from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct DataSourceRecord {
    pub name: String,
    pub url: String,
}

impl DataSourceRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn demo() -> Self {
        Self::new(DEMO_SOURCE_NAME, DEMO_SOURCE_URL)
    }

    pub fn is_demo(&self) -> bool {
        self.name == DEMO_SOURCE_NAME
    }

    pub fn is_remote(&self) -> bool {
        let url = self.url.trim_start();
        url.starts_with("http://") || url.starts_with("https://")
    }
}
