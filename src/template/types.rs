use serde::{Deserialize, Serialize};

/// Entry of the template directory.
///
/// The name encodes purpose and market: `purpose-MARKET-variant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub name: String,
}

impl TemplateDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Second `-`-delimited segment of the name, if any
    pub fn market_code(&self) -> Option<&str> {
        self.name.split('-').nth(1)
    }
}

/// Template file body as stored in the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateContent {
    pub from: String,
    pub subject: String,
    /// May contain `{{order.field}}` placeholders
    pub body: String,
}
