//! Transaction category value objects.

use serde::{Deserialize, Serialize};

/// Category direction, mirrored from the backend enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Movement between own accounts; excluded from income/expense sums.
    Transfer,
}

/// A transaction category as returned by the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Category direction.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Optional icon name for display.
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional display color.
    #[serde(default)]
    pub color: Option<String>,
    /// System categories cannot be edited by the user.
    #[serde(default)]
    pub is_system: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_type_uses_screaming_snake_case() {
        let ty: CategoryType = serde_json::from_str("\"EXPENSE\"").unwrap();
        assert_eq!(ty, CategoryType::Expense);
        assert_eq!(serde_json::to_string(&CategoryType::Transfer).unwrap(), "\"TRANSFER\"");
    }
}
