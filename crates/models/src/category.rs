use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Closed set of business categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pets,
    #[serde(rename = "auto", alias = "automotive")]
    Automotive,
    Events,
    Beauty,
    Home,
    Health,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Pets,
        Category::Automotive,
        Category::Events,
        Category::Beauty,
        Category::Home,
        Category::Health,
    ];

    /// Wire tag, as stored and as matched by list filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pets => "pets",
            Category::Automotive => "auto",
            Category::Events => "events",
            Category::Beauty => "beauty",
            Category::Home => "home",
            Category::Health => "health",
        }
    }

    /// Membership test over the closed set. Total, never panics.
    pub fn is_valid(tag: &str) -> bool {
        tag.parse::<Category>().is_ok()
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "automotive" {
            return Ok(Category::Automotive);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(ModelError::InvalidCategory)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_member_round_trips_through_its_tag() {
        for c in Category::ALL {
            assert!(Category::is_valid(c.as_str()));
            assert_eq!(c.as_str().parse::<Category>(), Ok(c));
        }
    }

    #[test]
    fn rejects_unknown_and_empty_tags() {
        assert!(!Category::is_valid(""));
        assert!(!Category::is_valid("plumbing"));
        assert!(!Category::is_valid("Pets"));
        assert_eq!("x".parse::<Category>(), Err(ModelError::InvalidCategory));
    }

    #[test]
    fn automotive_is_an_alias_of_auto() {
        assert_eq!("automotive".parse::<Category>(), Ok(Category::Automotive));
        let c: Category = serde_json::from_str("\"automotive\"").unwrap();
        assert_eq!(c, Category::Automotive);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"auto\"");
    }
}
