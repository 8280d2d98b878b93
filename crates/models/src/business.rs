use serde::{Deserialize, Serialize};

use crate::{category::Category, errors::ModelError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub user_id: String,
}

/// Validated fields for a business about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBusiness {
    pub name: String,
    pub category: Category,
    pub user_id: String,
}

impl From<NewBusiness> for Business {
    fn from(n: NewBusiness) -> Self {
        Business {
            id: String::new(),
            name: n.name,
            category: n.category,
            images: Vec::new(),
            user_id: n.user_id,
        }
    }
}

/// Body of `POST /businesses/`.
///
/// Category is kept as a raw string so an unknown tag is reported as
/// `invalid category` rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBusinessRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl CreateBusinessRequest {
    pub fn into_new(self, user_id: impl Into<String>) -> Result<NewBusiness, ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        let category = self.category.parse::<Category>()?;
        Ok(NewBusiness { name: self.name, category, user_id: user_id.into() })
    }
}

/// Equality predicates for listing businesses. An empty category means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessFilter {
    pub category: Option<String>,
}

impl BusinessFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self { category: Some(category.into()) }
    }

    /// The category predicate to apply, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Returns `InvalidCategory` for a non-empty tag outside the closed set.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self.category() {
            Some(tag) if !Category::is_valid(tag) => Err(ModelError::InvalidCategory),
            _ => Ok(()),
        }
    }
}
