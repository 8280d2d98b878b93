use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
}

impl From<NewClient> for Client {
    fn from(n: NewClient) -> Self {
        Client {
            id: String::new(),
            first_name: n.first_name,
            last_name: n.last_name,
            images: Vec::new(),
            user_id: n.user_id,
        }
    }
}

/// Body of `POST /clients/`. Older callers send `firstname`/`lastname`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    #[serde(default, alias = "firstname")]
    pub first_name: String,
    #[serde(default, alias = "lastname")]
    pub last_name: String,
}

impl CreateClientRequest {
    pub fn into_new(self, user_id: impl Into<String>) -> Result<NewClient, ModelError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(NewClient { first_name: self.first_name, last_name: self.last_name, user_id: user_id.into() })
    }
}

/// Clients are listed unfiltered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientFilter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_field_names() {
        let req: CreateClientRequest =
            serde_json::from_str(r#"{"firstname":"Ada","lastname":"Lovelace"}"#).unwrap();
        assert_eq!(req.first_name, "Ada");
        assert_eq!(req.last_name, "Lovelace");
    }

    #[test]
    fn either_blank_name_is_rejected() {
        let req = CreateClientRequest { first_name: "Ada".into(), last_name: " ".into() };
        assert_eq!(req.into_new("u"), Err(ModelError::EmptyName));
        let req = CreateClientRequest { first_name: "".into(), last_name: "L".into() };
        assert_eq!(req.into_new("u"), Err(ModelError::EmptyName));
    }
}
