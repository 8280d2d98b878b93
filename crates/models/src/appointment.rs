use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A booking between a client and a business. Both ids are free-form
/// references and are not checked against stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: String,
    pub client_id: String,
    pub business_id: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub client_id: String,
    pub business_id: String,
    pub date: DateTime<Utc>,
}

impl From<NewAppointment> for Appointment {
    fn from(n: NewAppointment) -> Self {
        Appointment { id: String::new(), client_id: n.client_id, business_id: n.business_id, date: n.date }
    }
}

/// Body of `POST /appointments/`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub business_id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl CreateAppointmentRequest {
    /// Validates against `now`; a date equal to `now` is accepted.
    pub fn into_new(self, now: DateTime<Utc>) -> Result<NewAppointment, ModelError> {
        if self.client_id.trim().is_empty() {
            return Err(ModelError::EmptyField("clientId"));
        }
        if self.business_id.trim().is_empty() {
            return Err(ModelError::EmptyField("businessId"));
        }
        let date = match self.date {
            Some(date) if date >= now => date,
            _ => return Err(ModelError::InvalidDate),
        };
        Ok(NewAppointment { client_id: self.client_id, business_id: self.business_id, date })
    }
}

/// Optional equality predicates, combined with AND. Empty strings impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub client_id: Option<String>,
    pub business_id: Option<String>,
}

impl AppointmentFilter {
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn business_id(&self) -> Option<&str> {
        self.business_id.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn req(date: Option<DateTime<Utc>>) -> CreateAppointmentRequest {
        CreateAppointmentRequest { client_id: "c".into(), business_id: "b".into(), date }
    }

    #[test]
    fn date_equal_to_now_is_accepted() {
        let now = Utc::now();
        assert_eq!(req(Some(now)).into_new(now).unwrap().date, now);
    }

    #[test]
    fn date_in_the_past_is_rejected() {
        let now = Utc::now();
        let past = now - Duration::milliseconds(1);
        assert_eq!(req(Some(past)).into_new(now), Err(ModelError::InvalidDate));
        assert_eq!(req(None).into_new(now), Err(ModelError::InvalidDate));
    }

    #[test]
    fn blank_references_are_rejected_in_order() {
        let now = Utc::now();
        let r = CreateAppointmentRequest { client_id: " ".into(), business_id: "".into(), date: Some(now) };
        assert_eq!(r.into_new(now).unwrap_err().to_string(), "clientId cannot be empty");
        let r = CreateAppointmentRequest { client_id: "c".into(), business_id: "".into(), date: Some(now) };
        assert_eq!(r.into_new(now).unwrap_err().to_string(), "businessId cannot be empty");
    }

    #[test]
    fn decodes_rfc3339_dates() {
        let r: CreateAppointmentRequest = serde_json::from_str(
            r#"{"clientId":"c","businessId":"b","date":"2999-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert!(r.date.is_some());
    }
}
