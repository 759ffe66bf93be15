use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calendars::repo::{CalendarChanges, CalendarProvider, CalendarWithOwner, NewCalendar};
use crate::error::ApiError;
use crate::users::dto::Owner;
use crate::validation::{is_valid_email, FieldErrors};

pub(crate) fn parse_calendar_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid calendar ID format".into()))
}

fn parse_provider(raw: &str) -> Option<CalendarProvider> {
    match raw {
        "GOOGLE" => Some(CalendarProvider::Google),
        "OUTLOOK" => Some(CalendarProvider::Outlook),
        _ => None,
    }
}

fn parse_token_expiry(
    raw: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<OffsetDateTime> {
    let raw = raw?;
    match OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339) {
        Ok(dt) => Some(dt),
        Err(_) => {
            errors.push("tokenExpiry", "Invalid datetime format");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarRequest {
    pub user_id: Option<i32>,
    pub provider: Option<String>,
    pub email: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<String>,
    pub timezone: Option<String>,
}

impl CreateCalendarRequest {
    pub fn validate(self) -> Result<NewCalendar, ApiError> {
        let mut errors = FieldErrors::new();

        match self.user_id {
            None => errors.push("userId", "User ID is required"),
            Some(id) if id <= 0 => errors.push("userId", "User ID must be a positive integer"),
            _ => {}
        }

        let provider = match self.provider.as_deref() {
            None => {
                errors.push("provider", "Provider is required");
                None
            }
            Some(raw) => match parse_provider(raw) {
                Some(p) => Some(p),
                None => {
                    errors.push("provider", "Provider must be one of GOOGLE, OUTLOOK");
                    None
                }
            },
        };

        match self.email.as_deref() {
            None => errors.push("email", "Email is required"),
            Some(e) if !is_valid_email(e) => errors.push("email", "Invalid email format"),
            _ => {}
        }

        let token_expiry = parse_token_expiry(self.token_expiry.as_deref(), &mut errors);

        errors.into_result("Invalid calendar data")?;
        Ok(NewCalendar {
            user_id: self.user_id.unwrap_or_default(),
            provider: provider.unwrap_or(CalendarProvider::Google),
            email: self.email.unwrap_or_default(),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_expiry,
            timezone: self.timezone,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCalendarRequest {
    pub provider: Option<String>,
    pub email: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<String>,
    pub timezone: Option<String>,
}

impl UpdateCalendarRequest {
    pub fn validate(self) -> Result<CalendarChanges, ApiError> {
        if self.provider.is_none()
            && self.email.is_none()
            && self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.token_expiry.is_none()
            && self.timezone.is_none()
        {
            return Err(ApiError::BadRequest(
                "At least one field is required to update".into(),
            ));
        }

        let mut errors = FieldErrors::new();

        let provider = match self.provider.as_deref() {
            None => None,
            Some(raw) => match parse_provider(raw) {
                Some(p) => Some(p),
                None => {
                    errors.push("provider", "Provider must be one of GOOGLE, OUTLOOK");
                    None
                }
            },
        };

        if let Some(e) = self.email.as_deref() {
            if !is_valid_email(e) {
                errors.push("email", "Invalid email format");
            }
        }

        let token_expiry = parse_token_expiry(self.token_expiry.as_deref(), &mut errors);

        errors.into_result("Invalid update data")?;
        Ok(CalendarChanges {
            provider,
            email: self.email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_expiry,
            timezone: self.timezone,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCalendarsQuery {
    pub user_id: Option<String>,
}

/// Calendar as rendered to clients, owner attached as a safe sub-object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub id: Uuid,
    pub user_id: i32,
    pub provider: CalendarProvider,
    pub email: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub token_expiry: Option<OffsetDateTime>,
    pub timezone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub connected_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: Owner,
}

impl From<CalendarWithOwner> for CalendarResponse {
    fn from(row: CalendarWithOwner) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            provider: row.provider,
            email: row.email,
            access_token: row.access_token,
            refresh_token: row.refresh_token,
            token_expiry: row.token_expiry,
            timezone: row.timezone,
            connected_at: row.connected_at,
            created_at: row.created_at,
            user: Owner {
                id: row.user_id,
                email: row.owner_email,
                name: row.owner_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(provider: Option<&str>) -> CreateCalendarRequest {
        CreateCalendarRequest {
            user_id: Some(1),
            provider: provider.map(String::from),
            email: Some("cal@example.com".into()),
            access_token: None,
            refresh_token: None,
            token_expiry: None,
            timezone: None,
        }
    }

    #[test]
    fn create_accepts_known_providers() {
        let new = create_req(Some("GOOGLE")).validate().expect("valid");
        assert_eq!(new.provider, CalendarProvider::Google);
        let new = create_req(Some("OUTLOOK")).validate().expect("valid");
        assert_eq!(new.provider, CalendarProvider::Outlook);
    }

    #[test]
    fn create_rejects_unknown_provider_with_field_map() {
        let err = create_req(Some("ICLOUD")).validate().unwrap_err();
        match err {
            ApiError::Validation { errors, .. } => {
                assert!(errors["provider"][0]
                    .as_str()
                    .unwrap()
                    .contains("GOOGLE, OUTLOOK"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_non_positive_user_id() {
        let mut req = create_req(Some("GOOGLE"));
        req.user_id = Some(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_rejects_bad_token_expiry() {
        let mut req = create_req(Some("GOOGLE"));
        req.token_expiry = Some("next week".into());
        let err = req.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn create_parses_token_expiry() {
        let mut req = create_req(Some("GOOGLE"));
        req.token_expiry = Some("2025-12-01T00:00:00Z".into());
        let new = req.validate().expect("valid");
        assert!(new.token_expiry.is_some());
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let req = UpdateCalendarRequest {
            provider: None,
            email: None,
            access_token: None,
            refresh_token: None,
            token_expiry: None,
            timezone: None,
        };
        assert!(matches!(req.validate().unwrap_err(), ApiError::BadRequest(_)));
    }

    #[test]
    fn calendar_id_must_be_a_uuid() {
        assert!(parse_calendar_id("not-a-uuid").is_err());
        assert!(parse_calendar_id("00000000-0000-0000-0000-000000000000").is_ok());
    }

    #[test]
    fn provider_serializes_uppercase() {
        let json = serde_json::to_value(CalendarProvider::Google).unwrap();
        assert_eq!(json, "GOOGLE");
    }
}
