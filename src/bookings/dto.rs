use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::bookings::repo::{BookingChanges, BookingWithOwner, NewBooking};
use crate::error::ApiError;
use crate::users::dto::Owner;

pub(crate) fn parse_datetime(raw: &str, field: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|_| ApiError::BadRequest(format!("Invalid {field} format")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<i32>,
    pub service_id: Option<i32>,
}

impl CreateBookingRequest {
    pub fn validate(self) -> Result<NewBooking, ApiError> {
        let (start_raw, end_raw, user_id, service_id) =
            match (self.start_time, self.end_time, self.user_id, self.service_id) {
                (Some(s), Some(e), Some(u), Some(sv)) => (s, e, u, sv),
                _ => {
                    return Err(ApiError::BadRequest(
                        "startTime, endTime, userId, and serviceId are required".into(),
                    ))
                }
            };
        let start_time = parse_datetime(&start_raw, "startTime")?;
        let end_time = parse_datetime(&end_raw, "endTime")?;
        if end_time <= start_time {
            return Err(ApiError::BadRequest(
                "endTime must be after startTime".into(),
            ));
        }
        Ok(NewBooking {
            start_time,
            end_time,
            status: self.status,
            notes: self.notes,
            user_id,
            service_id,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub service_id: Option<i32>,
}

impl UpdateBookingRequest {
    pub fn validate(self) -> Result<BookingChanges, ApiError> {
        if self.start_time.is_none()
            && self.end_time.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.service_id.is_none()
        {
            return Err(ApiError::BadRequest(
                "At least one field is required to update".into(),
            ));
        }
        let start_time = self
            .start_time
            .as_deref()
            .map(|s| parse_datetime(s, "startTime"))
            .transpose()?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|s| parse_datetime(s, "endTime"))
            .transpose()?;
        Ok(BookingChanges {
            start_time,
            end_time,
            status: self.status,
            notes: self.notes,
            service_id: self.service_id,
        })
    }
}

/// Booking as rendered to clients, owner attached as a safe sub-object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub user_id: i32,
    pub service_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub user: Owner,
}

impl From<BookingWithOwner> for BookingResponse {
    fn from(row: BookingWithOwner) -> Self {
        Self {
            id: row.id,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status,
            notes: row.notes,
            user_id: row.user_id,
            service_id: row.service_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
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

    fn create_req(start: Option<&str>, end: Option<&str>) -> CreateBookingRequest {
        CreateBookingRequest {
            start_time: start.map(String::from),
            end_time: end.map(String::from),
            status: None,
            notes: None,
            user_id: Some(1),
            service_id: Some(2),
        }
    }

    #[test]
    fn create_accepts_ordered_times() {
        let new = create_req(Some("2025-06-01T10:00:00Z"), Some("2025-06-01T11:00:00Z"))
            .validate()
            .expect("valid");
        assert!(new.end_time > new.start_time);
        assert_eq!(new.user_id, 1);
        assert_eq!(new.service_id, 2);
    }

    #[test]
    fn create_rejects_end_before_start() {
        let err = create_req(Some("2025-06-01T11:00:00Z"), Some("2025-06-01T10:00:00Z"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "endTime must be after startTime"));
    }

    #[test]
    fn create_rejects_equal_times() {
        let err = create_req(Some("2025-06-01T10:00:00Z"), Some("2025-06-01T10:00:00Z"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn create_rejects_missing_fields() {
        let err = create_req(Some("2025-06-01T10:00:00Z"), None)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("required")));
    }

    #[test]
    fn create_rejects_unparseable_dates() {
        let err = create_req(Some("tomorrow"), Some("2025-06-01T10:00:00Z"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid startTime format"));
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let req = UpdateBookingRequest {
            start_time: None,
            end_time: None,
            status: None,
            notes: None,
            service_id: None,
        };
        assert!(matches!(req.validate().unwrap_err(), ApiError::BadRequest(_)));
    }

    #[test]
    fn update_parses_present_times() {
        let req = UpdateBookingRequest {
            start_time: Some("2025-06-01T10:00:00Z".into()),
            end_time: None,
            status: Some("CONFIRMED".into()),
            notes: None,
            service_id: None,
        };
        let changes = req.validate().expect("valid");
        assert!(changes.start_time.is_some());
        assert!(changes.end_time.is_none());
        assert_eq!(changes.status.as_deref(), Some("CONFIRMED"));
    }

    #[test]
    fn update_rejects_bad_end_time() {
        let req = UpdateBookingRequest {
            start_time: None,
            end_time: Some("not-a-date".into()),
            status: None,
            notes: None,
            service_id: None,
        };
        let err = req.validate().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid endTime format"));
    }
}
