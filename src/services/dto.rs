use serde::Deserialize;

use crate::error::ApiError;
use crate::services::repo::{NewService, ServiceChanges};

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i32>,
    pub available: Option<bool>,
}

impl CreateServiceRequest {
    pub fn validate(self) -> Result<NewService, ApiError> {
        let name = self.name.filter(|n| !n.trim().is_empty());
        let (name, price, duration) = match (name, self.price, self.duration) {
            (Some(n), Some(p), Some(d)) => (n, p, d),
            _ => {
                return Err(ApiError::BadRequest(
                    "Name, price, and duration are required".into(),
                ))
            }
        };
        if price < 0.0 {
            return Err(ApiError::BadRequest("Price cannot be negative".into()));
        }
        if duration <= 0 {
            return Err(ApiError::BadRequest("Duration must be positive".into()));
        }
        Ok(NewService {
            name,
            description: self.description,
            price,
            duration,
            available: self.available.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i32>,
    pub available: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn validate(self) -> Result<ServiceChanges, ApiError> {
        // An empty name counts as absent, same as on create.
        let name = self.name.filter(|n| !n.trim().is_empty());
        if name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.duration.is_none()
            && self.available.is_none()
        {
            return Err(ApiError::BadRequest(
                "At least one field is required to update".into(),
            ));
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(ApiError::BadRequest("Price cannot be negative".into()));
            }
        }
        if let Some(duration) = self.duration {
            if duration <= 0 {
                return Err(ApiError::BadRequest("Duration must be positive".into()));
            }
        }
        Ok(ServiceChanges {
            name,
            description: self.description,
            price: self.price,
            duration: self.duration,
            available: self.available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(price: Option<f64>, duration: Option<i32>) -> CreateServiceRequest {
        CreateServiceRequest {
            name: Some("Haircut".into()),
            description: None,
            price,
            duration,
            available: None,
        }
    }

    #[test]
    fn create_defaults_available_to_true() {
        let new = create_req(Some(20.0), Some(30)).validate().expect("valid");
        assert!(new.available);
        assert_eq!(new.name, "Haircut");
        assert_eq!(new.price, 20.0);
        assert_eq!(new.duration, 30);
    }

    #[test]
    fn create_allows_zero_price() {
        assert!(create_req(Some(0.0), Some(15)).validate().is_ok());
    }

    #[test]
    fn create_rejects_missing_required_fields() {
        let err = create_req(None, Some(30)).validate().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("required")));
    }

    #[test]
    fn create_rejects_negative_price() {
        let err = create_req(Some(-1.0), Some(30)).validate().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Price cannot be negative"));
    }

    #[test]
    fn create_rejects_non_positive_duration() {
        for d in [0, -5] {
            let err = create_req(Some(10.0), Some(d)).validate().unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Duration must be positive"));
        }
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let req = UpdateServiceRequest {
            name: None,
            description: None,
            price: None,
            duration: None,
            available: None,
        };
        assert!(matches!(req.validate().unwrap_err(), ApiError::BadRequest(_)));
    }

    #[test]
    fn update_treats_empty_name_as_absent() {
        let req = UpdateServiceRequest {
            name: Some("   ".into()),
            description: None,
            price: None,
            duration: None,
            available: None,
        };
        assert!(matches!(req.validate().unwrap_err(), ApiError::BadRequest(_)));

        let req = UpdateServiceRequest {
            name: Some("".into()),
            description: None,
            price: Some(25.0),
            duration: None,
            available: None,
        };
        let changes = req.validate().expect("price alone is a valid update");
        assert_eq!(changes.name, None);
        assert_eq!(changes.price, Some(25.0));
    }

    #[test]
    fn update_checks_ranges_on_present_fields() {
        let req = UpdateServiceRequest {
            name: None,
            description: None,
            price: Some(-0.01),
            duration: None,
            available: None,
        };
        assert!(req.validate().is_err());
    }
}
