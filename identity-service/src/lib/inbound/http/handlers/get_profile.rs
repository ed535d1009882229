use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Account;
use crate::account::models::GeoPoint;
use crate::account::models::Profile;
use crate::account::models::Role;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

/// Read back the caller's own account and profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    state
        .account_service
        .get_account(&authenticated.session.account_id)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResponseData {
    pub id: String,
    pub email: String,
    pub mobile: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub profile: ProfileData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileData {
    Vendor {
        business_name: String,
        year_of_establishment: i32,
        business_category: &'static str,
        business_type: &'static str,
        address: String,
        country: String,
        state: String,
        city: String,
        postal_code: Option<String>,
        ntn: Option<String>,
        landline: Option<String>,
        website: Option<String>,
        gender: &'static str,
        location: Option<LocationData>,
    },
    Buyer {
        name: String,
        company_name: String,
        designation: &'static str,
        address: String,
        country: String,
        state: String,
        city: String,
        website: Option<String>,
        gender: &'static str,
        location: Option<LocationData>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for LocationData {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl From<&Account> for ProfileResponseData {
    fn from(account: &Account) -> Self {
        let profile = match &account.profile {
            Profile::Vendor(vendor) => ProfileData::Vendor {
                business_name: vendor.business_name.clone(),
                year_of_establishment: vendor.year_of_establishment,
                business_category: vendor.business_category.code(),
                business_type: vendor.business_type.code(),
                address: vendor.address.clone(),
                country: vendor.country.clone(),
                state: vendor.state.clone(),
                city: vendor.city.clone(),
                postal_code: vendor.postal_code.clone(),
                ntn: vendor.ntn.as_ref().map(|ntn| ntn.as_str().to_string()),
                landline: vendor.landline.as_ref().map(|phone| phone.as_str().to_string()),
                website: vendor.website.clone(),
                gender: vendor.gender.code(),
                location: vendor.location.map(LocationData::from),
            },
            Profile::Buyer(buyer) => ProfileData::Buyer {
                name: buyer.name.clone(),
                company_name: buyer.company_name.clone(),
                designation: buyer.designation.code(),
                address: buyer.address.clone(),
                country: buyer.country.clone(),
                state: buyer.state.clone(),
                city: buyer.city.clone(),
                website: buyer.website.clone(),
                gender: buyer.gender.code(),
                location: buyer.location.map(LocationData::from),
            },
        };

        Self {
            id: account.id.to_string(),
            email: account.email.as_str().to_string(),
            mobile: account.mobile.as_str().to_string(),
            role: account.role(),
            created_at: account.created_at,
            profile,
        }
    }
}
