use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Datelike;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::ChoiceError;
use crate::account::errors::EmailError;
use crate::account::errors::NtnError;
use crate::account::errors::PhoneError;
use crate::account::errors::RoleError;
use crate::account::errors::ValidationError;

/// Account aggregate: the shared identity plus exactly one role profile.
///
/// The role is not stored separately; it is the profile's discriminator, so an
/// account can never carry a profile of the other kind.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub mobile: PhoneNumber,
    pub password_hash: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn role(&self) -> Role {
        self.profile.role()
    }
}

/// Credential view of an account, as needed by login.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub account_id: AccountId,
    pub email: EmailAddress,
    pub role: Role,
    pub password_hash: String,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub id: AccountId,
    pub role: Role,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account kind, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendor,
    Buyer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Buyer => "buyer",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vendor" => Ok(Role::Vendor),
            "buyer" => Ok(Role::Buyer),
            _ => Err(RoleError(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email address type
///
/// Trimmed and lowercased, then validated with an RFC 5322 parser. Uniqueness
/// is therefore case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Phone number type, used for mobile and landline numbers.
///
/// Spaces and hyphens are dropped; what remains is an optional leading `+`
/// followed by 4-15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_DIGITS: usize = 4;
    const MAX_DIGITS: usize = 15;

    /// Create a new normalized phone number.
    ///
    /// # Errors
    /// * `InvalidCharacters` - Contains anything but digits after the optional `+`
    /// * `InvalidLength` - Fewer than 4 or more than 15 digits
    pub fn new(number: String) -> Result<Self, PhoneError> {
        let compact: String = number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        let (plus, digits) = match compact.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", compact.as_str()),
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacters);
        }

        if digits.len() < Self::MIN_DIGITS || digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                actual: digits.len(),
            });
        }

        Ok(Self(format!("{}{}", plus, digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// National tax number, unique among vendors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ntn(String);

impl Ntn {
    const MAX_LENGTH: usize = 32;

    /// Create a new validated NTN, uppercased.
    ///
    /// # Errors
    /// * `TooLong` - More than 32 characters
    /// * `InvalidCharacters` - Anything but ASCII letters, digits, and `-`
    pub fn new(ntn: String) -> Result<Self, NtnError> {
        let ntn = ntn.trim().to_ascii_uppercase();

        if ntn.len() > Self::MAX_LENGTH {
            return Err(NtnError::TooLong {
                max: Self::MAX_LENGTH,
                actual: ntn.len(),
            });
        }

        if ntn.is_empty() || !ntn.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(NtnError::InvalidCharacters);
        }

        Ok(Self(ntn))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Declares a closed set of choices stored by `code` and shown by `label`.
/// Parsing accepts either form, case-insensitively.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident, allowed = $allowed:literal {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| {
                        choice.code().eq_ignore_ascii_case(wanted)
                            || choice.label().eq_ignore_ascii_case(wanted)
                    })
                    .ok_or_else(|| ChoiceError {
                        value: wanted.to_string(),
                        allowed: $allowed,
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    pub enum BusinessCategory, allowed = "Retail, Wholesale, Manufacturing, Service" {
        Retail => ("retail", "Retail"),
        Wholesale => ("wholesale", "Wholesale"),
        Manufacturing => ("manufacturing", "Manufacturing"),
        Service => ("service", "Service"),
    }
}

choice_enum! {
    pub enum BusinessType,
        allowed = "Sole Proprietorship, Partnership, Corporation, Limited Liability Company" {
        SoleProprietorship => ("sole_proprietorship", "Sole Proprietorship"),
        Partnership => ("partnership", "Partnership"),
        Corporation => ("corporation", "Corporation"),
        Llc => ("llc", "Limited Liability Company"),
    }
}

choice_enum! {
    pub enum Designation, allowed = "Chief Executive Officer, Manager, Owner, Director" {
        Ceo => ("ceo", "Chief Executive Officer"),
        Manager => ("manager", "Manager"),
        Owner => ("owner", "Owner"),
        Director => ("director", "Director"),
    }
}

choice_enum! {
    pub enum Gender, allowed = "Male, Female, Other" {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
        Other => ("other", "Other"),
    }
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {} is outside [-90, 90]", latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {} is outside [-180, 180]", longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Role-specific attribute set, one per account.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Vendor(VendorProfile),
    Buyer(BuyerProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Vendor(_) => Role::Vendor,
            Profile::Buyer(_) => Role::Buyer,
        }
    }

    /// The vendor's NTN, if this is a vendor profile that declares one.
    pub fn ntn(&self) -> Option<&Ntn> {
        match self {
            Profile::Vendor(vendor) => vendor.ntn.as_ref(),
            Profile::Buyer(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorProfile {
    pub business_name: String,
    pub year_of_establishment: i32,
    pub business_category: BusinessCategory,
    pub business_type: BusinessType,
    pub address: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub ntn: Option<Ntn>,
    pub landline: Option<PhoneNumber>,
    pub website: Option<String>,
    pub gender: Gender,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuyerProfile {
    pub name: String,
    pub company_name: String,
    pub designation: Designation,
    pub address: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub website: Option<String>,
    pub gender: Gender,
    pub location: Option<GeoPoint>,
}

/// Plaintext password as received from a caller. Never printed.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Validated registration, ready to be hashed and persisted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: EmailAddress,
    pub mobile: PhoneNumber,
    pub password: Password,
    pub profile: Profile,
}

impl NewAccount {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Build the account record around a freshly computed hash.
    pub fn into_account(self, password_hash: String) -> Account {
        Account {
            id: AccountId::new(),
            email: self.email,
            mobile: self.mobile,
            password_hash,
            profile: self.profile,
            created_at: Utc::now(),
        }
    }
}

/// Raw vendor sign-up input.
///
/// Every field is optional at this level so that a missing field is reported
/// by name alongside every other offending field. Numeric fields are kept as
/// raw JSON so a wrongly typed value is reported the same way.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VendorRegistration {
    pub email: Option<String>,
    #[serde(alias = "mobile_number")]
    pub mobile: Option<String>,
    pub password: Option<Password>,
    pub business_name: Option<String>,
    #[serde(alias = "year_established")]
    pub year_of_establishment: Option<Value>,
    pub business_category: Option<String>,
    pub business_type: Option<String>,
    #[serde(alias = "business_address")]
    pub address: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub ntn: Option<String>,
    #[serde(alias = "landline_number")]
    pub landline: Option<String>,
    pub website: Option<String>,
    pub gender: Option<String>,
    #[serde(alias = "geo_lat")]
    pub latitude: Option<Value>,
    #[serde(alias = "geo_lng")]
    pub longitude: Option<Value>,
}

impl VendorRegistration {
    /// Validate every field, reporting all offending ones together.
    pub fn validate(self) -> Result<NewAccount, ValidationError> {
        let mut checks = FieldChecks::default();

        let email = checks.required("email", self.email, EmailAddress::new);
        let mobile = checks.required("mobile", self.mobile, PhoneNumber::new);
        let password = checks.password(self.password);
        let business_name = checks.text("business_name", self.business_name);
        let year_of_establishment = checks.year("year_of_establishment", self.year_of_establishment);
        let business_category = checks.required("business_category", self.business_category, |v| {
            v.parse::<BusinessCategory>()
        });
        let business_type = checks.required("business_type", self.business_type, |v| {
            v.parse::<BusinessType>()
        });
        let address = checks.text("address", self.address);
        let country = checks.text("country", self.country);
        let state = checks.text("state", self.state);
        let city = checks.text("city", self.city);
        let postal_code = checks.optional("postal_code", self.postal_code, bounded_text);
        let ntn = checks.optional("ntn", self.ntn, Ntn::new);
        let landline = checks.optional("landline", self.landline, PhoneNumber::new);
        let website = checks.optional("website", self.website, website);
        let gender = checks.required("gender", self.gender, |v| v.parse::<Gender>());
        let latitude = checks.number("latitude", self.latitude);
        let longitude = checks.number("longitude", self.longitude);
        let location = checks.location(latitude, longitude);

        let (
            Some(email),
            Some(mobile),
            Some(password),
            Some(business_name),
            Some(year_of_establishment),
            Some(business_category),
            Some(business_type),
            Some(address),
            Some(country),
            Some(state),
            Some(city),
            Some(postal_code),
            Some(ntn),
            Some(landline),
            Some(website),
            Some(gender),
            Some(location),
        ) = (
            email,
            mobile,
            password,
            business_name,
            year_of_establishment,
            business_category,
            business_type,
            address,
            country,
            state,
            city,
            postal_code,
            ntn,
            landline,
            website,
            gender,
            location,
        )
        else {
            return Err(checks.into_error());
        };

        Ok(NewAccount {
            email,
            mobile,
            password,
            profile: Profile::Vendor(VendorProfile {
                business_name,
                year_of_establishment,
                business_category,
                business_type,
                address,
                country,
                state,
                city,
                postal_code,
                ntn,
                landline,
                website,
                gender,
                location,
            }),
        })
    }
}

/// Raw buyer sign-up input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuyerRegistration {
    pub email: Option<String>,
    #[serde(alias = "mobile_number")]
    pub mobile: Option<String>,
    pub password: Option<Password>,
    #[serde(alias = "buyer_name")]
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub designation: Option<String>,
    #[serde(alias = "company_address")]
    pub address: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    pub gender: Option<String>,
    #[serde(alias = "geo_lat")]
    pub latitude: Option<Value>,
    #[serde(alias = "geo_lng")]
    pub longitude: Option<Value>,
}

impl BuyerRegistration {
    /// Validate every field, reporting all offending ones together.
    pub fn validate(self) -> Result<NewAccount, ValidationError> {
        let mut checks = FieldChecks::default();

        let email = checks.required("email", self.email, EmailAddress::new);
        let mobile = checks.required("mobile", self.mobile, PhoneNumber::new);
        let password = checks.password(self.password);
        let name = checks.text("name", self.name);
        let company_name = checks.text("company_name", self.company_name);
        let designation = checks.required("designation", self.designation, |v| {
            v.parse::<Designation>()
        });
        let address = checks.text("address", self.address);
        let country = checks.text("country", self.country);
        let state = checks.text("state", self.state);
        let city = checks.text("city", self.city);
        let website = checks.optional("website", self.website, website);
        let gender = checks.required("gender", self.gender, |v| v.parse::<Gender>());
        let latitude = checks.number("latitude", self.latitude);
        let longitude = checks.number("longitude", self.longitude);
        let location = checks.location(latitude, longitude);

        let (
            Some(email),
            Some(mobile),
            Some(password),
            Some(name),
            Some(company_name),
            Some(designation),
            Some(address),
            Some(country),
            Some(state),
            Some(city),
            Some(website),
            Some(gender),
            Some(location),
        ) = (
            email,
            mobile,
            password,
            name,
            company_name,
            designation,
            address,
            country,
            state,
            city,
            website,
            gender,
            location,
        )
        else {
            return Err(checks.into_error());
        };

        Ok(NewAccount {
            email,
            mobile,
            password,
            profile: Profile::Buyer(BuyerProfile {
                name,
                company_name,
                designation,
                address,
                country,
                state,
                city,
                website,
                gender,
                location,
            }),
        })
    }
}

/// Field that can be probed for prior registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceField {
    Email,
    Mobile,
    Ntn,
}

impl FromStr for ExistenceField {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(ExistenceField::Email),
            "mobile" | "mobile_number" => Ok(ExistenceField::Mobile),
            "ntn" => Ok(ExistenceField::Ntn),
            _ => Err(ChoiceError {
                value: s.to_string(),
                allowed: "email, mobile, ntn",
            }),
        }
    }
}

/// Normalized existence probe. `scope` narrows email/mobile lookups to one
/// role; NTN lookups are always vendor-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceQuery {
    pub field: ExistenceField,
    pub value: String,
    pub scope: Option<Role>,
}

impl ExistenceQuery {
    /// Normalize `value` the way it would be stored.
    ///
    /// Returns `None` when the value could never have been stored, which
    /// callers treat as "does not exist".
    pub fn new(field: ExistenceField, value: &str, scope: Option<Role>) -> Option<Self> {
        let value = match field {
            ExistenceField::Email => EmailAddress::new(value.to_string()).ok()?.0,
            ExistenceField::Mobile => PhoneNumber::new(value.to_string()).ok()?.0,
            ExistenceField::Ntn => Ntn::new(value.to_string()).ok()?.0,
        };
        Some(Self {
            field,
            value,
            scope,
        })
    }

    pub fn email(email: &EmailAddress) -> Self {
        Self {
            field: ExistenceField::Email,
            value: email.as_str().to_string(),
            scope: None,
        }
    }

    pub fn mobile(mobile: &PhoneNumber) -> Self {
        Self {
            field: ExistenceField::Mobile,
            value: mobile.as_str().to_string(),
            scope: None,
        }
    }

    pub fn ntn(ntn: &Ntn) -> Self {
        Self {
            field: ExistenceField::Ntn,
            value: ntn.as_str().to_string(),
            scope: Some(Role::Vendor),
        }
    }
}

const MAX_TEXT_LENGTH: usize = 255;
const MAX_PASSWORD_BYTES: usize = 128;
const EARLIEST_ESTABLISHMENT_YEAR: i32 = 1800;

fn bounded_text(value: String) -> Result<String, String> {
    let length = value.chars().count();
    if length > MAX_TEXT_LENGTH {
        Err(format!(
            "must be at most {} characters, got {}",
            MAX_TEXT_LENGTH, length
        ))
    } else {
        Ok(value)
    }
}

fn website(value: String) -> Result<String, String> {
    if value.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace".to_string());
    }
    bounded_text(value)
}

/// Collects every field failure of one registration.
///
/// Each check returns `None` exactly when it records an error.
#[derive(Default)]
struct FieldChecks {
    error: ValidationError,
}

impl FieldChecks {
    fn required<T, E: fmt::Display>(
        &mut self,
        field: &'static str,
        raw: Option<String>,
        parse: impl FnOnce(String) -> Result<T, E>,
    ) -> Option<T> {
        let Some(raw) = non_blank(raw) else {
            self.error.push(field, "is required");
            return None;
        };
        parse(raw).map_err(|e| self.error.push(field, e)).ok()
    }

    fn optional<T, E: fmt::Display>(
        &mut self,
        field: &'static str,
        raw: Option<String>,
        parse: impl FnOnce(String) -> Result<T, E>,
    ) -> Option<Option<T>> {
        match non_blank(raw) {
            None => Some(None),
            Some(raw) => parse(raw).map(Some).map_err(|e| self.error.push(field, e)).ok(),
        }
    }

    fn text(&mut self, field: &'static str, raw: Option<String>) -> Option<String> {
        self.required(field, raw, bounded_text)
    }

    fn password(&mut self, raw: Option<Password>) -> Option<Password> {
        match raw {
            None => {
                self.error.push("password", "is required");
                None
            }
            Some(password) if password.expose().is_empty() => {
                self.error.push("password", "is required");
                None
            }
            Some(password) if password.expose().len() > MAX_PASSWORD_BYTES => {
                self.error.push(
                    "password",
                    format!("must be at most {} bytes", MAX_PASSWORD_BYTES),
                );
                None
            }
            Some(password) => Some(password),
        }
    }

    fn year(&mut self, field: &'static str, raw: Option<Value>) -> Option<i32> {
        let current_year = Utc::now().year();
        let year = match raw {
            None | Some(Value::Null) => {
                self.error.push(field, "is required");
                return None;
            }
            Some(Value::Number(number)) => match number.as_i64() {
                Some(year) => year,
                None => {
                    self.error.push(field, "must be a whole number");
                    return None;
                }
            },
            Some(_) => {
                self.error.push(field, "must be a number");
                return None;
            }
        };

        match i32::try_from(year) {
            Ok(year) if (EARLIEST_ESTABLISHMENT_YEAR..=current_year).contains(&year) => Some(year),
            _ => {
                self.error.push(
                    field,
                    format!(
                        "{} is outside {}..={}",
                        year, EARLIEST_ESTABLISHMENT_YEAR, current_year
                    ),
                );
                None
            }
        }
    }

    fn number(&mut self, field: &'static str, raw: Option<Value>) -> Option<Option<f64>> {
        match raw {
            None | Some(Value::Null) => Some(None),
            Some(Value::Number(number)) => Some(number.as_f64()),
            Some(_) => {
                self.error.push(field, "must be a number");
                None
            }
        }
    }

    /// A coordinate that failed its own check leaves the pair undecided.
    fn location(
        &mut self,
        latitude: Option<Option<f64>>,
        longitude: Option<Option<f64>>,
    ) -> Option<Option<GeoPoint>> {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return None;
        };
        match (latitude, longitude) {
            (None, None) => Some(None),
            (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude)
                .map(Some)
                .map_err(|e| self.error.push("location", e))
                .ok(),
            _ => {
                self.error
                    .push("location", "latitude and longitude must be given together");
                None
            }
        }
    }

    fn into_error(self) -> ValidationError {
        self.error
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn vendor_input() -> VendorRegistration {
        VendorRegistration {
            email: Some("V@X.com ".to_string()),
            mobile: Some("+1000".to_string()),
            password: Some(Password::new("p1")),
            business_name: Some("Acme Traders".to_string()),
            year_of_establishment: Some(json!(2001)),
            business_category: Some("Retail".to_string()),
            business_type: Some("llc".to_string()),
            address: Some("1 Main St".to_string()),
            country: Some("Pakistan".to_string()),
            state: Some("Punjab".to_string()),
            city: Some("Lahore".to_string()),
            postal_code: Some("  ".to_string()),
            ntn: Some("ntn1".to_string()),
            landline: None,
            website: Some("https://acme.example".to_string()),
            gender: Some("female".to_string()),
            latitude: Some(json!(31.5)),
            longitude: Some(json!(74.3)),
        }
    }

    fn buyer_input() -> BuyerRegistration {
        BuyerRegistration {
            email: Some("b@x.com".to_string()),
            mobile: Some("+2000".to_string()),
            password: Some(Password::new("p2")),
            name: Some("Sara".to_string()),
            company_name: Some("Buyco".to_string()),
            designation: Some("CEO".to_string()),
            address: Some("2 Side St".to_string()),
            country: Some("Pakistan".to_string()),
            state: Some("Sindh".to_string()),
            city: Some("Karachi".to_string()),
            website: None,
            gender: Some("Other".to_string()),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_vendor_registration_normalizes_fields() {
        let account = vendor_input().validate().expect("valid vendor input");

        assert_eq!(account.email.as_str(), "v@x.com");
        assert_eq!(account.mobile.as_str(), "+1000");
        assert_eq!(account.role(), Role::Vendor);

        let Profile::Vendor(profile) = account.profile else {
            panic!("expected vendor profile");
        };
        assert_eq!(profile.business_type, BusinessType::Llc);
        assert_eq!(profile.business_category, BusinessCategory::Retail);
        assert_eq!(profile.ntn.as_ref().map(Ntn::as_str), Some("NTN1"));
        assert_eq!(profile.postal_code, None);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(
            profile.location,
            Some(GeoPoint {
                latitude: 31.5,
                longitude: 74.3
            })
        );
    }

    #[test]
    fn test_buyer_registration_accepts_labels_and_codes() {
        let account = buyer_input().validate().expect("valid buyer input");

        assert_eq!(account.role(), Role::Buyer);
        let Profile::Buyer(profile) = account.profile else {
            panic!("expected buyer profile");
        };
        assert_eq!(profile.designation, Designation::Ceo);
        assert_eq!(profile.gender, Gender::Other);
        assert_eq!(profile.location, None);
    }

    #[test]
    fn test_registration_reports_every_offending_field() {
        let input = VendorRegistration {
            email: Some("not-an-email".to_string()),
            mobile: None,
            year_of_establishment: Some(json!(1700)),
            business_category: Some("Farming".to_string()),
            gender: Some("female".to_string()),
            latitude: Some(json!(12.0)),
            longitude: None,
            ..vendor_input()
        };

        let error = input.validate().expect_err("input must be rejected");

        assert_eq!(
            error.field_names(),
            vec![
                "email",
                "mobile",
                "year_of_establishment",
                "business_category",
                "location"
            ]
        );
    }

    #[test]
    fn test_wrongly_typed_numbers_are_reported_with_other_fields() {
        let input: VendorRegistration = serde_json::from_value(json!({
            "email": "not-an-email",
            "mobile": "+1000",
            "password": "p1",
            "business_name": "Acme",
            "year_of_establishment": "2001",
            "business_category": "Retail",
            "business_type": "llc",
            "address": "1 Main St",
            "country": "PK",
            "state": "Punjab",
            "city": "Lahore",
            "gender": "Male",
            "latitude": "31.5",
            "longitude": 74.3
        }))
        .expect("wrongly typed numbers still deserialize");

        let error = input.validate().expect_err("input must be rejected");

        assert_eq!(
            error.field_names(),
            vec!["email", "year_of_establishment", "latitude"]
        );
        assert_eq!(error.fields[1].message, "must be a number");
    }

    #[test]
    fn test_year_must_be_whole_and_null_coordinates_are_absent() {
        let input = VendorRegistration {
            year_of_establishment: Some(json!(2001.5)),
            latitude: Some(Value::Null),
            longitude: None,
            ..vendor_input()
        };

        let error = input.validate().expect_err("fractional year must be rejected");
        assert_eq!(error.field_names(), vec!["year_of_establishment"]);
        assert_eq!(error.fields[0].message, "must be a whole number");
    }

    #[test]
    fn test_registration_requires_password() {
        let input = BuyerRegistration {
            password: Some(Password::new("")),
            ..buyer_input()
        };

        let error = input.validate().expect_err("empty password must be rejected");
        assert_eq!(error.field_names(), vec!["password"]);
    }

    #[test]
    fn test_empty_registration_names_required_fields() {
        let error = BuyerRegistration::default()
            .validate()
            .expect_err("empty input must be rejected");

        assert_eq!(
            error.field_names(),
            vec![
                "email",
                "mobile",
                "password",
                "name",
                "company_name",
                "designation",
                "address",
                "country",
                "state",
                "city",
                "gender"
            ]
        );
    }

    #[test]
    fn test_registration_deserializes_legacy_field_names() {
        let input: VendorRegistration = serde_json::from_value(serde_json::json!({
            "email": "v@x.com",
            "mobile_number": "+1000",
            "password": "p1",
            "business_name": "Acme",
            "year_established": 1999,
            "business_category": "Service",
            "business_type": "Partnership",
            "business_address": "1 Main St",
            "country": "PK",
            "state": "Punjab",
            "city": "Lahore",
            "gender": "Male",
            "geo_lat": 1.0,
            "geo_lng": 2.0
        }))
        .expect("deserializes");

        assert_eq!(input.mobile.as_deref(), Some("+1000"));
        assert_eq!(input.year_of_establishment, Some(json!(1999)));
        assert_eq!(input.address.as_deref(), Some("1 Main St"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_phone_number_rules() {
        assert_eq!(
            PhoneNumber::new("+92 300-1234567".to_string()).map(|p| p.0),
            Ok("+923001234567".to_string())
        );
        assert_eq!(
            PhoneNumber::new("12ab".to_string()),
            Err(PhoneError::InvalidCharacters)
        );
        assert!(matches!(
            PhoneNumber::new("+12".to_string()),
            Err(PhoneError::InvalidLength { actual: 2, .. })
        ));
    }

    #[test]
    fn test_ntn_rules() {
        assert_eq!(Ntn::new(" ab-12 ".to_string()).map(|n| n.0), Ok("AB-12".to_string()));
        assert_eq!(
            Ntn::new("ab 12".to_string()),
            Err(NtnError::InvalidCharacters)
        );
        assert!(matches!(
            Ntn::new("x".repeat(33)),
            Err(NtnError::TooLong { actual: 33, .. })
        ));
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(
            "Limited Liability Company".parse::<BusinessType>(),
            Ok(BusinessType::Llc)
        );
        assert_eq!(
            "sole_proprietorship".parse::<BusinessType>(),
            Ok(BusinessType::SoleProprietorship)
        );
        assert_eq!(
            "chief executive officer".parse::<Designation>(),
            Ok(Designation::Ceo)
        );

        let error = "Alien".parse::<Gender>().expect_err("unknown gender");
        assert_eq!(error.to_string(), "'Alien' is not one of: Male, Female, Other");
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("Vendor".parse::<Role>(), Ok(Role::Vendor));
        assert_eq!(Role::Buyer.to_string(), "buyer");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_existence_query_normalizes_value() {
        let query = ExistenceQuery::new(ExistenceField::Email, " V@X.com", None)
            .expect("valid email");
        assert_eq!(query.value, "v@x.com");

        assert_eq!(
            ExistenceQuery::new(ExistenceField::Mobile, "nope", Some(Role::Buyer)),
            None
        );
        assert_eq!(
            "mobile_number".parse::<ExistenceField>(),
            Ok(ExistenceField::Mobile)
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let account = vendor_input().validate().expect("valid vendor input");
        let rendered = format!("{:?}", account);

        assert!(rendered.contains("Password(***)"));
        assert!(!rendered.contains("\"p1\""));
    }
}
