use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::ConflictError;
use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::BuyerProfile;
use crate::account::models::EmailAddress;
use crate::account::models::ExistenceField;
use crate::account::models::ExistenceQuery;
use crate::account::models::GeoPoint;
use crate::account::models::Ntn;
use crate::account::models::PhoneNumber;
use crate::account::models::Profile;
use crate::account::models::Role;
use crate::account::models::StoredCredentials;
use crate::account::models::VendorProfile;
use crate::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, mobile, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(account.mobile.as_str())
        .bind(&account.password_hash)
        .bind(account.role().as_str())
        .bind(account.created_at)
        .execute(&mut *tx)
        .await
        .map_err(constraint_error)?;

        match &account.profile {
            Profile::Vendor(vendor) => {
                sqlx::query(
                    r#"
                    INSERT INTO vendor_profiles (
                        account_id, business_name, year_of_establishment, business_category,
                        business_type, address, country, state, city, postal_code, ntn,
                        landline, website, gender, latitude, longitude
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                    "#,
                )
                .bind(account.id.0)
                .bind(&vendor.business_name)
                .bind(vendor.year_of_establishment)
                .bind(vendor.business_category.code())
                .bind(vendor.business_type.code())
                .bind(&vendor.address)
                .bind(&vendor.country)
                .bind(&vendor.state)
                .bind(&vendor.city)
                .bind(vendor.postal_code.as_deref())
                .bind(vendor.ntn.as_ref().map(Ntn::as_str))
                .bind(vendor.landline.as_ref().map(PhoneNumber::as_str))
                .bind(vendor.website.as_deref())
                .bind(vendor.gender.code())
                .bind(vendor.location.map(|l| l.latitude))
                .bind(vendor.location.map(|l| l.longitude))
                .execute(&mut *tx)
                .await
                .map_err(constraint_error)?;
            }
            Profile::Buyer(buyer) => {
                sqlx::query(
                    r#"
                    INSERT INTO buyer_profiles (
                        account_id, name, company_name, designation, address, country,
                        state, city, website, gender, latitude, longitude
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(account.id.0)
                .bind(&buyer.name)
                .bind(&buyer.company_name)
                .bind(buyer.designation.code())
                .bind(&buyer.address)
                .bind(&buyer.country)
                .bind(&buyer.state)
                .bind(&buyer.city)
                .bind(buyer.website.as_deref())
                .bind(buyer.gender.code())
                .bind(buyer.location.map(|l| l.latitude))
                .bind(buyer.location.map(|l| l.longitude))
                .execute(&mut *tx)
                .await
                .map_err(constraint_error)?;
            }
        }

        tx.commit().await.map_err(constraint_error)?;

        Ok(account)
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, mobile, password_hash, role, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(|r| -> Result<StoredCredentials, RepositoryError> {
            Ok(StoredCredentials {
                account_id: AccountId(r.id),
                email: EmailAddress::new(r.email).map_err(corrupt_row)?,
                role: Role::from_str(&r.role).map_err(corrupt_row)?,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, mobile, password_hash, role, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let profile = match Role::from_str(&row.role).map_err(corrupt_row)? {
            Role::Vendor => sqlx::query_as::<_, VendorProfileRow>(
                r#"
                SELECT business_name, year_of_establishment, business_category, business_type,
                       address, country, state, city, postal_code, ntn, landline, website,
                       gender, latitude, longitude
                FROM vendor_profiles
                WHERE account_id = $1
                "#,
            )
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(VendorProfileRow::into_profile)
            .transpose()?,
            Role::Buyer => sqlx::query_as::<_, BuyerProfileRow>(
                r#"
                SELECT name, company_name, designation, address, country, state, city,
                       website, gender, latitude, longitude
                FROM buyer_profiles
                WHERE account_id = $1
                "#,
            )
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(BuyerProfileRow::into_profile)
            .transpose()?,
        };

        let profile = profile.ok_or_else(|| {
            RepositoryError::Database(format!("Account {} has no profile", row.id))
        })?;

        Ok(Some(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email).map_err(corrupt_row)?,
            mobile: PhoneNumber::new(row.mobile).map_err(corrupt_row)?,
            password_hash: row.password_hash,
            profile,
            created_at: row.created_at,
        }))
    }

    async fn exists(&self, query: &ExistenceQuery) -> Result<bool, RepositoryError> {
        let scope = query.scope.map(|role| role.as_str());

        let sql = match query.field {
            ExistenceField::Email => {
                "SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1 AND ($2::text IS NULL OR role = $2))"
            }
            ExistenceField::Mobile => {
                "SELECT EXISTS (SELECT 1 FROM accounts WHERE mobile = $1 AND ($2::text IS NULL OR role = $2))"
            }
            // NTNs only live on vendor profiles, whatever the scope
            ExistenceField::Ntn => {
                "SELECT EXISTS (SELECT 1 FROM vendor_profiles WHERE ntn = $1 AND $2::text IS DISTINCT FROM 'buyer')"
            }
        };

        sqlx::query_scalar::<_, bool>(sql)
            .bind(&query.value)
            .bind(scope)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    mobile: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct VendorProfileRow {
    business_name: String,
    year_of_establishment: i32,
    business_category: String,
    business_type: String,
    address: String,
    country: String,
    state: String,
    city: String,
    postal_code: Option<String>,
    ntn: Option<String>,
    landline: Option<String>,
    website: Option<String>,
    gender: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl VendorProfileRow {
    fn into_profile(self) -> Result<Profile, RepositoryError> {
        Ok(Profile::Vendor(VendorProfile {
            business_name: self.business_name,
            year_of_establishment: self.year_of_establishment,
            business_category: self.business_category.parse().map_err(corrupt_row)?,
            business_type: self.business_type.parse().map_err(corrupt_row)?,
            address: self.address,
            country: self.country,
            state: self.state,
            city: self.city,
            postal_code: self.postal_code,
            ntn: self.ntn.map(Ntn::new).transpose().map_err(corrupt_row)?,
            landline: self.landline.map(PhoneNumber::new).transpose().map_err(corrupt_row)?,
            website: self.website,
            gender: self.gender.parse().map_err(corrupt_row)?,
            location: geo_point(self.latitude, self.longitude)?,
        }))
    }
}

#[derive(FromRow)]
struct BuyerProfileRow {
    name: String,
    company_name: String,
    designation: String,
    address: String,
    country: String,
    state: String,
    city: String,
    website: Option<String>,
    gender: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl BuyerProfileRow {
    fn into_profile(self) -> Result<Profile, RepositoryError> {
        Ok(Profile::Buyer(BuyerProfile {
            name: self.name,
            company_name: self.company_name,
            designation: self.designation.parse().map_err(corrupt_row)?,
            address: self.address,
            country: self.country,
            state: self.state,
            city: self.city,
            website: self.website,
            gender: self.gender.parse().map_err(corrupt_row)?,
            location: geo_point(self.latitude, self.longitude)?,
        }))
    }
}

fn geo_point(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<GeoPoint>, RepositoryError> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude)
            .map(Some)
            .map_err(corrupt_row),
        _ => Ok(None),
    }
}

fn corrupt_row(e: impl ToString) -> RepositoryError {
    RepositoryError::Database(format!("Stored row failed validation: {}", e.to_string()))
}

fn database_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
        other => RepositoryError::Database(other.to_string()),
    }
}

/// Translate a unique violation into the conflict it names.
fn constraint_error(e: sqlx::Error) -> RepositoryError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("accounts_email_key") => return RepositoryError::Conflict(ConflictError::email()),
                Some("accounts_mobile_key") => return RepositoryError::Conflict(ConflictError::mobile()),
                Some("vendor_profiles_ntn_key") => return RepositoryError::Conflict(ConflictError::ntn()),
                _ => {}
            }
        }
    }
    database_error(e)
}
