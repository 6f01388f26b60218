//! Password reset: request a single-use 6-digit code, then consume it.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::ApiError;
use crate::domains::auth::password;
use crate::kernel::store::{columns, decode_first, eq, Store};

/// Codes expire one hour after issuance.
const CODE_TTL_MINUTES: i64 = 60;

#[derive(Deserialize)]
struct ResetLookup {
    id: String,
    #[serde(default)]
    reset_code: Option<String>,
    #[serde(default)]
    reset_code_expires: Option<DateTime<Utc>>,
}

/// Issue a reset code for the account, if one exists. Returns `None` for
/// unknown emails — the HTTP surface answers with the same generic message
/// either way so accounts cannot be enumerated.
pub async fn request_reset(store: &dyn Store, email: &str) -> Result<Option<String>, ApiError> {
    let user: Option<ResetLookup> = decode_first(
        store
            .select("users", &[columns("id"), eq("email", email)])
            .await?,
    )?;

    let Some(user) = user else {
        return Ok(None);
    };

    let code = rand::rng().random_range(100_000..=999_999).to_string();
    let expires = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

    store
        .update(
            "users",
            json!({
                "reset_code": code,
                "reset_code_expires": expires.to_rfc3339(),
            }),
            &[eq("id", &user.id)],
        )
        .await?;

    Ok(Some(code))
}

/// Consume a reset code and set a new password. Wrong email, wrong code,
/// and expired code all produce the same error, and a consumed code can
/// never authorize a second change: the single update that writes the new
/// password also clears the code and its expiry.
pub async fn consume_reset(
    store: &dyn Store,
    email: &str,
    code: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    let user: ResetLookup = decode_first(
        store
            .select(
                "users",
                &[
                    columns("id,reset_code,reset_code_expires"),
                    eq("email", email),
                ],
            )
            .await?,
    )?
    .ok_or(ApiError::InvalidResetCode)?;

    if user.reset_code.as_deref() != Some(code) {
        return Err(ApiError::InvalidResetCode);
    }

    match user.reset_code_expires {
        Some(expires) if expires >= Utc::now() => {}
        _ => return Err(ApiError::InvalidResetCode),
    }

    let password_hash = password::hash(new_password)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

    store
        .update(
            "users",
            json!({
                "password_hash": password_hash,
                "reset_code": Value::Null,
                "reset_code_expires": Value::Null,
            }),
            &[eq("id", &user.id)],
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MemoryStore;

    fn seed_user(store: &MemoryStore) {
        store.seed(
            "users",
            vec![json!({
                "id": "user-1",
                "email": "a@b.com",
                "full_name": "A B",
                "password_hash": password::hash("oldpassword1").unwrap(),
            })],
        );
    }

    #[tokio::test]
    async fn unknown_email_issues_nothing() {
        let store = MemoryStore::new();
        let code = request_reset(store.as_ref(), "ghost@b.com").await.unwrap();
        assert!(code.is_none());
    }

    #[tokio::test]
    async fn issued_code_is_six_digits_with_expiry() {
        let store = MemoryStore::new();
        seed_user(&store);

        let code = request_reset(store.as_ref(), "a@b.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let rows = store.rows("users");
        assert_eq!(rows[0]["reset_code"], json!(code));
        assert!(rows[0]["reset_code_expires"].is_string());
    }

    #[tokio::test]
    async fn code_is_consumable_exactly_once() {
        let store = MemoryStore::new();
        seed_user(&store);

        let code = request_reset(store.as_ref(), "a@b.com")
            .await
            .unwrap()
            .unwrap();

        consume_reset(store.as_ref(), "a@b.com", &code, "newpassword1")
            .await
            .unwrap();

        // new password in effect, code cleared
        let rows = store.rows("users");
        let digest = rows[0]["password_hash"].as_str().unwrap();
        assert!(password::verify("newpassword1", digest));
        assert_eq!(rows[0]["reset_code"], Value::Null);

        // replay is rejected
        let err = consume_reset(store.as_ref(), "a@b.com", &code, "anotherpass1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResetCode));
    }

    #[tokio::test]
    async fn wrong_code_is_rejected() {
        let store = MemoryStore::new();
        seed_user(&store);

        request_reset(store.as_ref(), "a@b.com").await.unwrap();

        let err = consume_reset(store.as_ref(), "a@b.com", "000000", "newpassword1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResetCode));
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let store = MemoryStore::new();
        store.seed(
            "users",
            vec![json!({
                "id": "user-1",
                "email": "a@b.com",
                "full_name": "A B",
                "reset_code": "123456",
                "reset_code_expires": (Utc::now() - Duration::minutes(5)).to_rfc3339(),
            })],
        );

        let err = consume_reset(store.as_ref(), "a@b.com", "123456", "newpassword1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResetCode));
    }
}
