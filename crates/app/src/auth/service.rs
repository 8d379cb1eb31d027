//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, NewApiToken,
        Principal, format_api_token, generate_api_token_secret, hash_api_token, parse_api_token,
        repository::PgAuthRepository,
    },
    domain::customers::records::CustomerUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given customer.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidReference`] for an unknown customer,
    /// or a storage error.
    pub async fn issue_api_token(
        &self,
        customer: CustomerUuid,
        is_admin: bool,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                customer_uuid: customer,
                is_admin,
                token_hash: hash_api_token(&token_uuid, version, customer, &secret),
            })
            .await?;

        info!(token_uuid = %token_uuid, customer_uuid = %customer, is_admin, "issued api token");

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens(customer).await?)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_api_token(token_uuid)
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token(parsed.token_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let presented = hash_api_token(
            &parsed.token_uuid,
            parsed.version,
            token.customer_uuid,
            &parsed.secret,
        );

        if presented != token.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        Ok(Principal {
            customer: token.customer_uuid,
            is_admin: token.is_admin,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_as_its_customer() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Rita").await;

        let issued = ctx.auth.issue_api_token(customer, true).await?;
        let principal = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(
            principal,
            Principal {
                customer,
                is_admin: true
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Sara").await;

        let issued = ctx.auth.issue_api_token(customer, false).await?;

        assert!(ctx.auth.revoke_api_token(issued.metadata.uuid).await?);
        assert!(!ctx.auth.revoke_api_token(issued.metadata.uuid).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Tiago").await;

        let issued = ctx.auth.issue_api_token(customer, false).await?;

        let (id, _) = issued.token.split_once('.').ok_or("token has no secret")?;
        let forged = format!("{id}.{}", "0".repeat(64));

        let result = ctx.auth.authenticate_bearer(&forged).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn token_for_unknown_customer_is_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.issue_api_token(CustomerUuid::new(), false).await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }
}
