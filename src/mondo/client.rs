use super::auth::{Credentials, Token, TokenManager};
use super::pager::{TransactionPager, TransactionQuery};
use super::transport::{ApiRequest, ReqwestTransport, Transport};
use crate::config::{ClientConfig, Config};
use crate::error::{MondoError, Result};
use crate::models::{Account, Balance, FeedItem, Identity, Transaction, Webhook};
use oauth2::AccessToken;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// An authenticated session against the Mondo API.
///
/// Every operation obtains its bearer token through [`TokenManager::ensure_valid`]
/// while holding the session's token lock, so concurrent callers share a
/// single refresh.
pub struct MondoClient<T = ReqwestTransport> {
    transport: Arc<T>,
    auth: TokenManager<T>,
    credentials: Credentials,
    token: Mutex<Token>,
}

impl MondoClient<ReqwestTransport> {
    pub async fn connect(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Self::new(credentials, transport).await
    }

    /// Connect using credentials and base URL from the credential store.
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::connect(config.credentials(), &config.client_config()?).await
    }
}

impl<T: Transport> MondoClient<T> {
    /// Authenticate with the password grant. A failure here is final: no
    /// session is returned.
    #[instrument(name = "Connecting to Mondo", skip_all)]
    pub async fn new(credentials: Credentials, transport: T) -> Result<Self> {
        let transport = Arc::new(transport);
        let auth = TokenManager::new(transport.clone());
        let token = auth.authenticate(&credentials).await?;

        Ok(Self {
            transport,
            auth,
            credentials,
            token: Mutex::new(token),
        })
    }

    /// Snapshot of the session's current token.
    pub async fn current_token(&self) -> Token {
        self.token.lock().await.clone()
    }

    /// Force a refresh-token grant regardless of expiry.
    pub async fn refresh(&self) -> Result<()> {
        let mut current = self.token.lock().await;
        let token = self.auth.refresh(&current, &self.credentials).await?;
        *current = token;
        Ok(())
    }

    async fn access_token(&self) -> Result<AccessToken> {
        let mut current = self.token.lock().await;
        // On failure the stale token stays in place for the caller to retry.
        let token = self.auth.ensure_valid(&current, &self.credentials).await?;
        *current = token;
        Ok(current.access_token().clone())
    }

    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let request = request.bearer(self.access_token().await?);
        let response = self.transport.send(request).await?;

        if !response.is_ok() {
            debug!(status = response.status, "Request rejected");
            return Err(MondoError::api(response.status));
        }

        Ok(response.json()?)
    }

    async fn fetch_body<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let body = self.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn fetch_field<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        field: &'static str,
    ) -> Result<R> {
        let mut body = self.send(request).await?;
        let value = body
            .get_mut(field)
            .map(Value::take)
            .ok_or(MondoError::MissingField(field))?;
        Ok(serde_json::from_value(value)?)
    }

    async fn resolve_account(&self, account_id: Option<&str>) -> Result<String> {
        match account_id {
            Some(id) => Ok(id.to_string()),
            None => self.get_primary_account_id().await,
        }
    }

    #[instrument(name = "Who am I", skip_all)]
    pub async fn whoami(&self) -> Result<Identity> {
        self.fetch_body(ApiRequest::get("/ping/whoami")).await
    }

    #[instrument(name = "Fetching accounts", skip_all)]
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.fetch_field(ApiRequest::get("/accounts"), "accounts").await
    }

    /// Id of the first account, in the order the API lists them.
    pub async fn get_primary_account_id(&self) -> Result<String> {
        self.list_accounts()
            .await?
            .into_iter()
            .next()
            .map(|account| account.id)
            .ok_or(MondoError::NoAccounts)
    }

    #[instrument(name = "Fetching balance", skip_all)]
    pub async fn get_balance(&self, account_id: Option<&str>) -> Result<Balance> {
        let account_id = self.resolve_account(account_id).await?;
        self.fetch_body(ApiRequest::get("/balance").query("account_id", account_id))
            .await
    }

    /// One page of transactions. `since` and `before` are sent as given.
    #[instrument(name = "Fetching transactions", skip_all, fields(since = ?query.since))]
    pub async fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let account_id = self.resolve_account(query.account_id.as_deref()).await?;

        let mut request = ApiRequest::get("/transactions")
            .query("account_id", account_id)
            .query("limit", query.limit.to_string());
        if let Some(since) = &query.since {
            request = request.query("since", since);
        }
        if let Some(before) = &query.before {
            request = request.query("before", before);
        }
        if query.expand_merchant {
            request = request.query("expand[]", "merchant");
        }

        self.fetch_field(request, "transactions").await
    }

    #[instrument(name = "Fetching transaction", skip_all, fields(transaction_id = %transaction_id))]
    pub async fn get_transaction(
        &self,
        transaction_id: &str,
        expand_merchant: bool,
    ) -> Result<Transaction> {
        let mut request = ApiRequest::get(format!("/transactions/{}", transaction_id));
        if expand_merchant {
            request = request.query("expand[]", "merchant");
        }

        self.fetch_field(request, "transaction").await
    }

    /// Lazily iterate every transaction matching `query`, page by page.
    pub fn transactions(&self, query: TransactionQuery) -> Result<TransactionPager<'_, T>> {
        TransactionPager::new(self, query)
    }

    #[instrument(name = "Creating feed item", skip_all)]
    pub async fn create_feed_item(
        &self,
        item: &FeedItem,
        account_id: Option<&str>,
    ) -> Result<Value> {
        let account_id = self.resolve_account(account_id).await?;

        let mut request = ApiRequest::post("/feed");
        request.form = item.form_fields(&account_id);

        self.send(request).await
    }

    #[instrument(name = "Registering webhook", skip_all, fields(url = %url))]
    pub async fn register_webhook(&self, url: &str, account_id: Option<&str>) -> Result<Webhook> {
        let account_id = self.resolve_account(account_id).await?;
        let request = ApiRequest::post("/webhooks")
            .form("account_id", account_id)
            .form("url", url);

        self.fetch_field(request, "webhook").await
    }

    #[instrument(name = "Listing webhooks", skip_all)]
    pub async fn list_webhooks(&self, account_id: Option<&str>) -> Result<Vec<Webhook>> {
        let account_id = self.resolve_account(account_id).await?;
        let request = ApiRequest::get("/webhooks").query("account_id", account_id);

        self.fetch_field(request, "webhooks").await
    }

    #[instrument(name = "Deleting webhook", skip_all, fields(webhook_id = %webhook_id))]
    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<Value> {
        self.send(ApiRequest::delete(format!("/webhooks/{}", webhook_id))).await
    }
}
