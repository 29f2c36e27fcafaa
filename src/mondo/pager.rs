use super::client::MondoClient;
use super::transport::Transport;
use crate::error::{MondoError, Result};
use crate::models::Transaction;
use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::Stream;
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_LIMIT: u32 = 100;

/// Parameters for `GET /transactions`.
///
/// `since` is either an RFC 3339 timestamp (inclusive) or a transaction id
/// (exclusive). Both are passed to the API unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub account_id: Option<String>,
    pub limit: u32,
    pub since: Option<String>,
    pub before: Option<String>,
    pub expand_merchant: bool,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            account_id: None,
            limit: DEFAULT_LIMIT,
            since: None,
            before: None,
            expand_merchant: false,
        }
    }
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn since_time(self, since: DateTime<Utc>) -> Self {
        self.since(since.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn before_time(self, before: DateTime<Utc>) -> Self {
        self.before(before.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn expand_merchant(mut self, expand: bool) -> Self {
        self.expand_merchant = expand;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagerState {
    /// Another page may exist.
    More,
    /// The buffered page is the last one.
    LastPage,
    Done,
}

/// Pull-driven iteration over every transaction matching a query.
///
/// Each call to [`next`](Self::next) performs at most one page fetch. A page
/// shorter than `limit` is taken to be the last one; after a full page the
/// cursor moves to the id of its final transaction. This can cost one extra
/// fetch that returns an empty page when the data ends on a page boundary.
///
/// When the query names no account, the first fetch also lists accounts to
/// resolve the default one, so that call makes two requests. Later pages reuse
/// the resolved id.
pub struct TransactionPager<'a, T> {
    client: &'a MondoClient<T>,
    initial: TransactionQuery,
    query: TransactionQuery,
    buffer: VecDeque<Transaction>,
    state: PagerState,
    fetches: usize,
}

impl<'a, T: Transport> TransactionPager<'a, T> {
    pub(crate) fn new(client: &'a MondoClient<T>, query: TransactionQuery) -> Result<Self> {
        if query.limit == 0 {
            return Err(MondoError::InvalidInput(
                "transaction page limit must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            client,
            initial: query.clone(),
            query,
            buffer: VecDeque::new(),
            state: PagerState::More,
            fetches: 0,
        })
    }

    /// Number of pages fetched since creation or the last restart.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// Rewind to the initial cursor. The next call fetches the first page again.
    pub fn restart(&mut self) {
        let account_id = self.query.account_id.take();
        self.query = self.initial.clone();
        if self.query.account_id.is_none() {
            self.query.account_id = account_id;
        }
        self.buffer.clear();
        self.state = PagerState::More;
        self.fetches = 0;
    }

    /// The next transaction, an error that ends the sequence, or `None` once
    /// the pages are exhausted.
    pub async fn next(&mut self) -> Option<Result<Transaction>> {
        if let Some(transaction) = self.buffer.pop_front() {
            return Some(Ok(transaction));
        }

        if self.state != PagerState::More {
            self.state = PagerState::Done;
            return None;
        }

        match self.fetch_page().await {
            Ok(()) => self.buffer.pop_front().map(Ok),
            Err(e) => {
                self.state = PagerState::Done;
                Some(Err(e))
            }
        }
    }

    async fn fetch_page(&mut self) -> Result<()> {
        // Resolve the default account once rather than on every page.
        if self.query.account_id.is_none() {
            self.query.account_id = Some(self.client.get_primary_account_id().await?);
        }

        let page = self.client.list_transactions(&self.query).await?;
        self.fetches += 1;

        debug!(
            fetch = self.fetches,
            size = page.len(),
            limit = self.query.limit,
            "Fetched transaction page"
        );

        if page.is_empty() || page.len() < self.query.limit as usize {
            self.state = PagerState::LastPage;
        } else if let Some(last) = page.last() {
            self.query.since = Some(last.id.clone());
        }

        self.buffer.extend(page);
        if self.buffer.is_empty() {
            self.state = PagerState::Done;
        }

        Ok(())
    }

    /// Adapt the pager into a [`Stream`]. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Transaction>> + 'a {
        futures_util::stream::unfold(self, |mut pager| async move {
            pager.next().await.map(|item| (item, pager))
        })
    }

    /// Drain the pager into a vector, stopping at the first error.
    pub async fn collect_all(mut self) -> Result<Vec<Transaction>> {
        let mut transactions = Vec::new();
        while let Some(transaction) = self.next().await {
            transactions.push(transaction?);
        }
        Ok(transactions)
    }
}
