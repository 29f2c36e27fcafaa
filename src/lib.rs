//! Client for the Mondo banking API.
//!
//! A [`MondoClient`] authenticates with the OAuth2 password grant when it is
//! created and refreshes its access token transparently before any call made
//! after expiry.
//!
//! ```no_run
//! use mondo_client::{Config, MondoClient, TransactionQuery};
//!
//! # async fn example() -> mondo_client::Result<()> {
//! let config = Config::load()?;
//! let client = MondoClient::from_config(&config).await?;
//!
//! let account_id = client.get_primary_account_id().await?;
//! let mut transactions = client.transactions(TransactionQuery::new().account_id(account_id))?;
//! while let Some(transaction) = transactions.next().await {
//!     let transaction = transaction?;
//!     println!("{} {}", transaction.id, transaction.amount_major());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod mondo;

pub use config::{ClientConfig, Config};
pub use error::{MondoError, Result, TransportError};
pub use mondo::{
    Credentials, MondoClient, ReqwestTransport, Token, TransactionPager, TransactionQuery,
    Transport,
};
