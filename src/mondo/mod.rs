mod auth;
mod client;
mod pager;
mod transport;

pub use auth::{Credentials, Token, TokenManager};
pub use client::MondoClient;
pub use pager::{DEFAULT_LIMIT, TransactionPager, TransactionQuery};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
