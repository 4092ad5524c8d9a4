//! StyleHub Client - storefront API access for shoppers.
//!
//! This crate wraps the StyleHub REST backend, where every response is a
//! `{ success, data?, error? }` envelope:
//!
//! - [`gateway::ApiClient`] attaches the bearer token, unwraps envelopes and
//!   recovers once from an expired access token by refreshing it
//! - [`likes::LikeCache`] holds per-product like state with optimistic
//!   toggles, rollback and subscriber notification
//! - [`session::SessionStore`] persists the signed-in session through a
//!   [`storage::KeyValueStore`]
//! - [`cache::QueryCache`] is a read-through cache for list endpoints
//! - [`services`] adds typed methods for each storefront endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let session = SessionStore::open(Arc::new(FileStore::new(&config.state_file)));
//! let api = ApiClient::new(&config, session, Arc::new(LogRedirect))?;
//!
//! let likes = LikeCache::new(api.clone());
//! let _sub = likes.subscribe(|| tracing::info!("like state changed"));
//! likes.toggle(ProductId::new(42), 0).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod likes;
pub mod redirect;
pub mod services;
pub mod session;
pub mod storage;

pub use cache::QueryCache;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use gateway::ApiClient;
pub use likes::{LikeCache, LikeSnapshot, Subscription, ToggleOutcome};
pub use redirect::{LogRedirect, LoginRedirect};
pub use session::SessionStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
