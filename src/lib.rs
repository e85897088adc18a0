//! A tiny LinkedIn relay that keeps OAuth credentials server-side, forwards one read endpoint,
//! and refreshes an expired bearer token the moment the upstream API rejects it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod relay;
pub mod server;
pub mod upstream;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, StatusCode};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use error::{Error, Result};
pub use reqwest;
pub use url;
// The binary reports startup failures through `color_eyre`.
use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};
