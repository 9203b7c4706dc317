//! [`HttpClient`] backed by reqwest.

use std::time::Duration;

use futures_util::future::BoxFuture;
use hubwire_protocol::{START_PATH, TransportKind};
use hubwire_runtime::{ConnectionLike, Error, HttpClient, Result, start_query};
use url::Url;

/// Issues start requests over HTTP(S) with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
	client: reqwest::Client,
}

impl ReqwestHttpClient {
	pub fn new() -> Result<Self> {
		let client = reqwest::Client::builder()
			.user_agent(concat!("hubwire/", env!("CARGO_PKG_VERSION")))
			.connect_timeout(Duration::from_secs(10))
			.build()
			.map_err(|e| Error::Transport(e.to_string()))?;
		Ok(Self { client })
	}
}

/// Resolves the start endpoint against the connection URL.
pub fn start_url(base: &str) -> Result<Url> {
	let mut base = Url::parse(base).map_err(|e| Error::InvalidUrl {
		url: base.to_string(),
		reason: e.to_string(),
	})?;
	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());
		base.set_path(&path);
	}
	base.join(START_PATH).map_err(|e| Error::InvalidUrl {
		url: base.to_string(),
		reason: e.to_string(),
	})
}

impl HttpClient for ReqwestHttpClient {
	fn get_start_response<'a>(
		&'a self,
		connection: &'a dyn ConnectionLike,
		transport: TransportKind,
		connection_data: Option<&'a str>,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			let url = start_url(connection.url())?;
			let query = start_query(connection, transport, connection_data);
			tracing::debug!(%url, %transport, "GET start");

			let response = self
				.client
				.get(url.clone())
				.query(&query)
				.send()
				.await
				.map_err(|e| Error::Transport(e.to_string()))?;

			let status = response.status();
			if !status.is_success() {
				return Err(Error::Http {
					status: status.as_u16(),
					url: url.to_string(),
				});
			}

			response.text().await.map_err(|e| Error::Transport(e.to_string()))
		})
	}
}
