//! Fixed descriptor for the LinkedIn ugcPosts read the relay forwards.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::ConfigError};

/// Rest.li protocol header sent with every data API call.
pub const RESTLI_PROTOCOL_HEADER: (&str, &str) = ("X-Restli-Protocol-Version", "2.0.0");
/// Versioned API header sent with every data API call.
pub const LINKEDIN_VERSION_HEADER: (&str, &str) = ("LinkedIn-Version", "202305");

/// Default ugcPosts collection endpoint.
pub const DEFAULT_POSTS_URL: &str = "https://api.linkedin.com/v2/ugcPosts";
/// Default author filter.
pub const DEFAULT_AUTHOR_URN: &str = "urn:li:organization:11092037";
/// Default page size.
pub const DEFAULT_COUNT: u32 = 20;
/// Field projection requested from the ugcPosts collection.
pub const POSTS_PROJECTION: &str = "(elements*(id,lifecycleState,lastModified(time),specificContent(com.linkedin.ugc.ShareContent(shareCommentary,shareMediaCategory,media(*,title,description,lastModified,thumbnails,mediaType,status,originalUrl)),lastModified)))";

/// Deployment-constant description of the upstream posts query.
///
/// None of the fields are derived from the inbound request; the relay always asks for the
/// same author, projection, and page size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostsRequest {
	/// Collection endpoint without a query string.
	pub endpoint: Url,
	/// Author URN used in the `authors=List(..)` finder.
	pub author_urn: String,
	/// Rest.li projection expression.
	pub projection: String,
	/// Page size.
	pub count: u32,
}
impl PostsRequest {
	/// Creates a descriptor for `endpoint` filtered to `author_urn`.
	pub fn new(endpoint: Url, author_urn: impl Into<String>) -> Self {
		Self {
			endpoint,
			author_urn: author_urn.into(),
			projection: POSTS_PROJECTION.into(),
			count: DEFAULT_COUNT,
		}
	}

	/// Parses `endpoint` and builds a descriptor.
	pub fn parse(endpoint: &str, author_urn: impl Into<String>) -> Result<Self, ConfigError> {
		let endpoint = Url::parse(endpoint)
			.map_err(|source| ConfigError::InvalidUrl { field: "posts", source })?;

		Ok(Self::new(endpoint, author_urn))
	}

	/// Overrides the page size.
	pub fn with_count(mut self, count: u32) -> Self {
		self.count = count;

		self
	}

	/// Overrides the projection expression.
	pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
		self.projection = projection.into();

		self
	}

	/// Full request URL.
	///
	/// Rest.li expects the punctuation in `List(..)` and the projection verbatim, so only the
	/// author URN is percent-encoded and the query is assembled by hand.
	pub fn url(&self) -> Url {
		let author: String = form_urlencoded::byte_serialize(self.author_urn.as_bytes()).collect();
		let query = format!(
			"q=authors&authors=List({author})&projection={}&count={}",
			self.projection, self.count
		);
		let mut url = self.endpoint.clone();

		url.set_query(Some(&query));

		url
	}
}
