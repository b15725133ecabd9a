//! A configured handle resolver.

use std::time::Duration;

use log::{trace, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{
    api::{self, Client, Target},
    Error, ErrorKind, Query, Response,
};

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Resolves handles against the doi.org handle API using a [`Client`].
///
/// Every call sends exactly one request, nothing is cached between calls.
///
/// ```no_run
/// use std::time::Duration;
/// use doi_api::Resolver;
///
/// let resolver = Resolver::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// let target = resolver.get_url("10.1000/182", false)?;
/// println!("{:?}", target);
/// # Ok::<(), doi_api::Error>(())
/// ```
#[derive(Debug)]
pub struct Resolver<C = reqwest::blocking::Client> {
    client: C,
}

impl Resolver {
    /// A resolver with the default transport configuration.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Config`] is returned when the HTTP client cannot be
    /// initialised.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Starts configuring the transport of a resolver.
    #[must_use]
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }
}

impl<C: Client> Resolver<C> {
    /// A resolver sending its requests through `client`.
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Resolves `handle` and returns the parsed response.
    ///
    /// A response whose code is not success is logged but still returned, see
    /// [`Response::code`].
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::IO`] is returned when the request fails.
    /// An [`Err`] of kind [`ErrorKind::Status`] is returned when the HTTP status is not one of
    /// 200, 404 or 500.
    /// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when the body is not a handle
    /// response.
    pub fn resolve(&self, handle: &str, query: &Query) -> Result<Response, Error> {
        api::handles::resolve(&self.client, handle, query)
    }

    /// Resolves `doi` restricted to `URL` and `10320/loc` values and returns its target URL.
    ///
    /// For a `10320/loc` value `allow_multi` returns every location instead of the one with the
    /// highest weight.
    ///
    /// # Errors
    ///
    /// Any error from [`Resolver::resolve`].
    /// An [`Err`] of kind [`ErrorKind::Api`] is returned when the response code is not success.
    /// An [`Err`] of kind [`ErrorKind::NoValue`] is returned when there is no usable value.
    /// An [`Err`] of kind [`ErrorKind::UnexpectedType`] is returned when the first value is not
    /// a `URL` or `10320/loc` value.
    /// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when the locations are not well
    /// formed XML.
    pub fn get_url(&self, doi: &str, allow_multi: bool) -> Result<Target, Error> {
        api::handles::get_url(&self.client, doi, allow_multi)
    }
}

/// Transport options for a [`Resolver`], passed through to the HTTP client.
#[derive(Debug, Default)]
pub struct ResolverBuilder {
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl ResolverBuilder {
    /// Adds a header sent with every request.
    #[must_use]
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Total timeout of a request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sends all requests through the proxy at `url`.
    #[must_use]
    pub fn proxy<S: Into<String>>(mut self, url: S) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Overrides the default `doi-api/<version>` user agent.
    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The request URL is fixed by the handle, an explicit URL is ignored.
    #[must_use]
    pub fn url(self, url: &str) -> Self {
        warn!("Explicit url '{url}' is not used, the request URL is fixed by the handle");
        self
    }

    /// Builds the resolver.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Config`] is returned for an invalid header or proxy, or
    /// when the HTTP client cannot be initialised.
    pub fn build(self) -> Result<Resolver, Error> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::wrap(ErrorKind::Config, e))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| Error::wrap(ErrorKind::Config, e))?;
            headers.append(name, value);
        }

        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            )
            .default_headers(headers);

        if let Some(timeout) = self.timeout {
            trace!("Using a request timeout of {timeout:?}");
            builder = builder.timeout(timeout);
        }

        if let Some(proxy) = self.proxy {
            trace!("Using proxy '{proxy}'");
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| Error::wrap(ErrorKind::Config, e))?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map(Resolver::with_client)
            .map_err(|e| Error::wrap(ErrorKind::Config, e))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        api::{assert_url, impl_producer, respond, MockClient},
        ResponseCode,
    };

    impl_producer! {
        UrlProducer => respond(200, include_str!("../tests/data/handle_all_values.json")),
    }

    #[test]
    fn resolver_uses_its_client() {
        let resolver = Resolver::with_client(MockClient::<UrlProducer>::default());

        let response = resolver.resolve("10.1000/182", &Query::new()).unwrap();
        assert_eq!(ResponseCode::Success, response.code());
        assert_url!("https://doi.org/api/handles/10.1000/182");

        let target = resolver.get_url("10.1000/182", true).unwrap();
        assert_eq!(
            vec!["https://www.doi.org/doi_handbook/TOC.html".to_owned()],
            target.into_vec()
        );
    }

    #[test]
    fn invalid_header_is_config_error() {
        let err = Resolver::builder()
            .header("not a header", "value")
            .build()
            .unwrap_err();

        assert_eq!(ErrorKind::Config, err.kind());
    }

    #[test]
    fn url_override_is_ignored() {
        let builder = Resolver::builder()
            .header("Accept", "application/json")
            .url("https://example.org/elsewhere");

        assert_eq!(
            vec![("Accept".to_owned(), "application/json".to_owned())],
            builder.headers
        );
        assert!(builder.proxy.is_none());
        assert!(builder.build().is_ok());
    }
}
