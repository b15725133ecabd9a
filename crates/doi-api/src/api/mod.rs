//! The HTTP seam between the resolver and the network.

pub(crate) mod handles;

pub use handles::Target;

use crate::{Error, ErrorKind};

/// The status and body of a single HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// A blocking HTTP client able to perform the single GET the handle API needs.
///
/// Implemented for [`reqwest::blocking::Client`]; other transports can be plugged in through
/// [`Resolver::with_client`](crate::Resolver::with_client).
pub trait Client {
    /// Sends a GET request to `url` with the `query` pairs appended in order.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::IO`] is returned when the request cannot be sent or the
    /// body cannot be read. The HTTP status itself is never an error at this level.
    fn fetch(&self, url: &str, query: &[(&'static str, String)]) -> Result<HttpResponse, Error>;
}

impl Client for reqwest::blocking::Client {
    fn fetch(&self, url: &str, query: &[(&'static str, String)]) -> Result<HttpResponse, Error> {
        let resp = self
            .get(url)
            .query(query)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_producer, respond, MockClient, NetworkErrorProducer, Producer, CALLS,
    URL_SINK,
};

#[cfg(test)]
mod test {

    use super::*;

    thread_local! {
        pub(crate) static URL_SINK: std::cell::RefCell<Option<String>> = std::cell::RefCell::new(None);
        pub(crate) static CALLS: std::cell::Cell<usize> = std::cell::Cell::new(0);
    }

    /// Asserts that the expected URL is the same as the one provided to the [`MockClient`].
    ///
    /// The [`MockClient`] writes the URL it was given into the thread local `URL_SINK`, with the
    /// query pairs appended unencoded as `?k=v&k=v`.
    macro_rules! assert_url {
        ($expected: expr) => {
            assert_url!($expected, "");
        };
        ($expected: expr, $($arg: tt)+) => {
            let url = crate::api::URL_SINK.with(|url| url.borrow().clone().unwrap_or_default());
            assert_eq!($expected, url, $($arg)+);
        };
    }

    pub(crate) trait Producer
    where
        Self: Default,
    {
        fn produce() -> Result<HttpResponse, Error>;
    }

    pub(crate) fn respond(status: u16, body: &str) -> Result<HttpResponse, Error> {
        Ok(HttpResponse {
            status,
            body: body.to_owned(),
        })
    }

    #[derive(Default)]
    pub(crate) struct MockClient<P: Producer = EmptyBodyProducer> {
        _producer: std::marker::PhantomData<P>,
    }

    impl<P: Producer> Client for MockClient<P> {
        fn fetch(
            &self,
            url: &str,
            query: &[(&'static str, String)],
        ) -> Result<HttpResponse, Error> {
            let mut full = url.to_owned();
            for (i, (key, value)) in query.iter().enumerate() {
                full.push(if i == 0 { '?' } else { '&' });
                full.push_str(key);
                full.push('=');
                full.push_str(value);
            }
            URL_SINK.with(|sink| *sink.borrow_mut() = Some(full));
            CALLS.with(|calls| calls.set(calls.get() + 1));
            P::produce()
        }
    }

    macro_rules! impl_producer {
        ($($producer:ident => $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer for $producer {
                    fn produce() -> Result<crate::api::HttpResponse, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_producer! {
        EmptyBodyProducer => respond(200, ""),
        NetworkErrorProducer => Err(Error::new(ErrorKind::IO, "Network error")),
    }

    pub(crate) use assert_url;
    pub(crate) use impl_producer;
}
