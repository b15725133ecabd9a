use log::{debug, error, trace};

use crate::{
    location::Locations,
    response::{Response, Value, LOCATIONS_TYPE, URL_TYPE},
    Error, ErrorKind, Query,
};

use super::{Client, HttpResponse};

pub(crate) const HANDLE_API_URL: &str = "https://doi.org/api/handles/";

/// HTTP statuses the handle API answers with, anything else is a transport level failure.
const ACCEPTED_STATUS: [u16; 3] = [200, 404, 500];

/// The URL(s) a DOI points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A single URL, from a `URL` value or the preferred `10320/loc` location.
    Single(String),
    /// Every `10320/loc` location in document order.
    Multiple(Vec<String>),
}

impl Target {
    /// The URL if this is a [`Target::Single`].
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(url) => Some(url),
            Self::Multiple(_) => None,
        }
    }

    /// All URLs as a list, a [`Target::Single`] becomes a list of one.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(url) => vec![url],
            Self::Multiple(urls) => urls,
        }
    }
}

pub(crate) fn resolve<C: Client>(
    client: &C,
    handle: &str,
    query: &Query,
) -> Result<Response, Error> {
    let url = format!("{HANDLE_API_URL}{handle}");
    trace!("Resolving handle '{handle}' at {url}");

    let HttpResponse { status, body } = client.fetch(&url, &query.to_pairs())?;

    if !ACCEPTED_STATUS.contains(&status) {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        error!("Status Code {status}: {reason}");
        return Err(Error::unexpected_status(status, reason));
    }

    debug!("Response data: {body}");
    let response = Response::from_body(&body)?;

    // a non-success code is still handed back, the caller decides what it means
    let code = response.code();
    if !code.is_success() {
        error!("Response Code {}: {}", code.code(), code.message());
    }

    Ok(response)
}

pub(crate) fn get_url<C: Client>(
    client: &C,
    doi: &str,
    allow_multi: bool,
) -> Result<Target, Error> {
    let query = Query::new().value_types([URL_TYPE, LOCATIONS_TYPE]);

    let target = resolve(client, doi, &query).and_then(|response| {
        let code = response.code();
        if !code.is_success() {
            return Err(Error::new(
                ErrorKind::Api,
                format!("Cannot get a URL for '{doi}', response code {code}"),
            ));
        }

        let value = response.values().first().ok_or_else(|| {
            Error::new(ErrorKind::NoValue, format!("No URL values found for '{doi}'"))
        })?;
        target_of(value, allow_multi)
    });

    if let Err(err) = &target {
        error!("Failed to get URL for '{doi}': {err}");
    }
    target
}

fn target_of(value: &Value, allow_multi: bool) -> Result<Target, Error> {
    match value.value_type() {
        URL_TYPE => data_of(value).map(|url| Target::Single(url.to_owned())),
        LOCATIONS_TYPE => {
            let locations = Locations::parse(data_of(value)?)?;
            if locations.is_empty() {
                return Err(Error::new(
                    ErrorKind::NoValue,
                    "No locations with an href were found",
                ));
            }

            if allow_multi {
                Ok(Target::Multiple(locations.into_hrefs()))
            } else {
                locations
                    .preferred()
                    .map(|l| Target::Single(l.href().to_owned()))
                    .ok_or_else(|| Error::new(ErrorKind::NoValue, "No preferred location"))
            }
        }
        other => Err(Error::new(
            ErrorKind::UnexpectedType,
            format!("Cannot get a URL from a value of type '{other}'"),
        )),
    }
}

fn data_of(value: &Value) -> Result<&str, Error> {
    value.data_str().ok_or_else(|| {
        Error::new(
            ErrorKind::NoValue,
            format!("Value at index {} is not a string", value.index()),
        )
    })
}
