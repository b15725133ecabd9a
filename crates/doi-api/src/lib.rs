#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # doi-api
//!
//! doi-api is a small blocking client for the [doi.org handle API][api]. It resolves a DOI (or
//! any handle) to its typed values with [`resolve`] and turns those values into the URL the DOI
//! points at with [`get_url`].
//!
//! A DOI either has a `URL` value, which is returned as is, or a `10320/loc` value holding an
//! XML list of weighted locations, in which case the location with the highest weight is picked
//! (or all of them, see [`Resolver::get_url`]).
//!
//! ```no_run
//! let target = doi_api::get_url("10.1000/182", false)?;
//! assert_eq!(Some("https://www.doi.org/doi_handbook/TOC.html"), target.as_single());
//! # Ok::<(), doi_api::Error>(())
//! ```
//!
//! The crate logs through the [`log`] facade and leaves installing a logger to the binary.
//!
//! [api]: https://www.doi.org/factsheets/DOIProxy.html#rest-api

mod api;
mod error;
pub mod location;
mod query;
pub mod response;
mod resolver;

pub use api::{Client, HttpResponse, Target};
pub use error::{Error, ErrorKind};
pub use location::{Location, Locations};
pub use query::Query;
pub use resolver::{Resolver, ResolverBuilder};
pub use response::{Response, ResponseCode, Value};

use log::trace;

/// Resolve `handle` using a [`Resolver`] with the default transport configuration.
///
/// A response with a code other than success is still returned, check [`Response::code`].
///
/// # Errors
///
/// An `Err` is returned when the request fails or the HTTP status is not one the handle API
/// uses.
/// An `Err` is returned when the response body cannot be parsed.
#[inline]
pub fn resolve(handle: &str, query: &Query) -> Result<Response, Error> {
    trace!("Resolve handle '{handle}'");
    Resolver::new()?.resolve(handle, query)
}

/// Get the target URL of `doi` using a [`Resolver`] with the default transport configuration.
///
/// With `allow_multi` every location of a `10320/loc` value is returned instead of the one with
/// the highest weight.
///
/// # Errors
///
/// An `Err` is returned when the DOI cannot be resolved or does not resolve successfully.
/// An `Err` is returned when the DOI has no `URL` or `10320/loc` value that can be read.
#[inline]
pub fn get_url(doi: &str, allow_multi: bool) -> Result<Target, Error> {
    trace!("Get URL of doi '{doi}'");
    Resolver::new()?.get_url(doi, allow_multi)
}
