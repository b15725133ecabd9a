//! Query parameters understood by the handle API.
//!
//! See the [DOI proxy REST API](https://www.doi.org/factsheets/DOIProxy.html#rest-api) for the
//! meaning of each parameter. Multiple `type` and `index` parameters are allowed, returned
//! values match *any* of them.

/// Builder for the query string of a handle resolution request.
///
/// ```
/// use doi_api::Query;
///
/// let query = Query::new().value_type("URL").index(1).pretty(true);
/// assert_eq!(
///     vec![
///         ("pretty", "true".to_owned()),
///         ("type", "URL".to_owned()),
///         ("index", "1".to_owned()),
///     ],
///     query.to_pairs()
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    callback: bool,
    pretty: bool,
    auth: bool,
    cert: bool,
    types: Vec<String>,
    indices: Vec<u32>,
}

impl Query {
    /// An empty query, the API returns every value of the handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a JSONP callback wrapped response.
    #[must_use]
    pub fn callback(mut self, enabled: bool) -> Self {
        self.callback = enabled;
        self
    }

    /// Ask for pretty printed JSON.
    #[must_use]
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    /// Bypass the proxy cache and query a primary handle server directly.
    #[must_use]
    pub fn auth(mut self, enabled: bool) -> Self {
        self.auth = enabled;
        self
    }

    /// Request an authenticated response from the source handle server.
    #[must_use]
    pub fn cert(mut self, enabled: bool) -> Self {
        self.cert = enabled;
        self
    }

    /// Restrict the response to values of this type. May be repeated.
    #[must_use]
    pub fn value_type<S: Into<String>>(mut self, value_type: S) -> Self {
        self.types.push(value_type.into());
        self
    }

    /// Restrict the response to values of all of these types.
    #[must_use]
    pub fn value_types<I, S>(mut self, value_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(value_types.into_iter().map(Into::into));
        self
    }

    /// Restrict the response to the value at this index. May be repeated.
    #[must_use]
    pub fn index(mut self, index: u32) -> Self {
        self.indices.push(index);
        self
    }

    /// The query as ordered key/value pairs, flags first then types then indices.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let flags = [
            ("callback", self.callback),
            ("pretty", self.pretty),
            ("auth", self.auth),
            ("cert", self.cert),
        ];

        flags
            .into_iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(key, _)| (key, "true".to_owned()))
            .chain(self.types.iter().map(|t| ("type", t.clone())))
            .chain(self.indices.iter().map(|i| ("index", i.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::Query;

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(Query::new().to_pairs().is_empty());
    }

    #[test]
    fn repeated_types_and_indices_keep_order() {
        let query = Query::new()
            .value_types(["URL", "10320/loc"])
            .value_type("HS_ADMIN")
            .index(100)
            .index(1);

        assert_eq!(
            vec![
                ("type", "URL".to_owned()),
                ("type", "10320/loc".to_owned()),
                ("type", "HS_ADMIN".to_owned()),
                ("index", "100".to_owned()),
                ("index", "1".to_owned()),
            ],
            query.to_pairs()
        );
    }

    #[test]
    fn disabled_flags_are_not_sent() {
        let query = Query::new().auth(true).cert(false).callback(true);

        assert_eq!(
            vec![("callback", "true".to_owned()), ("auth", "true".to_owned())],
            query.to_pairs()
        );
    }
}
