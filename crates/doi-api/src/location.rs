//! Parsing of `10320/loc` values.
//!
//! A `10320/loc` value carries a small XML document listing alternate locations for a handle:
//!
//! ```xml
//! <locations>
//!   <location id="0" href="https://example.org/a" weight="1" />
//!   <location id="1" href="https://example.org/b" weight="0" />
//! </locations>
//! ```
//!
//! No root element name is assumed, any element with an `href` attribute is a location.

use log::trace;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{Error, ErrorKind};

/// One alternate location of a handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    href: String,
    weight: Option<String>,
}

impl Location {
    /// The `href` attribute.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The raw `weight` attribute, compared as a string rather than a number.
    #[must_use]
    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    fn weight_key(&self) -> &str {
        self.weight.as_deref().unwrap_or_default()
    }

    fn from_element(element: &BytesStart<'_>) -> Result<Option<Self>, Error> {
        let mut href = None;
        let mut weight = None;

        for attr in element.attributes() {
            let attr = attr.map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;
            match attr.key.as_ref() {
                b"href" => href = Some(unescaped(&attr)?),
                b"weight" => weight = Some(unescaped(&attr)?),
                _ => {}
            }
        }

        Ok(href.map(|href| Self { href, weight }))
    }
}

fn malformed(reason: &str) -> Error {
    Error::new(
        ErrorKind::Deserialize,
        format!("Malformed location list: {reason}"),
    )
}

fn unescaped(attr: &quick_xml::events::attributes::Attribute<'_>) -> Result<String, Error> {
    attr.unescape_value()
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
}

/// The locations of a `10320/loc` value in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locations(Vec<Location>);

impl Locations {
    /// Parses the XML payload of a `10320/loc` value.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when the payload is not well
    /// formed XML.
    pub fn parse(xml: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(xml);
        let mut locations = Vec::new();
        let mut depth = 0_usize;
        let mut roots = 0_usize;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

            if depth == 0 {
                match &event {
                    Event::Start(_) | Event::Empty(_) => {
                        roots += 1;
                        if roots > 1 {
                            return Err(malformed("more than one root element"));
                        }
                    }
                    Event::Text(text) if text.iter().any(|b| !b.is_ascii_whitespace()) => {
                        return Err(malformed("text outside of the root element"));
                    }
                    Event::CData(_) => {
                        return Err(malformed("text outside of the root element"));
                    }
                    _ => {}
                }
            }

            match event {
                Event::Start(element) => {
                    depth += 1;
                    locations.extend(Location::from_element(&element)?);
                }
                Event::Empty(element) => locations.extend(Location::from_element(&element)?),
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }

        if depth > 0 {
            return Err(malformed("unclosed element at end of input"));
        }
        if roots == 0 {
            return Err(malformed("no root element"));
        }

        trace!("Found {} location(s)", locations.len());
        Ok(Self(locations))
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no element carried an `href`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the locations in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.0.iter()
    }

    /// All hrefs in document order.
    #[must_use]
    pub fn into_hrefs(self) -> Vec<String> {
        self.0.into_iter().map(|l| l.href).collect()
    }

    /// The location with the highest weight.
    ///
    /// Locations are stable sorted by weight using string comparison, so `"2"` outranks `"10"`
    /// and among equal weights the one appearing last in the document wins. A missing weight
    /// sorts as an empty string.
    #[must_use]
    pub fn preferred(&self) -> Option<&Location> {
        let mut by_weight: Vec<&Location> = self.0.iter().collect();
        by_weight.sort_by(|a, b| a.weight_key().cmp(b.weight_key()));
        by_weight.pop()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn locations(entries: &[(&str, &str)]) -> String {
        let mut xml = String::from("<locations>");
        for (i, (href, weight)) in entries.iter().enumerate() {
            xml.push_str(&format!(
                r#"<location id="{i}" href="{href}" weight="{weight}" />"#
            ));
        }
        xml.push_str("</locations>");
        xml
    }

    #[test]
    fn highest_weight_is_preferred() {
        let locs = Locations::parse(&locations(&[("A", "1"), ("B", "5"), ("C", "3")])).unwrap();

        assert_eq!("B", locs.preferred().unwrap().href());
        assert_eq!(vec!["A", "B", "C"], locs.into_hrefs());
    }

    #[test]
    fn weights_compare_as_strings() {
        let locs = Locations::parse(&locations(&[("ten", "10"), ("two", "2")])).unwrap();

        assert_eq!("two", locs.preferred().unwrap().href());
    }

    #[test]
    fn equal_weights_prefer_the_last_location() {
        let locs = Locations::parse(&locations(&[("A", "1"), ("B", "1"), ("C", "0")])).unwrap();

        assert_eq!("B", locs.preferred().unwrap().href());
    }

    #[test]
    fn missing_weight_sorts_lowest() {
        let xml = r#"<locations><location href="A" weight="0"/><location href="B"/></locations>"#;
        let locs = Locations::parse(xml).unwrap();

        assert_eq!(None, locs.iter().nth(1).unwrap().weight());
        assert_eq!("A", locs.preferred().unwrap().href());
    }

    #[test]
    fn any_element_with_href_is_a_location() {
        let xml = r#"<root><link href="A"/><nested><item weight="9" href="B">text</item></nested><other id="x"/></root>"#;
        let locs = Locations::parse(xml).unwrap();

        assert_eq!(2, locs.len());
        assert_eq!(vec!["A", "B"], locs.into_hrefs());
    }

    #[test]
    fn href_is_unescaped() {
        let xml = r#"<locations><location href="https://example.org/?a=1&amp;b=2"/></locations>"#;
        let locs = Locations::parse(xml).unwrap();

        assert_eq!("https://example.org/?a=1&b=2", locs.preferred().unwrap().href());
    }

    #[test]
    fn no_href_means_no_preferred_location() {
        let locs = Locations::parse(r#"<locations><location weight="1"/></locations>"#).unwrap();

        assert!(locs.is_empty());
        assert!(locs.preferred().is_none());
    }

    #[test]
    fn mismatched_tags_are_deserialize_error() {
        let err = Locations::parse(r#"<locations><location href="A"></locations>"#).unwrap_err();

        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn truncated_payload_is_deserialize_error() {
        let err = Locations::parse(r#"<locations><location href="A" weight="1"/>"#).unwrap_err();

        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn second_root_is_deserialize_error() {
        let xml = r#"<locations><location href="A"/></locations><locations><location href="B"/></locations>"#;
        let err = Locations::parse(xml).unwrap_err();

        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn plain_text_is_deserialize_error() {
        let err = Locations::parse("https://example.org/not-xml").unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());

        let err = Locations::parse("   ").unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn declaration_and_comments_around_root_are_allowed() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- mirrors -->\n<locations><location href=\"A\"/></locations>\n";
        let locs = Locations::parse(xml).unwrap();

        assert_eq!(vec!["A"], locs.into_hrefs());
    }
}
