//! Served media type table.

use smol_str::SmolStr;

/// Ordered table of served media types, as pairs of media type and file
/// extension.
///
/// A request qualifies when any of three signals appears in the table:
/// the path extension, an `Accept` header member, or the request media
/// type. The default table serves JavaScript and CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypes {
    entries: Vec<(SmolStr, SmolStr)>,
}

impl MediaTypes {
    /// Builds a table from `(media type, extension)` pairs. Extensions
    /// keep their leading dot: `("text/css", ".css")`.
    pub fn new<M, E, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (M, E)>,
        M: AsRef<str>,
        E: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(media_type, extension)| {
                (
                    SmolStr::new(media_type.as_ref()),
                    SmolStr::new(extension.as_ref()),
                )
            })
            .collect();
        Self { entries }
    }

    /// The default table: JavaScript and CSS.
    pub fn javascript_and_css() -> Self {
        Self::new([("application/javascript", ".js"), ("text/css", ".css")])
    }

    /// Whether `extension` (with leading dot) appears in the table.
    pub fn contains_extension(&self, extension: &str) -> bool {
        self.entries
            .iter()
            .any(|(_, registered)| registered.as_str() == extension)
    }

    /// Whether `media_type` appears in the table.
    pub fn contains_media_type(&self, media_type: &str) -> bool {
        self.entries
            .iter()
            .any(|(registered, _)| registered.as_str() == media_type)
    }

    /// Whether any member of an `Accept` header value appears in the
    /// table. Quality parameters are ignored.
    pub fn accepts(&self, accept: &str) -> bool {
        accept
            .split(',')
            .filter_map(|member| member.split(';').next())
            .map(str::trim)
            .any(|media_type| self.contains_media_type(media_type))
    }

    /// The media type registered for `extension`, if any.
    pub fn for_extension(&self, extension: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, registered)| registered.as_str() == extension)
            .map(|(media_type, _)| media_type.as_str())
    }

    /// Pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(media_type, extension)| (media_type.as_str(), extension.as_str()))
    }
}

impl Default for MediaTypes {
    fn default() -> Self {
        Self::javascript_and_css()
    }
}
