use url::Url;

#[derive(Debug, Clone)]
pub struct TrayURL(Url);

impl AsRef<str> for TrayURL {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TrayURL {
    /// Parses the API root. It must be an absolute URL that can carry a path.
    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self(url))
    }

    /// Append the given path to the URL. Empty segments are dropped.
    pub fn append_path(&self, path: &str) -> Self {
        self.with_segments(path.split('/').filter(|s| !s.is_empty()))
    }

    /// Append one path segment, percent-encoded so it can never add
    /// separators, queries or fragments of its own.
    pub fn append_segment(&self, segment: &str) -> Self {
        self.with_segments(std::iter::once(segment))
    }

    fn with_segments<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut url = self.0.clone();
        // Checked in `parse`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Self(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> TrayURL {
        TrayURL::parse(url).unwrap()
    }

    #[test]
    fn append_path_handles_slashes() {
        let url = base("https://api.example.com/").append_path("/bookings");
        assert_eq!(url.as_ref(), "https://api.example.com/bookings");

        let nested = base("http://localhost:8080/api").append_path("bookings/consultant/");
        assert_eq!(nested.as_ref(), "http://localhost:8080/api/bookings/consultant");
    }

    #[test]
    fn append_segment_encodes_separators() {
        let url = base("https://api.example.com")
            .append_path("bookings")
            .append_segment("a/b c?d#e");
        assert_eq!(url.as_ref(), "https://api.example.com/bookings/a%2Fb%20c%3Fd%23e");
    }

    #[test]
    fn append_segment_escapes_existing_escapes() {
        let url = base("https://api.example.com")
            .append_path("bookings")
            .append_segment("100%2F");
        assert_eq!(url.as_ref(), "https://api.example.com/bookings/100%252F");
    }

    #[test]
    fn rejects_unusable_base() {
        assert!(TrayURL::parse("not a url").is_err());
        assert!(TrayURL::parse("mailto:someone@example.com").is_err());
    }
}
