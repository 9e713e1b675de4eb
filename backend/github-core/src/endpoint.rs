//! Structured endpoint construction.
//!
//! An `Endpoint` is an ordered list of path segments plus an ordered list of
//! query parameters. Nothing is concatenated by hand: segments and values are
//! percent-encoded by `url` when the endpoint is resolved against a base URL,
//! so an owner like `a/b` or a query like `rust lang` cannot break the path.

use crate::error::GithubClientError;

use std::fmt::{Display, Formatter, Result as FormatResult};

use percent_encoding::percent_decode_str;
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
    params: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            params: Vec::new(),
        }
    }

    /// Split a relative path like `/users/octocat` into segments.
    ///
    /// Segments are percent-decoded, since `resolve` encodes them again.
    /// Any query string in the path is parsed into parameters.
    pub fn parse(path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut endpoint = Self::new(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned()),
        );

        if let Some(query) = query {
            endpoint.params = url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect();
        }

        endpoint
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Append this endpoint to `base`, keeping any path the base already has
    /// (GitHub Enterprise bases look like `https://host/api/v3`).
    #[track_caller]
    pub fn resolve(&self, base: &Url) -> Result<Url, GithubClientError> {
        let mut url = base.clone();

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                GithubClientError::invalid_url(format!("base URL cannot take a path: {base}"))
            })?;
            path.pop_if_empty();
            path.extend(self.segments.iter().map(String::as_str));
        }

        url.set_query(None);
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                self.params
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }

        Ok(url)
    }
}

impl Display for Endpoint {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "/{}", self.segments.join("/"))?;

        if !self.params.is_empty() {
            let query: Vec<String> = self
                .params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(formatter, "?{}", query.join("&"))?;
        }

        Ok(())
    }
}
