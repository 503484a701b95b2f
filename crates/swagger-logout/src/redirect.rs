use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// The current page, without query string or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pub origin: String,
    pub pathname: String,
}

impl PageLocation {
    pub fn new(origin: impl Into<String>, pathname: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            pathname: pathname.into(),
        }
    }

    /// Where Keycloak should send the browser back to.
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.origin, self.pathname)
    }
}

/// `{logout_path}?redirectUri=..[&idTokenHint=..]`. An empty token counts as none.
pub fn build_logout_url(
    logout_path: &str,
    location: &PageLocation,
    id_token: Option<&str>,
) -> String {
    let mut url = format!(
        "{}?redirectUri={}",
        logout_path,
        encode_uri_component(&location.redirect_uri())
    );
    if let Some(token) = id_token.filter(|t| !t.is_empty()) {
        url.push_str("&idTokenHint=");
        url.push_str(&encode_uri_component(token));
    }
    url
}
