use cookie::Cookie;

/// Request-scoped cookie transport.
///
/// Reads come from the parsed inbound `Cookie` header; writes accumulate as
/// serialized `Set-Cookie` values for the eventual response. The two sides
/// are independent: a write is never visible to a subsequent read.
#[derive(Debug, Default)]
pub struct CookieTransport {
    inbound: Vec<(String, String)>,
    outbound: Vec<String>,
}

impl CookieTransport {
    pub fn from_header(header: Option<&str>) -> Self {
        let inbound = header
            .map(|raw| {
                Cookie::split_parse_encoded(raw.to_owned())
                    .filter_map(|parsed| parsed.ok())
                    .map(|c| (c.name().to_string(), c.value().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            inbound,
            outbound: Vec::new(),
        }
    }

    /// Value of an inbound cookie, if the request carried it
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inbound
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Queue a cookie for the response
    pub fn set(&mut self, cookie: Cookie<'_>) {
        self.outbound.push(cookie.encoded().to_string());
    }

    /// Accumulated `Set-Cookie` header values
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.outbound
    }

    pub fn into_set_cookie_headers(self) -> Vec<String> {
        self.outbound
    }
}
