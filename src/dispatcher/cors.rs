use serde::Deserialize;

use super::core::HandlerResponse;

/// CORS response headers attached by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value of `access-control-allow-origin` (e.g. `*` or `https://example.com`)
    pub allow_origin: String,
    /// Value of `access-control-allow-methods`
    pub allow_methods: Vec<String>,
    /// Value of `access-control-allow-headers`
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            allow_headers: vec!["content-type".to_string()],
        }
    }
}

impl CorsConfig {
    /// Allow `origin` with the default method and header lists
    #[must_use]
    pub fn allow_origin(origin: impl Into<String>) -> Self {
        Self {
            allow_origin: origin.into(),
            ..Self::default()
        }
    }

    pub(crate) fn apply(&self, response: &mut HandlerResponse) {
        response.set_header("access-control-allow-origin", self.allow_origin.clone());
        if !self.allow_methods.is_empty() {
            response.set_header("access-control-allow-methods", self.allow_methods.join(", "));
        }
        if !self.allow_headers.is_empty() {
            response.set_header("access-control-allow-headers", self.allow_headers.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_headers() {
        let mut res = HandlerResponse::ok(serde_json::json!({}));
        CorsConfig::allow_origin("https://example.com").apply(&mut res);
        assert_eq!(
            res.get_header("Access-Control-Allow-Origin"),
            Some("https://example.com")
        );
        assert_eq!(
            res.get_header("access-control-allow-methods"),
            Some("GET, POST, PUT, DELETE, OPTIONS")
        );
    }

    #[test]
    fn test_empty_lists_are_omitted() {
        let cors = CorsConfig {
            allow_origin: "*".to_string(),
            allow_methods: vec![],
            allow_headers: vec![],
        };
        let mut res = HandlerResponse::no_content();
        cors.apply(&mut res);
        assert_eq!(res.headers.len(), 1);
    }
}
