//! Query-string helpers shared by the product and listing pages.

use url::form_urlencoded;

/// Decoded `name=value` pairs in request order.
#[must_use]
pub fn parse(query: Option<&str>) -> Vec<(String, String)> {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

/// Unicode case-insensitive equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// `URLSearchParams.set` with case-insensitive names: overwrite the first
/// match, drop later ones, append when absent.
pub fn set(params: &mut Vec<(String, String)>, name: &str, value: &str) {
    let mut found = false;
    params.retain_mut(|(n, v)| {
        if !eq_ignore_case(n, name) {
            return true;
        }
        if found {
            return false;
        }
        found = true;
        *n = name.to_string();
        *v = value.to_string();
        true
    });
    if !found {
        params.push((name.to_string(), value.to_string()));
    }
}

/// Join a path and query pairs into a relative URL.
#[must_use]
pub fn location(path: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{path}?{query}")
}
