//! In-app path building.

use crate::config::{RouteConfig, PAGE_ID_PLACEHOLDER};
use crate::types::{AppMode, Params};

/// Serialize `params` into `?k1=v1&k2=v2`, in map order.
///
/// Entries with an empty key or value are dropped. Keys and values are
/// percent-encoded. Returns an empty string when nothing remains.
pub fn query_string(params: &Params) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect();
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Canonical in-app path for `page_id` under the given mode.
pub fn build_path(routes: &RouteConfig, mode: AppMode, page_id: &str, params: &Params) -> String {
    let template = match mode {
        AppMode::Edit => &routes.edit_path,
        AppMode::View => &routes.view_path,
    };
    let base = template.replace(PAGE_ID_PLACEHOLDER, &urlencoding::encode(page_id));
    format!("{base}{}", query_string(params))
}
