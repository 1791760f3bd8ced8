//! Breadcrumb trail construction.

use crate::types::Breadcrumb;

/// Builds cumulative navigation crumbs for each segment of `path`,
/// anchored at `base_url`.
pub fn breadcrumbs(path: &str, base_url: &str) -> Vec<Breadcrumb> {
    let mut crumbs = Vec::new();
    let mut href = base_url.trim_end_matches('/').to_string();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        href.push('/');
        href.push_str(&urlencoding::encode(segment));
        crumbs.push(Breadcrumb { name: segment.to_string(), url: href.clone() });
    }
    crumbs
}
