//! GitHub repository slug normalization.

use url::Url;

/// Normalize a repository reference to `owner/repo`.
///
/// Accepts full URLs (`https://github.com/owner/repo/tree/main`), host-prefixed
/// paths (`github.com/owner/repo`) and bare slugs. Trailing `.git` is dropped.
/// Returns `None` when fewer than two path segments remain.
pub fn github_slug(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let segments: Vec<String> = match Url::parse(value) {
        Ok(url) if url.has_host() => url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).map(String::from).collect())
            .unwrap_or_default(),
        _ => {
            let mut segs: Vec<String> = value
                .split(['?', '#'])
                .next()
                .unwrap_or("")
                .split('/')
                .filter(|seg| !seg.is_empty())
                .map(String::from)
                .collect();
            if segs.len() > 2 && segs[0].contains('.') {
                segs.remove(0);
            }
            segs
        }
    };

    if segments.len() < 2 {
        return None;
    }
    let owner = &segments[0];
    let repo = segments[1].strip_suffix(".git").unwrap_or(&segments[1]);
    if repo.is_empty() {
        return None;
    }
    Some(format!("{owner}/{repo}"))
}
