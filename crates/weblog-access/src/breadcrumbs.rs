//! Breadcrumb trail for a log path

use weblog_core::{escape_url_path, BreadcrumbSegment, BREADCRUMB_ROOT};

/// Build the trail for `dir`: the root crumb, then one crumb per path
/// component with the cumulative path as its URL. When `is_log` is set only
/// the final crumb is marked as the log file.
pub fn build(dir: &str, is_log: bool) -> Vec<BreadcrumbSegment> {
    let parts: Vec<&str> = dir.split('/').filter(|part| !part.is_empty()).collect();

    let mut crumbs = Vec::with_capacity(parts.len() + 1);
    crumbs.push(BreadcrumbSegment {
        text: BREADCRUMB_ROOT.to_string(),
        url: String::new(),
        is_log: false,
    });

    let mut url = String::new();
    for (i, part) in parts.iter().enumerate() {
        if !url.is_empty() {
            url.push('/');
        }
        url.push_str(&escape_url_path(part));

        crumbs.push(BreadcrumbSegment {
            text: part.to_string(),
            url: url.clone(),
            is_log: is_log && i + 1 == parts.len(),
        });
    }

    crumbs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_only() {
        let crumbs = build("", false);
        assert_eq!(crumbs.len(), 1);
        assert_eq!(crumbs[0].text, "logs");
        assert_eq!(crumbs[0].url, "");
        assert!(!crumbs[0].is_log);
    }

    #[test]
    fn test_cumulative_urls() {
        let crumbs = build("libera/#rust/2024-01-01.log", false);
        let urls: Vec<&str> = crumbs.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["", "libera", "libera/%23rust", "libera/%23rust/2024-01-01.log"]
        );
        assert_eq!(crumbs[2].text, "#rust");
        assert!(crumbs.iter().all(|c| !c.is_log));
    }

    #[test]
    fn test_only_last_flagged_for_log() {
        let crumbs = build("a/b/c.log", true);
        let flags: Vec<bool> = crumbs.iter().map(|c| c.is_log).collect();
        assert_eq!(flags, vec![false, false, false, true]);
    }

    #[test]
    fn test_escapes_hash() {
        let crumbs = build("sub#dir/file.log", true);
        assert_eq!(crumbs[1].url, "sub%23dir");
        assert_eq!(crumbs[2].url, "sub%23dir/file.log");
        assert!(crumbs[2].is_log);
    }
}
