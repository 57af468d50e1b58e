//! Window feature string parsing.
//!
//! Script passes features as `"location=no,zoom=no,hidden=yes"`. Only the
//! literal value `no` turns a flag off; any other value turns it on. Keys
//! that are not mentioned keep their defaults and unknown keys are ignored.

use std::collections::HashMap;

pub const LOCATION: &str = "location";
pub const ZOOM: &str = "zoom";
pub const HIDDEN: &str = "hidden";
pub const HARDWARE_BACK_BUTTON: &str = "hardwareback";
pub const CLEAR_ALL_CACHE: &str = "clearcache";
pub const CLEAR_SESSION_CACHE: &str = "clearsessioncache";

/// How the bridge encodes an absent optional argument.
pub const NULL: &str = "null";

/// Which cookies to purge before the first load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    Keep,
    ClearAll,
    ClearSession,
}

/// Per-session behaviour flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlags {
    pub show_location_bar: bool,
    pub zoom_controls: bool,
    pub open_hidden: bool,
    pub hardware_back: bool,
    pub cache: CachePolicy,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            show_location_bar: true,
            zoom_controls: true,
            open_hidden: false,
            hardware_back: true,
            cache: CachePolicy::Keep,
        }
    }
}

impl FeatureFlags {
    /// Parse a raw feature string into flags.
    pub fn parse(raw: &str) -> Self {
        Self::from_map(parse_feature_map(raw).as_ref())
    }

    /// Build flags from a parsed key map, starting from the defaults.
    ///
    /// `clearcache` takes precedence: `clearsessioncache` is only consulted
    /// when `clearcache` is absent.
    pub fn from_map(map: Option<&HashMap<String, bool>>) -> Self {
        let mut flags = Self::default();
        let Some(map) = map else {
            return flags;
        };

        if let Some(&show) = map.get(LOCATION) {
            flags.show_location_bar = show;
        }
        if let Some(&zoom) = map.get(ZOOM) {
            flags.zoom_controls = zoom;
        }
        if let Some(&hidden) = map.get(HIDDEN) {
            flags.open_hidden = hidden;
        }
        if let Some(&back) = map.get(HARDWARE_BACK_BUTTON) {
            flags.hardware_back = back;
        }

        flags.cache = match (map.get(CLEAR_ALL_CACHE), map.get(CLEAR_SESSION_CACHE)) {
            (Some(true), _) => CachePolicy::ClearAll,
            (Some(false), _) => CachePolicy::Keep,
            (None, Some(true)) => CachePolicy::ClearSession,
            (None, _) => CachePolicy::Keep,
        };

        flags
    }
}

/// Split a feature string into `key -> enabled` pairs.
///
/// Returns `None` for the bridge's `"null"` marker. Empty tokens are skipped
/// and a bare `key` without `=` counts as enabled.
pub fn parse_feature_map(raw: &str) -> Option<HashMap<String, bool>> {
    if raw == NULL {
        return None;
    }

    let map = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let (key, value) = token.split_once('=').unwrap_or((token, ""));
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim() != "no"))
        })
        .collect();

    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_gives_defaults() {
        assert_eq!(FeatureFlags::parse(""), FeatureFlags::default());
    }

    #[test]
    fn null_marker_gives_defaults() {
        assert!(parse_feature_map("null").is_none());
        assert_eq!(FeatureFlags::parse("null"), FeatureFlags::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let flags = FeatureFlags::parse("location=no,foo=bar");
        assert!(!flags.show_location_bar);
        assert!(flags.zoom_controls);
        assert!(!flags.open_hidden);
        assert!(flags.hardware_back);
        assert_eq!(flags.cache, CachePolicy::Keep);
    }

    #[test]
    fn order_does_not_matter() {
        let a = FeatureFlags::parse("location=no,zoom=no,hidden=yes");
        let b = FeatureFlags::parse("hidden=yes,zoom=no,location=no");
        assert_eq!(a, b);
        assert!(a.open_hidden);
        assert!(!a.zoom_controls);
    }

    #[test]
    fn any_value_other_than_no_enables() {
        let flags = FeatureFlags::parse("hidden=1,hardwareback=no");
        assert!(flags.open_hidden);
        assert!(!flags.hardware_back);

        let flags = FeatureFlags::parse("hidden");
        assert!(flags.open_hidden);
    }

    #[test]
    fn value_comparison_is_case_sensitive() {
        let flags = FeatureFlags::parse("location=NO");
        assert!(flags.show_location_bar);
    }

    #[test]
    fn clearcache_wins_over_session_cache() {
        let flags = FeatureFlags::parse("clearsessioncache=yes,clearcache=yes");
        assert_eq!(flags.cache, CachePolicy::ClearAll);

        // Present but disabled still suppresses the session flag.
        let flags = FeatureFlags::parse("clearcache=no,clearsessioncache=yes");
        assert_eq!(flags.cache, CachePolicy::Keep);
    }

    #[test]
    fn session_cache_applies_without_clearcache() {
        let flags = FeatureFlags::parse("clearsessioncache=yes");
        assert_eq!(flags.cache, CachePolicy::ClearSession);
    }

    #[test]
    fn tolerates_whitespace_and_empty_tokens() {
        let flags = FeatureFlags::parse(" location = no ,, zoom=no,");
        assert!(!flags.show_location_bar);
        assert!(!flags.zoom_controls);
    }
}
