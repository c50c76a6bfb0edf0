//! User profile presentation
//!
//! Turns a wallet address and an optional social username into something a
//! human wants to look at.

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// Avatar generation service used when nothing better is known
pub const DEFAULT_AVATAR_SERVICE: &str = "https://api.dicebear.com/7.x";

/// Avatar style for username seeds
const USERNAME_AVATAR_STYLE: &str = "avataaars";

/// Avatar style for address seeds
const ADDRESS_AVATAR_STYLE: &str = "identicon";

/// Display-ready view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub address: String,
    pub username: Option<String>,
    pub avatar_url: String,
    pub display_name: String,
}

/// Shorten an address to first 6 + "..." + last 4 characters
pub fn format_address(address: &str) -> String {
    shorten(address, 6, 4)
}

/// Longer form used on the secondary address line: first 10 + last 8
pub fn format_address_long(address: &str) -> String {
    shorten(address, 10, 8)
}

fn shorten(value: &str, head: usize, tail: usize) -> String {
    if value.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    let start: String = chars.iter().take(head).collect();
    let end: String = chars[chars.len().saturating_sub(tail)..].iter().collect();
    format!("{}...{}", start, end)
}

/// "@username" when a username is known, the short address otherwise
pub fn display_name(address: &str, username: Option<&str>) -> String {
    match non_empty(username) {
        Some(name) => format!("@{}", name),
        None => format_address(address),
    }
}

fn non_empty(username: Option<&str>) -> Option<&str> {
    username.filter(|u| !u.is_empty())
}

/// Builds deterministic avatar URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePresenter {
    avatar_service: Url,
}

impl ProfilePresenter {
    pub fn new(avatar_service: &str) -> Result<Self> {
        let url = Url::parse(avatar_service)
            .map_err(|e| Error::Config(format!("Invalid avatar service URL: {}", e)))?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Avatar service URL cannot have paths: {}",
                avatar_service
            )));
        }
        Ok(Self {
            avatar_service: url,
        })
    }

    /// Avatar for a username or, failing that, the raw address
    pub fn avatar_url(&self, address: &str, username: Option<&str>) -> String {
        match non_empty(username) {
            Some(name) => self.avatar(USERNAME_AVATAR_STYLE, name),
            None => self.avatar(ADDRESS_AVATAR_STYLE, address),
        }
    }

    fn avatar(&self, style: &str, seed: &str) -> String {
        let mut url = self.avatar_service.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(style).push("svg");
        }
        url.query_pairs_mut().clear().append_pair("seed", seed);
        url.to_string()
    }

    /// Derive the full profile; pure, same inputs give the same output
    pub fn derive(&self, address: &str, username: Option<&str>) -> UserProfile {
        UserProfile {
            address: address.to_string(),
            username: non_empty(username).map(str::to_string),
            avatar_url: self.avatar_url(address, username),
            display_name: display_name(address, username),
        }
    }
}

impl Default for ProfilePresenter {
    fn default() -> Self {
        Self {
            avatar_service: Url::parse(DEFAULT_AVATAR_SERVICE)
                .expect("default avatar service URL is valid"),
        }
    }
}

/// Derive a profile with the default avatar service
pub fn derive_profile(address: &str, username: Option<&str>) -> UserProfile {
    ProfilePresenter::default().derive(address, username)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0xABCDEF1234567890ABCDEF1234567890ABCDEF12";

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(ADDRESS), "0xABCD...EF12");
        assert_eq!(format_address(ADDRESS), format_address(ADDRESS));
        assert_eq!(format_address(""), "");
        assert_eq!(format_address("0x12"), "0x12...0x12");
    }

    #[test]
    fn test_format_address_long() {
        assert_eq!(format_address_long(ADDRESS), "0xABCDEF12...ABCDEF12");
    }

    #[test]
    fn test_profile_without_username() {
        let profile = derive_profile(ADDRESS, None);
        assert_eq!(profile.display_name, "0xABCD...EF12");
        assert_eq!(
            profile.avatar_url,
            format!("https://api.dicebear.com/7.x/identicon/svg?seed={}", ADDRESS)
        );
        assert!(profile.username.is_none());
    }

    #[test]
    fn test_profile_with_username() {
        let profile = derive_profile(ADDRESS, Some("alice"));
        assert_eq!(profile.display_name, "@alice");
        assert_eq!(
            profile.avatar_url,
            "https://api.dicebear.com/7.x/avataaars/svg?seed=alice"
        );

        // Address does not matter once a username is known
        let other = derive_profile("0x0000000000000000000000000000000000000001", Some("alice"));
        assert_eq!(other.display_name, profile.display_name);
        assert_eq!(other.avatar_url, profile.avatar_url);
    }

    #[test]
    fn test_empty_username_is_absent() {
        let profile = derive_profile(ADDRESS, Some(""));
        assert!(!profile.display_name.starts_with('@'));
        assert!(profile.username.is_none());
    }

    #[test]
    fn test_derive_is_pure() {
        for username in [None, Some("bob"), Some("")] {
            let a = derive_profile(ADDRESS, username);
            let b = derive_profile(ADDRESS, username);
            assert_eq!(a, b);
            assert_eq!(
                a.display_name.starts_with('@'),
                username.map_or(false, |u| !u.is_empty())
            );
        }
    }

    #[test]
    fn test_custom_service_with_trailing_slash() {
        let presenter = ProfilePresenter::new("https://avatars.example.com/v2/").unwrap();
        assert_eq!(
            presenter.avatar_url(ADDRESS, Some("carol")),
            "https://avatars.example.com/v2/avataaars/svg?seed=carol"
        );
        assert!(ProfilePresenter::new("not a url").is_err());
    }
}
