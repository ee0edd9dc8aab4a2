//! Client-side search and status filtering for list pages.
//!
//! A record is visible when it passes the page's status predicate AND the
//! text search. Both predicates are pure, so filtering is idempotent and the
//! order in which they are applied does not matter.

use std::str::FromStr;

use crate::models::{Shop, User};

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

/// Fields a page searches, in display order. `None` entries never match.
pub trait Searchable {
    fn search_fields(&self) -> Vec<Option<&str>>;
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.username.as_deref(), Some(&self.email), Some(&self.firstname), Some(&self.lastname)]
    }
}

impl Searchable for Shop {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.name.as_deref(), Some(&self.email), Some(&self.address)]
    }
}

/// A fixed per-page status predicate.
pub trait StatusFilter<T>: Copy + Default {
    fn matches(self, item: &T) -> bool;
}

/// Case-insensitive substring match against any searchable field. An empty
/// term matches everything.
pub fn matches_search<T: Searchable>(item: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    item.search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records passing `status` and `term`, in source order.
pub fn apply<'a, T, F>(items: &'a [T], status: F, term: &str) -> Vec<&'a T>
where
    T: Searchable,
    F: StatusFilter<T>,
{
    items
        .iter()
        .filter(|item| status.matches(item) && matches_search(*item, term))
        .collect()
}

#[derive(Debug, thiserror::Error)]
#[error("unknown filter '{value}', expected one of: {expected}")]
pub struct ParseFilterError {
    value: String,
    expected: &'static str,
}

macro_rules! status_filter {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseFilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL.iter().copied().find(|f| f.as_str() == wanted).ok_or_else(|| ParseFilterError {
                    value: s.to_string(),
                    expected: concat!($($text, " "),+),
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_filter! {
    /// Users page: everyone, streamers, or regular users.
    RoleFilter { All => "all", Streamer => "streamer", User => "user" }
}

status_filter! {
    /// Streamers page: by verification state.
    VerificationFilter { All => "all", Verified => "verified", Pending => "pending" }
}

status_filter! {
    /// Shops page: by activation state.
    ShopStatusFilter { All => "all", Active => "active", Inactive => "inactive" }
}

impl StatusFilter<User> for RoleFilter {
    fn matches(self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Streamer => user.is_streamer,
            Self::User => !user.is_streamer,
        }
    }
}

impl StatusFilter<User> for VerificationFilter {
    fn matches(self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Verified => user.is_verified,
            Self::Pending => !user.is_verified,
        }
    }
}

impl StatusFilter<Shop> for ShopStatusFilter {
    fn matches(self, shop: &Shop) -> bool {
        match self {
            Self::All => true,
            Self::Active => shop.is_active,
            Self::Inactive => !shop.is_active,
        }
    }
}
