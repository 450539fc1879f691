//! Formatting collaborator: turns items, reviews and amounts into localized text.
//!
//! The catalog never builds user-facing text itself; it hands values to an
//! [`ItemFormatter`] picked from a [`FormatterRegistry`] by locale tag.

pub mod locale;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use prodmgr_catalog::{Item, Review};

pub use locale::{LocaleFormatter, LocaleProfile, SymbolPosition};

/// Message key of the item line template.
pub const KEY_PRODUCT: &str = "product";
/// Message key of the review line template.
pub const KEY_REVIEW: &str = "review";
/// Message key shown when an item has no reviews.
pub const KEY_NO_REVIEWS: &str = "no.reviews";

pub trait ItemFormatter: Send + Sync {
    /// Locale tag this formatter renders for.
    fn locale(&self) -> &str;

    /// One line describing `item`; `today` stands in for a durable's best-before date.
    fn format_item(&self, item: &Item, today: NaiveDate) -> String;

    fn format_review(&self, review: &Review) -> String;

    /// Localized message for `key`. Unknown keys render as the key itself.
    fn text(&self, key: &str) -> String;

    fn format_money(&self, amount: Decimal) -> String;

    fn format_date(&self, date: NaiveDate) -> String;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("default locale {0:?} has no profile")]
    MissingDefault(String),

    #[error("locale {tag:?} has an invalid date pattern {pattern:?}")]
    InvalidDatePattern { tag: String, pattern: String },
}

/// Locale tag -> formatter table, built once from configuration.
#[derive(Clone)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<LocaleFormatter>>,
    default_tag: String,
}

impl core::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("locales", &self.supported_locales())
            .field("default_tag", &self.default_tag)
            .finish()
    }
}

impl FormatterRegistry {
    /// Build from a tag -> profile mapping. `default_tag` must be one of the keys.
    pub fn new(
        profiles: HashMap<String, LocaleProfile>,
        default_tag: impl Into<String>,
    ) -> Result<Self, FormatError> {
        let default_tag = normalize(&default_tag.into());
        for profile in profiles.values() {
            if !profile.has_valid_date_pattern() {
                return Err(FormatError::InvalidDatePattern {
                    tag: profile.tag.clone(),
                    pattern: profile.date_pattern.clone(),
                });
            }
        }
        let formatters: HashMap<String, Arc<LocaleFormatter>> = profiles
            .into_iter()
            .map(|(tag, profile)| (normalize(&tag), Arc::new(LocaleFormatter::new(profile))))
            .collect();

        if !formatters.contains_key(&default_tag) {
            return Err(FormatError::MissingDefault(default_tag));
        }

        Ok(Self {
            formatters,
            default_tag,
        })
    }

    /// `en-US`, `en-GB`, `ru-RU` and `zh-CN`, defaulting to `ru-RU`.
    pub fn builtin() -> Self {
        let formatters = [
            LocaleProfile::en_us(),
            LocaleProfile::en_gb(),
            LocaleProfile::ru_ru(),
            LocaleProfile::zh_cn(),
        ]
        .into_iter()
        .map(|p| (normalize(&p.tag), Arc::new(LocaleFormatter::new(p))))
        .collect();

        Self {
            formatters,
            default_tag: normalize("ru-RU"),
        }
    }

    /// Formatter for `tag`, or the default one when `tag` is not supported.
    /// Tags compare case-insensitively.
    pub fn resolve(&self, tag: &str) -> Arc<dyn ItemFormatter> {
        match self.formatters.get(&normalize(tag)) {
            Some(f) => f.clone(),
            None => {
                tracing::debug!(requested = tag, fallback = %self.default_tag, "unsupported locale");
                self.default_formatter()
            }
        }
    }

    /// Tag of the fallback formatter.
    pub fn default_tag(&self) -> &str {
        self.formatters[&self.default_tag].locale()
    }

    /// Supported tags, sorted.
    pub fn supported_locales(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .formatters
            .values()
            .map(|f| f.locale().to_string())
            .collect();
        tags.sort();
        tags
    }

    fn default_formatter(&self) -> Arc<LocaleFormatter> {
        // Presence is checked in `new`.
        self.formatters[&self.default_tag].clone()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// Fill `{0}`, `{1}`, ... placeholders in a single pass. Placeholders without a
/// matching argument, and braces that are not placeholders, are kept verbatim;
/// text coming from arguments is never re-scanned.
pub fn fill(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
