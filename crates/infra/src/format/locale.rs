//! Locale profiles and the formatter built from them.

use std::collections::HashMap;

use std::fmt::Write as _;

use chrono::NaiveDate;
use chrono::format::{Item as FormatItem, StrftimeItems};
use rust_decimal::{Decimal, RoundingStrategy};

use prodmgr_catalog::{Item, Rateable, Review};

use super::{ItemFormatter, KEY_NO_REVIEWS, KEY_PRODUCT, KEY_REVIEW, fill};

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$1.99`
    Prefix,
    /// `1,99 ₽`
    Suffix,
}

/// Everything needed to render text for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleProfile {
    /// BCP 47 tag, e.g. `en-US`.
    pub tag: String,
    pub currency_symbol: String,
    pub symbol_position: SymbolPosition,
    pub decimal_separator: char,
    pub group_separator: char,
    /// `chrono` strftime pattern for short dates.
    pub date_pattern: String,
    pub messages: HashMap<String, String>,
}

fn messages(product: &str, review: &str, no_reviews: &str) -> HashMap<String, String> {
    HashMap::from([
        (KEY_PRODUCT.to_string(), product.to_string()),
        (KEY_REVIEW.to_string(), review.to_string()),
        (KEY_NO_REVIEWS.to_string(), no_reviews.to_string()),
    ])
}

impl LocaleProfile {
    /// True when every directive in `date_pattern` is one `chrono` understands.
    pub fn has_valid_date_pattern(&self) -> bool {
        !StrftimeItems::new(&self.date_pattern).any(|item| matches!(item, FormatItem::Error))
    }

    pub fn en_us() -> Self {
        Self {
            tag: "en-US".to_string(),
            currency_symbol: "$".to_string(),
            symbol_position: SymbolPosition::Prefix,
            decimal_separator: '.',
            group_separator: ',',
            date_pattern: "%-m/%-d/%y".to_string(),
            messages: messages(
                "{0}, Price: {1}, Rating: {2}, Best Before: {3}",
                "Review: {0}\t{1}",
                "Not reviewed",
            ),
        }
    }

    pub fn en_gb() -> Self {
        Self {
            tag: "en-GB".to_string(),
            currency_symbol: "£".to_string(),
            date_pattern: "%d/%m/%Y".to_string(),
            ..Self::en_us()
        }
    }

    pub fn ru_ru() -> Self {
        Self {
            tag: "ru-RU".to_string(),
            currency_symbol: "₽".to_string(),
            symbol_position: SymbolPosition::Suffix,
            decimal_separator: ',',
            group_separator: '\u{a0}',
            date_pattern: "%d.%m.%Y".to_string(),
            messages: messages(
                "{0}, Цена: {1}, Рейтинг: {2}, Годен до: {3}",
                "Отзыв: {0}\t{1}",
                "Нет отзывов",
            ),
        }
    }

    pub fn zh_cn() -> Self {
        Self {
            tag: "zh-CN".to_string(),
            currency_symbol: "¥".to_string(),
            symbol_position: SymbolPosition::Prefix,
            decimal_separator: '.',
            group_separator: ',',
            date_pattern: "%Y/%-m/%-d".to_string(),
            messages: messages(
                "{0}，价格：{1}，评分：{2}，最佳食用日期：{3}",
                "评价：{0}\t{1}",
                "暂无评价",
            ),
        }
    }
}

/// [`ItemFormatter`] driven by a [`LocaleProfile`].
#[derive(Debug, Clone)]
pub struct LocaleFormatter {
    profile: LocaleProfile,
}

impl LocaleFormatter {
    pub fn new(profile: LocaleProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &LocaleProfile {
        &self.profile
    }

    fn message<'a>(&'a self, key: &'a str) -> &'a str {
        match self.profile.messages.get(key) {
            Some(m) => m,
            None => {
                tracing::debug!(locale = %self.profile.tag, key, "missing message");
                key
            }
        }
    }

    fn group_digits(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3 * 2);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.profile.group_separator);
            }
            out.push(ch);
        }
        out
    }
}

impl ItemFormatter for LocaleFormatter {
    fn locale(&self) -> &str {
        &self.profile.tag
    }

    fn format_item(&self, item: &Item, today: NaiveDate) -> String {
        fill(
            self.message(KEY_PRODUCT),
            &[
                item.name(),
                &self.format_money(item.price()),
                item.rating().stars(),
                &self.format_date(item.best_before(today)),
            ],
        )
    }

    fn format_review(&self, review: &Review) -> String {
        fill(
            self.message(KEY_REVIEW),
            &[review.rating().stars(), review.comment()],
        )
    }

    fn text(&self, key: &str) -> String {
        self.message(key).to_string()
    }

    fn format_money(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded < Decimal::ZERO;
        let mut abs = rounded.abs();
        abs.rescale(2);
        let plain = abs.to_string();
        let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let number = format!(
            "{}{}{}",
            self.group_digits(whole),
            self.profile.decimal_separator,
            fraction
        );
        let sign = if negative { "-" } else { "" };
        match self.profile.symbol_position {
            SymbolPosition::Prefix => format!("{sign}{}{number}", self.profile.currency_symbol),
            SymbolPosition::Suffix => format!("{sign}{number}\u{a0}{}", self.profile.currency_symbol),
        }
    }

    /// Falls back to ISO 8601 when the pattern cannot render `date`.
    fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.profile.date_pattern)).is_err() {
            tracing::debug!(locale = %self.profile.tag, pattern = %self.profile.date_pattern, "bad date pattern");
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodmgr_catalog::{ItemVariant, Rating};
    use prodmgr_core::ItemId;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn tea() -> Item {
        Item::new(ItemId::new(101), "Tea", Decimal::new(199, 2), ItemVariant::Durable)
            .unwrap()
            .apply_rating(Rating::FourStar)
    }

    #[test]
    fn money_per_locale() {
        let amount = Decimal::new(123_456_789, 2);
        assert_eq!(LocaleFormatter::new(LocaleProfile::en_us()).format_money(amount), "$1,234,567.89");
        assert_eq!(LocaleFormatter::new(LocaleProfile::en_gb()).format_money(amount), "£1,234,567.89");
        assert_eq!(
            LocaleFormatter::new(LocaleProfile::ru_ru()).format_money(amount),
            "1\u{a0}234\u{a0}567,89\u{a0}₽"
        );
        assert_eq!(LocaleFormatter::new(LocaleProfile::zh_cn()).format_money(amount), "¥1,234,567.89");
    }

    #[test]
    fn money_rounds_and_pads() {
        let us = LocaleFormatter::new(LocaleProfile::en_us());
        assert_eq!(us.format_money(Decimal::new(5995, 4)), "$0.60");
        assert_eq!(us.format_money(Decimal::ZERO), "$0.00");
        assert_eq!(us.format_money(Decimal::new(2, 0)), "$2.00");
        assert_eq!(us.format_money(Decimal::new(-150, 2)), "-$1.50");
        assert_eq!(us.format_money(Decimal::new(100_000, 2)), "$1,000.00");
        assert_eq!(us.format_money(Decimal::new(99_999, 2)), "$999.99");
    }

    #[test]
    fn dates_per_locale() {
        assert_eq!(LocaleFormatter::new(LocaleProfile::en_us()).format_date(day()), "3/5/24");
        assert_eq!(LocaleFormatter::new(LocaleProfile::en_gb()).format_date(day()), "05/03/2024");
        assert_eq!(LocaleFormatter::new(LocaleProfile::ru_ru()).format_date(day()), "05.03.2024");
        assert_eq!(LocaleFormatter::new(LocaleProfile::zh_cn()).format_date(day()), "2024/3/5");
    }

    #[test]
    fn bad_pattern_renders_iso_date_instead_of_panicking() {
        let mut profile = LocaleProfile::en_us();
        profile.date_pattern = "%Q".to_string();
        let formatter = LocaleFormatter::new(profile);

        assert_eq!(formatter.format_date(day()), "2024-03-05");
        assert_eq!(
            formatter.format_item(&tea(), day()),
            "Tea, Price: $1.99, Rating: ★★★★☆, Best Before: 2024-03-05"
        );
    }

    #[test]
    fn item_line() {
        let us = LocaleFormatter::new(LocaleProfile::en_us());
        assert_eq!(
            us.format_item(&tea(), day()),
            "Tea, Price: $1.99, Rating: ★★★★☆, Best Before: 3/5/24"
        );
    }

    #[test]
    fn review_line() {
        let ru = LocaleFormatter::new(LocaleProfile::ru_ru());
        let review = Review::new(Rating::FiveStar, "Wow!");
        assert_eq!(ru.format_review(&review), "Отзыв: ★★★★★\tWow!");
    }

    #[test]
    fn missing_message_renders_key() {
        let us = LocaleFormatter::new(LocaleProfile::en_us());
        assert_eq!(us.text("no.such.key"), "no.such.key");
        assert_eq!(us.text(KEY_NO_REVIEWS), "Not reviewed");
    }
}
