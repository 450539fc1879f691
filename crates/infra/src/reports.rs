//! Query/report façade over a [`CatalogStore`].
//!
//! Every method is a single store read followed by formatting, so the façade
//! adds no state and needs no locking of its own.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use prodmgr_catalog::{Item, Rating};
use prodmgr_core::{CatalogResult, ItemId};

use crate::clock::Clock;
use crate::format::{FormatterRegistry, ItemFormatter, KEY_NO_REVIEWS};
use crate::persistence::{PersistenceError, ReportSink};
use crate::store::CatalogStore;

#[derive(Clone)]
pub struct CatalogReports<S> {
    store: S,
    formatter: Arc<dyn ItemFormatter>,
    clock: Arc<dyn Clock>,
}

impl<S> core::fmt::Debug for CatalogReports<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogReports")
            .field("locale", &self.formatter.locale())
            .finish_non_exhaustive()
    }
}

impl<S> CatalogReports<S>
where
    S: CatalogStore,
{
    pub fn new(store: S, formatter: Arc<dyn ItemFormatter>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            formatter,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn locale(&self) -> &str {
        self.formatter.locale()
    }

    /// Same store and clock, formatter for `tag` (or the registry default).
    pub fn with_locale(&self, registry: &FormatterRegistry, tag: &str) -> Self
    where
        S: Clone,
    {
        Self {
            store: self.store.clone(),
            formatter: registry.resolve(tag),
            clock: self.clock.clone(),
        }
    }

    /// Item line followed by one line per review (or the "no reviews" text).
    pub fn report_for(&self, id: ItemId) -> CatalogResult<String> {
        let (item, reviews) = self.store.find_with_reviews(id)?;

        let mut out = self.formatter.format_item(&item, self.clock.today());
        out.push('\n');
        if reviews.is_empty() {
            out.push_str(&self.formatter.text(KEY_NO_REVIEWS));
            out.push('\n');
        } else {
            for review in &reviews {
                out.push_str(&self.formatter.format_review(review));
                out.push('\n');
            }
        }
        Ok(out)
    }

    pub fn list_filtered<F, O>(&self, filter: F, order: O) -> Vec<Item>
    where
        F: Fn(&Item) -> bool,
        O: Fn(&Item, &Item) -> Ordering,
    {
        self.store.snapshot(&filter, &order)
    }

    /// [`list_filtered`](Self::list_filtered), one formatted line per item.
    pub fn render_list<F, O>(&self, filter: F, order: O) -> String
    where
        F: Fn(&Item) -> bool,
        O: Fn(&Item, &Item) -> Ordering,
    {
        let today = self.clock.today();
        self.list_filtered(filter, order)
            .iter()
            .map(|item| self.formatter.format_item(item, today))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Discount totals by rating, as numbers.
    pub fn discount_totals(&self) -> BTreeMap<Rating, rust_decimal::Decimal> {
        self.store.discount_totals(self.clock.today())
    }

    /// Discount totals keyed by star label, formatted as money.
    pub fn discounts_by_label(&self) -> BTreeMap<String, String> {
        self.discount_totals()
            .into_iter()
            .map(|(rating, total)| (rating.stars().to_string(), self.formatter.format_money(total)))
            .collect()
    }

    /// Render the report for `id` and hand it to `sink`.
    pub fn write_report(&self, id: ItemId, sink: &dyn ReportSink) -> Result<(), PersistenceError> {
        let text = self.report_for(id)?;
        sink.write_report(id, &text)
    }

    /// [`write_report`](Self::write_report) that logs failures instead of
    /// returning them, so one bad id does not stop a batch. Returns whether the
    /// report was written.
    pub fn print_report(&self, id: ItemId, sink: &dyn ReportSink) -> bool {
        match self.write_report(id, sink) {
            Ok(()) => {
                info!(item_id = %id, "report written");
                true
            }
            Err(PersistenceError::Catalog(e)) => {
                info!(item_id = %id, error = %e, "report skipped");
                false
            }
            Err(e) => {
                warn!(item_id = %id, error = %e, "report failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use prodmgr_catalog::ItemVariant;
    use prodmgr_core::CatalogError;
    use rust_decimal::Decimal;

    use crate::clock::FixedClock;
    use crate::persistence::InMemoryReportSink;
    use crate::store::InMemoryCatalogStore;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn reports() -> CatalogReports<Arc<InMemoryCatalogStore>> {
        let registry = FormatterRegistry::builtin();
        CatalogReports::new(
            Arc::new(InMemoryCatalogStore::new()),
            registry.resolve("en-US"),
            Arc::new(FixedClock(day())),
        )
    }

    fn add(reports: &CatalogReports<Arc<InMemoryCatalogStore>>, id: u32, name: &str, cents: i64) {
        reports
            .store()
            .create_item(ItemId::new(id), name, Decimal::new(cents, 2), ItemVariant::Durable)
            .unwrap();
    }

    #[test]
    fn report_lists_reviews_in_order() {
        let reports = reports();
        add(&reports, 101, "Tea", 199);
        let store = reports.store();
        store.submit_review(ItemId::new(101), Rating::FourStar, "Nice").unwrap();
        store.submit_review(ItemId::new(101), Rating::FiveStar, "Wow").unwrap();

        let text = reports.report_for(ItemId::new(101)).unwrap();
        assert_eq!(
            text,
            "Tea, Price: $1.99, Rating: ★★★★★, Best Before: 3/15/24\n\
             Review: ★★★★☆\tNice\n\
             Review: ★★★★★\tWow\n"
        );
    }

    #[test]
    fn report_without_reviews_says_so() {
        let reports = reports();
        add(&reports, 7, "Water", 100);
        let text = reports.report_for(ItemId::new(7)).unwrap();
        assert!(text.ends_with("Not reviewed\n"));
    }

    #[test]
    fn report_for_missing_item_fails() {
        let reports = reports();
        assert_eq!(
            reports.report_for(ItemId::new(42)).unwrap_err(),
            CatalogError::ItemNotFound(ItemId::new(42))
        );
    }

    #[test]
    fn with_locale_shares_the_store() {
        let reports = reports();
        add(&reports, 1, "Tea", 199);
        let russian = reports.with_locale(&FormatterRegistry::builtin(), "ru-RU");
        assert_eq!(russian.locale(), "ru-RU");
        let text = russian.report_for(ItemId::new(1)).unwrap();
        assert!(text.contains("1,99\u{a0}₽"));
        assert!(text.contains("Нет отзывов"));
    }

    #[test]
    fn render_list_filters_and_orders() {
        let reports = reports();
        add(&reports, 1, "Tea", 199);
        add(&reports, 2, "Coffee", 299);
        add(&reports, 3, "Cake", 599);

        let listing = reports.render_list(
            |i| i.price() > Decimal::new(2, 0),
            |a, b| b.price().cmp(&a.price()),
        );
        let names: Vec<&str> = listing
            .lines()
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(names, ["Cake", "Coffee"]);
    }

    #[test]
    fn discounts_keyed_by_star_label() {
        let reports = reports();
        add(&reports, 1, "Tea", 199);
        add(&reports, 2, "Coffee", 299);
        reports
            .store()
            .submit_review(ItemId::new(1), Rating::FiveStar, "")
            .unwrap();

        let discounts = reports.discounts_by_label();
        assert_eq!(discounts.get("★★★★★").map(String::as_str), Some("$0.20"));
        assert_eq!(discounts.get("☆☆☆☆☆").map(String::as_str), Some("$0.30"));
    }

    #[test]
    fn print_report_logs_and_continues() {
        let reports = reports();
        add(&reports, 1, "Tea", 199);
        let sink = InMemoryReportSink::new();

        assert!(!reports.print_report(ItemId::new(42), &sink));
        assert!(reports.print_report(ItemId::new(1), &sink));
        assert_eq!(sink.len(), 1);
        assert!(sink.report(ItemId::new(1)).unwrap().starts_with("Tea"));
    }

    #[test]
    fn write_report_propagates_missing_item() {
        let reports = reports();
        let sink = InMemoryReportSink::new();
        let err = reports.write_report(ItemId::new(9), &sink).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Catalog(CatalogError::ItemNotFound(_))
        ));
        assert!(sink.is_empty());
    }
}
