//! Cached template renderings

use std::fmt;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::template::Template;

use super::context::PlaceholderContext;

/// A template bound to a binding, with its last rendered value
///
/// The value is refreshed lazily: an access after the context's
/// `max_update_interval` has elapsed re-renders, earlier accesses return the
/// cached value. A zero interval re-renders on every access. Otherwise a
/// rendering that matched only constant placeholders (or none) is never
/// refreshed.
pub struct ResolvedItem<T, V> {
    context: PlaceholderContext<T>,
    binder: T,
    template: V,
    latest: V,
    last_computed: Instant,
    constant: bool,
}

impl<T: fmt::Debug, V: fmt::Debug> fmt::Debug for ResolvedItem<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedItem")
            .field("binder", &self.binder)
            .field("template", &self.template)
            .field("latest", &self.latest)
            .field("last_computed", &self.last_computed)
            .field("constant", &self.constant)
            .finish()
    }
}

impl<T, V: Template> ResolvedItem<T, V> {
    pub(crate) fn new(context: PlaceholderContext<T>, binder: T, template: V) -> Self {
        Self::new_at(context, binder, template, Instant::now())
    }

    fn new_at(context: PlaceholderContext<T>, binder: T, template: V, now: Instant) -> Self {
        let (latest, report) = context.substitute_tracked(&binder, &template);
        Self {
            context,
            binder,
            template,
            latest,
            last_computed: now,
            constant: report.is_constant(),
        }
    }

    pub fn binder(&self) -> &T {
        &self.binder
    }

    pub fn template(&self) -> &V {
        &self.template
    }

    pub fn context(&self) -> &PlaceholderContext<T> {
        &self.context
    }

    /// The cached value, without checking staleness
    pub fn latest(&self) -> &V {
        &self.latest
    }

    pub fn last_computed(&self) -> Instant {
        self.last_computed
    }

    /// Whether the last rendering matched only constant placeholders (or none)
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Whether an access at `now` would re-render
    pub fn is_stale_at(&self, now: Instant) -> bool {
        let interval = self.context.max_update_interval();
        if interval.is_zero() {
            return true;
        }
        if self.constant {
            return false;
        }
        let elapsed: Duration = now.saturating_duration_since(self.last_computed);
        elapsed >= interval
    }

    /// The current value, re-rendered first if stale
    pub fn value(&mut self) -> &V {
        self.value_at(Instant::now())
    }

    /// The value as of `now`, re-rendered first if stale at that instant
    pub fn value_at(&mut self, now: Instant) -> &V {
        if self.is_stale_at(now) {
            self.recompute(now);
        }
        &self.latest
    }

    /// Re-render unconditionally
    pub fn force_update(&mut self) -> &V {
        self.recompute(Instant::now());
        &self.latest
    }

    fn recompute(&mut self, now: Instant) {
        let (latest, report) = self.context.substitute_tracked(&self.binder, &self.template);
        trace!(matched = report.matched, "re-rendered resolved item");
        self.latest = latest;
        self.last_computed = now;
        self.constant = report.is_constant();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextConfig;
    use crate::placeholder::Placeholder;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counter_context(interval: Duration, is_const: bool) -> PlaceholderContext<Arc<AtomicU32>> {
        let placeholder = Placeholder::literal("count", |n: &Arc<AtomicU32>, _| {
            n.load(Ordering::SeqCst).to_string()
        })
        .unwrap()
        .with_const(is_const);
        PlaceholderContext::new(
            vec![placeholder],
            &ContextConfig::default().with_max_update_interval(interval),
        )
    }

    #[test]
    fn test_fresh_value_is_cached() {
        let counter = Arc::new(AtomicU32::new(1));
        let ctx = counter_context(Duration::from_secs(5), false);
        let start = Instant::now();
        let mut item = ResolvedItem::new_at(ctx, counter.clone(), String::from("n=%count%"), start);

        counter.store(2, Ordering::SeqCst);
        assert_eq!(item.value_at(start + Duration::from_secs(4)), "n=1");
        assert_eq!(item.value_at(start + Duration::from_secs(5)), "n=2");
        assert_eq!(item.last_computed(), start + Duration::from_secs(5));
    }

    #[test]
    fn test_zero_interval_always_recomputes() {
        let counter = Arc::new(AtomicU32::new(1));
        let ctx = counter_context(Duration::ZERO, false);
        let start = Instant::now();
        let mut item = ResolvedItem::new_at(ctx, counter.clone(), String::from("%count%"), start);

        assert!(item.is_stale_at(start));
        counter.store(7, Ordering::SeqCst);
        assert_eq!(item.value_at(start), "7");
    }

    #[test]
    fn test_latest_does_not_refresh() {
        let counter = Arc::new(AtomicU32::new(1));
        let mut item = counter_context(Duration::ZERO, false)
            .create_item(counter.clone(), String::from("%count%"));

        counter.store(3, Ordering::SeqCst);
        assert_eq!(item.latest(), "1");
        assert_eq!(item.force_update(), "3");
    }

    #[test]
    fn test_constant_rendering_is_never_refreshed() {
        let counter = Arc::new(AtomicU32::new(1));
        let start = Instant::now();
        let mut item = ResolvedItem::new_at(
            counter_context(Duration::from_secs(5), true),
            counter.clone(),
            String::from("%count%"),
            start,
        );
        assert!(item.is_constant());

        counter.store(9, Ordering::SeqCst);
        assert!(!item.is_stale_at(start + Duration::from_secs(60)));
        assert_eq!(item.value_at(start + Duration::from_secs(60)), "1");
    }

    #[test]
    fn test_zero_interval_ignores_constant_folding() {
        let counter = Arc::new(AtomicU32::new(1));
        let start = Instant::now();
        let mut item = ResolvedItem::new_at(
            counter_context(Duration::ZERO, true),
            counter.clone(),
            String::from("%count%"),
            start,
        );
        assert!(item.is_constant());
        assert!(item.is_stale_at(start));

        counter.store(2, Ordering::SeqCst);
        assert_eq!(item.value_at(start), "2");
    }
}
