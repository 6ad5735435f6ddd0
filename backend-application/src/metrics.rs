use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    entities_created: AtomicU64,
    entities_deleted: AtomicU64,
    events_recorded: AtomicU64,
    links_created: AtomicU64,
    links_rejected: AtomicU64,
}

impl Metrics {
    pub fn record_entity_created(&self) {
        self.entities_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_entity_deleted(&self) {
        self.entities_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_events(&self, count: usize) {
        self.events_recorded.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_link_created(&self) {
        self.links_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_link_rejected(&self) {
        self.links_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let created = self.entities_created.load(Ordering::Relaxed);
        let deleted = self.entities_deleted.load(Ordering::Relaxed);
        let events = self.events_recorded.load(Ordering::Relaxed);
        let links = self.links_created.load(Ordering::Relaxed);
        let rejected = self.links_rejected.load(Ordering::Relaxed);

        format!(
            "# TYPE tracelet_entities_created_total counter\n\
tracelet_entities_created_total {}\n\
# TYPE tracelet_entities_deleted_total counter\n\
tracelet_entities_deleted_total {}\n\
# TYPE tracelet_events_recorded_total counter\n\
tracelet_events_recorded_total {}\n\
# TYPE tracelet_links_created_total counter\n\
tracelet_links_created_total {}\n\
# TYPE tracelet_links_rejected_total counter\n\
tracelet_links_rejected_total {}\n",
            created, deleted, events, links, rejected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_counters() {
        let metrics = Metrics::default();
        metrics.record_entity_created();
        metrics.record_events(3);
        metrics.record_link_rejected();
        let text = metrics.render_prometheus();
        assert!(text.contains("tracelet_entities_created_total 1\n"));
        assert!(text.contains("tracelet_events_recorded_total 3\n"));
        assert!(text.contains("tracelet_links_rejected_total 1\n"));
        assert!(text.contains("tracelet_links_created_total 0\n"));
    }
}
