//! Registry of event listeners keyed by domain.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Callback invoked with `(member, params)` for each event in its domain.
pub type DomainListener = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Handle identifying one registration, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered listeners per domain.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    domains: HashMap<String, Vec<(ListenerId, DomainListener)>>,
}

impl ListenerRegistry {
    /// Appends a listener to the domain's sequence, creating it if absent.
    pub(crate) fn register(&mut self, domain: &str, listener: DomainListener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.domains
            .entry(domain.to_owned())
            .or_default()
            .push((id, listener));
        id
    }

    /// Removes one registration, keeping the remaining listeners in order.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let mut emptied = None;
        let mut removed = false;
        for (domain, listeners) in &mut self.domains {
            let before = listeners.len();
            listeners.retain(|(candidate, _)| *candidate != id);
            if listeners.len() != before {
                removed = true;
                if listeners.is_empty() {
                    emptied = Some(domain.clone());
                }
                break;
            }
        }
        if let Some(domain) = emptied {
            self.domains.remove(&domain);
        }
        removed
    }

    /// Returns a snapshot of the domain's listeners in registration order.
    pub(crate) fn listeners_for(&self, domain: &str) -> Vec<DomainListener> {
        self.domains
            .get(domain)
            .map(|listeners| {
                listeners
                    .iter()
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, domain: &str) -> usize {
        self.domains.get(domain).map_or(0, Vec::len)
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .domains
            .iter()
            .map(|(domain, listeners)| (domain.as_str(), listeners.len()))
            .collect();
        formatter
            .debug_struct("ListenerRegistry")
            .field("domains", &counts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn recorder(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> DomainListener {
        let log = Arc::clone(log);
        Arc::new(move |member: &str, _params: &Value| {
            log.lock()
                .expect("log lock")
                .push(format!("{label}:{member}"));
        })
    }

    fn invoke_all(registry: &ListenerRegistry, domain: &str, member: &str) {
        for listener in registry.listeners_for(domain) {
            listener(member, &json!({}));
        }
    }

    #[rstest]
    fn preserves_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::default();
        registry.register("Page", recorder("first", &log));
        registry.register("Page", recorder("second", &log));
        registry.register("Network", recorder("other", &log));

        invoke_all(&registry, "Page", "loaded");

        assert_eq!(
            *log.lock().expect("log lock"),
            vec!["first:loaded", "second:loaded"]
        );
        assert_eq!(registry.count("Page"), 2);
        assert_eq!(registry.count("Network"), 1);
    }

    #[rstest]
    fn unknown_domain_has_no_listeners() {
        let registry = ListenerRegistry::default();
        assert!(registry.listeners_for("Page").is_empty());
        assert_eq!(registry.count("Page"), 0);
    }

    #[rstest]
    fn removal_keeps_remaining_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::default();
        registry.register("Page", recorder("a", &log));
        let middle = registry.register("Page", recorder("b", &log));
        registry.register("Page", recorder("c", &log));

        assert!(registry.remove(middle));
        assert!(!registry.remove(middle));

        invoke_all(&registry, "Page", "x");
        assert_eq!(*log.lock().expect("log lock"), vec!["a:x", "c:x"]);
    }

    #[rstest]
    fn removing_last_listener_forgets_domain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::default();
        let only = registry.register("Page", recorder("only", &log));

        assert!(registry.remove(only));

        assert_eq!(registry.count("Page"), 0);
        assert!(format!("{registry:?}").contains("ListenerRegistry"));
    }
}
