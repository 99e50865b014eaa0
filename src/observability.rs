use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("qwintus.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("qwintus.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("qwintus.client.request_duration_seconds");

pub(crate) static SESSION_SENDS: Counter = Counter::new("qwintus.session.sends");
pub(crate) static SESSION_IMAGES: Counter = Counter::new("qwintus.session.images");
pub(crate) static SESSION_PROBES: Counter = Counter::new("qwintus.session.probes");
pub(crate) static SESSION_GATE_REJECTIONS: Counter =
    Counter::new("qwintus.session.gate_rejections");
pub(crate) static SESSION_REFRESH_FAILURES: Counter =
    Counter::new("qwintus.session.refresh_failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_SENDS);
    collector.register_counter(&SESSION_IMAGES);
    collector.register_counter(&SESSION_PROBES);
    collector.register_counter(&SESSION_GATE_REJECTIONS);
    collector.register_counter(&SESSION_REFRESH_FAILURES);
}
