use prometheus::{Encoder, IntCounter, IntCounterVec, TextEncoder};

lazy_static::lazy_static! {
    pub static ref REC_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "rec_requests_total",
        "Recommendation requests by endpoint",
        &["endpoint"]
    ).expect("rec_requests_total can be registered");

    pub static ref OFFLINE_LOOKUPS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "rec_offline_lookups_total",
        "Offline lookups by the list that answered them",
        &["kind"]
    ).expect("rec_offline_lookups_total can be registered");

    pub static ref SIMILARITY_LOOKUP_FAILURES_TOTAL: IntCounter = prometheus::register_int_counter!(
        "rec_similarity_lookup_failures_total",
        "Similarity lookups dropped from online fan-out"
    ).expect("rec_similarity_lookup_failures_total can be registered");

    pub static ref EVENT_HISTORY_FAILURES_TOTAL: IntCounter = prometheus::register_int_counter!(
        "rec_event_history_failures_total",
        "Event history fetches that degraded to an empty history"
    ).expect("rec_event_history_failures_total can be registered");
}

/// Render the default registry in the Prometheus text format.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
