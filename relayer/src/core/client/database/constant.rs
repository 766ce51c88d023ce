/// Collection holding the processing state record, keyed by `status_id`.
pub const STATUS_COLLECTION: &str = "relayer_status";

/// Append-only collection of pings that exhausted their retries.
pub const FAILED_PINGS_COLLECTION: &str = "failed_pings";
