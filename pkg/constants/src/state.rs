//! State store / controller loop constants.

/// Root of every stored object key: `/registry/<plural>/[<namespace>/]<name>`.
pub const REGISTRY_PREFIX: &str = "/registry";

/// Key under which the SlateDB store keeps its resource-version counter.
pub const VERSION_COUNTER_KEY: &str = "/meta/resource-version";

/// How often the project controller runs a full reconciliation pass, in seconds.
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 10;
