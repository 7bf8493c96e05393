//! Platform-wide resource quota floor applied to every project.

/// Default `requests.cpu`, in cores.
pub const DEFAULT_REQUESTS_CPU_CORES: i64 = 4;

/// Default `requests.memory`, in GiB.
pub const DEFAULT_REQUESTS_MEMORY_GIB: i64 = 15;

/// Default `limits.cpu`, in cores.
pub const DEFAULT_LIMITS_CPU_CORES: i64 = 8;

/// Default `limits.memory`, in GiB.
pub const DEFAULT_LIMITS_MEMORY_GIB: i64 = 32;

/// Default number of pods.
pub const DEFAULT_PODS: i64 = 20;
