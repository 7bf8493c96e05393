//! Per-container defaults written into each project's LimitRange.

/// Default CPU request, in millicores.
pub const DEFAULT_CONTAINER_CPU_REQUEST_MILLIS: i64 = 100;

/// Default memory request, in MiB.
pub const DEFAULT_CONTAINER_MEMORY_REQUEST_MIB: i64 = 128;

/// Default CPU limit, in millicores.
pub const DEFAULT_CONTAINER_CPU_LIMIT_MILLIS: i64 = 500;

/// Default memory limit, in MiB.
pub const DEFAULT_CONTAINER_MEMORY_LIMIT_MIB: i64 = 512;
