/// URL for accessing the PostgreSQL database that holds the todo table
pub const DB_URL: &str = "DATABASE_URL";
/// Address the HTTP server listens on. Defaults to [DEFAULT_BIND_ADDRESS] when unset.
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
/// Log level configuration for the application. Takes [EnvFilter directives](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Leave unset to run without trace export.
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Leave unset to run without metrics export.
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Base URL of the PostgreSQL server used by integration tests (should not contain a database name in the path)
pub const TEST_DB_URL: &str = "TEST_DB_URL";
