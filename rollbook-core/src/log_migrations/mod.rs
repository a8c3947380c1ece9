//! Event log schema, embedded at build time
//!
//! Applied in order by `LoggingService`; `000_migrations.sql` bootstraps the
//! bookkeeping table and every later file runs at most once.

/// (file name, SQL) pairs, in application order.
/// New migrations are appended as `NNN_description.sql`.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
