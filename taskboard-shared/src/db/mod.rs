/// Database access layer
///
/// - `pool`: PostgreSQL connection pool creation and health checks

pub mod pool;
