/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts (prices, order totals) stored as `NUMERIC(12,2)`.
pub type Money = rust_decimal::Decimal;
