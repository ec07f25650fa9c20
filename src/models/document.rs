//! Row shapes returned by raw list queries.

use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Integer};

#[derive(Debug, QueryableByName)]
pub struct RowCount {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

#[derive(Debug, QueryableByName)]
pub struct RowId {
    #[diesel(sql_type = Integer)]
    pub id: i32,
}
