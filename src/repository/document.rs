use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, DocumentReader, ListQuery, query};

impl DocumentReader for DieselRepository {
    fn list_document_ids(&self, list_query: &ListQuery) -> RepositoryResult<(usize, Vec<i32>)> {
        let mut conn = self.conn()?;
        let total = query::load_count(&mut conn, list_query)?;
        if total == 0 {
            return Ok((0, Vec::new()));
        }
        let ids = query::load_ids(&mut conn, list_query)?;
        Ok((total, ids))
    }
}
