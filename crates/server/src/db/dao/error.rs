use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} was not inserted")]
    NotInserted { entity: &'static str },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    /// Classifies an insert failure: the store answering with no row is a
    /// different outcome from the statement itself failing.
    pub fn from_insert(entity: &'static str, err: DbErr) -> Self {
        match err {
            DbErr::RecordNotInserted | DbErr::RecordNotFound(_) => Self::NotInserted { entity },
            other => Self::Db(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::DaoLayerError;

    #[test]
    fn insert_without_row_is_not_inserted() {
        let err = DaoLayerError::from_insert("todo", DbErr::RecordNotInserted);
        assert!(matches!(err, DaoLayerError::NotInserted { entity: "todo" }));
    }

    #[test]
    fn other_insert_failures_stay_database_errors() {
        let err = DaoLayerError::from_insert("todo", DbErr::Custom("boom".to_string()));
        assert!(matches!(err, DaoLayerError::Db(_)));
        let message = err.to_string();
        assert!(message.starts_with("Database error:"));
        assert!(message.contains("boom"));
    }
}
