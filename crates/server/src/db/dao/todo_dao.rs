use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::{DaoLayerError, DaoResult};
use crate::db::entities::prelude::Todo;
use crate::db::entities::todo;
use crate::db::store::{NewTodo, TodoStore};

/// sea-orm backed [`TodoStore`].
#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl TodoDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }
}

#[async_trait]
impl TodoStore for TodoDao {
    async fn find_all(&self) -> DaoResult<Vec<todo::Model>> {
        Ok(Todo::find()
            .order_by_asc(todo::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn create(&self, new_todo: NewTodo) -> DaoResult<todo::Model> {
        let now = Utc::now().fixed_offset();
        let model = todo::ActiveModel {
            name: Set(new_todo.name),
            description: Set(new_todo.description),
            completed: Set(false),
            owner_id: Set(new_todo.owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        model
            .insert(&self.db)
            .await
            .map_err(|err| DaoLayerError::from_insert("todo", err))
    }

    async fn toggle_completed(&self, id: i32) -> DaoResult<Option<todo::Model>> {
        let txn = self.db.begin().await?;

        // NOT in the statement itself: concurrent toggles serialize on the row lock.
        let result = Todo::update_many()
            .col_expr(
                todo::Column::Completed,
                Expr::col(todo::Column::Completed).not(),
            )
            .col_expr(
                todo::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(todo::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let updated = Todo::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn delete_completed(&self, id: i32) -> DaoResult<bool> {
        let result = Todo::delete_many()
            .filter(todo::Column::Id.eq(id))
            .filter(todo::Column::Completed.eq(true))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
