use todo_tracker::{
    config::{AppConfig, DatabaseConfig},
    db::{NewTodo, TodoStore, connection, dao::TodoDao},
};
use uuid::Uuid;

fn postgres_config() -> DatabaseConfig {
    let cfg = AppConfig::from_env().expect("load app config");
    cfg.database
        .expect("APP_DATABASE__URL should point at a Postgres database")
}

#[tokio::test]
#[ignore = "requires Postgres database"]
async fn postgres_toggle_and_conditional_delete() {
    let db = connection::connect(&postgres_config())
        .await
        .expect("connect to postgres");
    let dao = TodoDao::new(&db);
    let owner = format!("pg-{}", Uuid::new_v4());

    let created = dao
        .create(NewTodo {
            name: "postgres flow".to_string(),
            description: None,
            owner_id: owner.clone(),
        })
        .await
        .expect("insert");
    assert!(!created.completed);

    assert!(!dao.delete_completed(created.id).await.expect("delete"));

    let toggled = dao
        .toggle_completed(created.id)
        .await
        .expect("toggle")
        .expect("row exists");
    assert!(toggled.completed);
    assert_eq!(toggled.owner_id, owner);

    assert!(dao.delete_completed(created.id).await.expect("delete"));
    let still_there = dao
        .find_all()
        .await
        .expect("list")
        .into_iter()
        .any(|todo| todo.id == created.id);
    assert!(!still_there);
}

#[tokio::test]
#[ignore = "requires Postgres database"]
async fn postgres_concurrent_toggles_serialize() {
    let db = connection::connect(&postgres_config())
        .await
        .expect("connect to postgres");
    let dao = TodoDao::new(&db);
    let created = dao
        .create(NewTodo {
            name: "contended".to_string(),
            description: None,
            owner_id: format!("pg-{}", Uuid::new_v4()),
        })
        .await
        .expect("insert");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dao = dao.clone();
            tokio::spawn(async move { dao.toggle_completed(created.id).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task").expect("toggle");
    }

    let row = dao
        .find_all()
        .await
        .expect("list")
        .into_iter()
        .find(|todo| todo.id == created.id)
        .expect("row exists");
    assert!(!row.completed, "eight toggles leave the flag unchanged");
}
