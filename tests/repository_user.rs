use sqlx::PgPool;
use std::sync::Arc;
use url_shortener::domain::entities::NewUser;
use url_shortener::domain::repositories::UserRepository;
use url_shortener::error::AppError;
use url_shortener::infrastructure::persistence::PgUserRepository;

fn new_user(login: &str, email: &str) -> NewUser {
    NewUser {
        login: login.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$test".to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.create(new_user("alice", "alice@example.com")).await.unwrap();

    assert_eq!(repo.find_by_id(user.id).await.unwrap().unwrap().login, "alice");
    assert_eq!(repo.find_by_login("alice").await.unwrap().unwrap().id, user.id);
    assert_eq!(
        repo.find_by_email("alice@example.com").await.unwrap().unwrap().id,
        user.id
    );
    assert!(repo.find_by_login("bob").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_duplicate_login_and_email(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("alice", "alice@example.com")).await.unwrap();

    let login_taken = repo.create(new_user("alice", "other@example.com")).await;
    assert!(matches!(login_taken, Err(AppError::Conflict { .. })));

    let email_taken = repo.create(new_user("bob", "alice@example.com")).await;
    assert!(matches!(email_taken, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_list_ordered_by_id(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("alice", "alice@example.com")).await.unwrap();
    repo.create(new_user("bob", "bob@example.com")).await.unwrap();

    let logins: Vec<String> = repo.list().await.unwrap().into_iter().map(|u| u.login).collect();

    assert_eq!(logins, vec!["alice", "bob"]);
}
