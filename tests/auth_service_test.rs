//! Authentication service unit tests.

use std::sync::Arc;

use coursehub::config::Config;
use coursehub::domain::{Role, User};
use coursehub::errors::AppError;
use coursehub::infra::MockUserRepository;
use coursehub::services::{AuthService, Authenticator, RegisterInput};

fn register_input(role: Option<Role>) -> RegisterInput {
    RegisterInput {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "correct horse battery".into(),
        role,
    }
}

#[tokio::test]
async fn register_defaults_to_the_student_role() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user: &User| user.role == Role::Student)
        .times(1)
        .returning(|_| Ok(()));

    let service = Authenticator::new(Arc::new(users), Config::for_tests());
    let auth = service.register(register_input(None)).await.unwrap();
    assert!(!auth.token.is_empty());
    assert_eq!(auth.user.role, Role::Student);
}

#[tokio::test]
async fn register_honours_an_explicit_role() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user: &User| user.role == Role::Instructor)
        .times(1)
        .returning(|_| Ok(()));

    let service = Authenticator::new(Arc::new(users), Config::for_tests());
    let auth = service
        .register(register_input(Some(Role::Instructor)))
        .await
        .unwrap();
    assert_eq!(auth.user.role, Role::Instructor);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|email| {
        Ok(Some(User::new(
            "Existing".into(),
            email.to_string(),
            "$argon2id$hash".into(),
            Role::Student,
        )))
    });

    let service = Authenticator::new(Arc::new(users), Config::for_tests());
    let result = service.register(register_input(None)).await;
    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn unknown_email_and_wrong_password_look_identical() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let service = Authenticator::new(Arc::new(users), Config::for_tests());
    let result = service
        .login("ghost@example.com".into(), "whatever".into())
        .await;
    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn tokens_round_trip_with_role_and_subject() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users.expect_insert().returning(|_| Ok(()));

    let service = Authenticator::new(Arc::new(users), Config::for_tests());
    let auth = service
        .register(register_input(Some(Role::Admin)))
        .await
        .unwrap();

    let claims = service.verify_token(&auth.token).unwrap();
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.user_id().unwrap(), auth.user.id);
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let users = MockUserRepository::new();
    let service = Authenticator::new(Arc::new(users), Config::for_tests());
    assert!(service.verify_token("not-a-jwt").is_err());
}
