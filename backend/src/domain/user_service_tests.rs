//! Tests for the user CRUD service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockUserOperationMetrics, MockUserRepository, UserOperationMetricsError,
};
use crate::domain::{ErrorCode, User};

fn ada() -> UserProfile {
    UserProfile::new("Ada", "ada@example.com")
}

fn make_service(repo: MockUserRepository) -> UserService<MockUserRepository> {
    UserService::new(Arc::new(repo), UserServicePolicy::strict())
}

fn make_lenient_service(repo: MockUserRepository) -> UserService<MockUserRepository> {
    UserService::new(Arc::new(repo), UserServicePolicy::lenient())
}

#[tokio::test]
async fn create_inserts_when_email_is_free() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email()
        .withf(|email| email == "ada@example.com")
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Ok(UserId::new(11)));

    let id = make_service(repo)
        .create_user(ada())
        .await
        .expect("create succeeds");
    assert_eq!(id, UserId::new(11));
}

#[tokio::test]
async fn create_rejects_taken_email_without_inserting() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email()
        .times(1)
        .return_once(|_| Ok(Some(UserId::new(3))));
    repo.expect_insert().never();

    let err = make_service(repo)
        .create_user(ada())
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Email already in use");
}

#[tokio::test]
async fn create_maps_store_uniqueness_violation_to_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email().return_once(|_| Ok(None));
    repo.expect_insert()
        .return_once(|_| Err(UserPersistenceError::duplicate_email()));

    let err = make_service(repo)
        .create_user(ada())
        .await
        .expect_err("lost the race");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case("john123", "john@example.com", "name", "invalid_name")]
#[case("John", "not-an-email", "email", "invalid_email")]
#[case("john123", "not-an-email", "name", "invalid_name")]
#[tokio::test]
async fn create_rejects_invalid_profiles_before_touching_the_store(
    #[case] name: &str,
    #[case] email: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email().never();
    repo.expect_insert().never();

    let err = make_service(repo)
        .create_user(UserProfile::new(name, email))
        .await
        .expect_err("validation fails");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details present");
    assert_eq!(details["field"], field);
    assert_eq!(details["code"], code);
}

#[tokio::test]
async fn lenient_policy_skips_pattern_checks() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email().return_once(|_| Ok(None));
    repo.expect_insert().return_once(|_| Ok(UserId::new(1)));

    let result = make_lenient_service(repo)
        .create_user(UserProfile::new("john123", "not-an-email"))
        .await;
    assert!(result.is_ok());
}

/// Accepts only addresses under one company domain.
struct CompanyEmail;

impl crate::domain::FieldValidator for CompanyEmail {
    fn validate(&self, value: &str) -> bool {
        value.ends_with("@corp.test")
    }
}

fn company_validator() -> ProfileValidator {
    ProfileValidator::new(
        Arc::new(crate::domain::NamePattern),
        Arc::new(CompanyEmail),
    )
}

#[tokio::test]
async fn injected_validator_replaces_the_policy_patterns() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email().never();
    repo.expect_insert().never();

    let err = make_service(repo)
        .with_validator(company_validator())
        .create_user(ada())
        .await
        .expect_err("outside email rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details present");
    assert_eq!(details["field"], "email");
    assert_eq!(details["code"], "invalid_email");
}

#[tokio::test]
async fn injected_validator_admits_what_it_accepts() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email()
        .withf(|email| email == "ada@corp.test")
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Ok(UserId::new(5)));

    let id = make_lenient_service(repo)
        .with_validator(company_validator())
        .create_user(UserProfile::new("Ada", "ada@corp.test"))
        .await
        .expect("company address accepted");
    assert_eq!(id, UserId::new(5));
}

#[rstest]
#[case(UserPersistenceError::connection("refused"))]
#[case(UserPersistenceError::query("syntax"))]
#[tokio::test]
async fn store_failures_become_internal_errors(#[case] failure: UserPersistenceError) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_id_by_email().return_once(move |_| Err(failure));
    repo.expect_insert().never();

    let err = make_service(repo)
        .create_user(ada())
        .await
        .expect_err("store failure surfaces");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn get_returns_profile() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(UserId::new(5)))
        .return_once(|id| Ok(Some(User::new(id, ada()))));

    let profile = make_service(repo)
        .get_user(UserId::new(5))
        .await
        .expect("user found");
    assert_eq!(profile, ada());
}

#[tokio::test]
async fn get_reports_missing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let err = make_service(repo)
        .get_user(UserId::new(404))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}

#[tokio::test]
async fn update_allows_keeping_own_email() {
    let id = UserId::new(9);
    let renamed = UserProfile::new("Augusta", "ada@example.com");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(move |id| Ok(Some(User::new(id, ada()))));
    repo.expect_find_id_by_email()
        .return_once(move |_| Ok(Some(id)));
    repo.expect_update()
        .withf(move |target, profile| *target == id && profile.name() == "Augusta")
        .times(1)
        .return_once(|_, _| Ok(true));

    let profile = make_service(repo)
        .update_user(id, renamed.clone())
        .await
        .expect("self email is not a conflict");
    assert_eq!(profile, renamed);
}

#[tokio::test]
async fn update_rejects_email_owned_by_another_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|id| Ok(Some(User::new(id, ada()))));
    repo.expect_find_id_by_email()
        .return_once(|_| Ok(Some(UserId::new(2))));
    repo.expect_update().never();

    let err = make_service(repo)
        .update_user(UserId::new(1), ada())
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn update_reports_missing_user_before_email_check() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_find_id_by_email().never();
    repo.expect_update().never();

    let err = make_service(repo)
        .update_user(UserId::new(1), ada())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn lenient_update_relies_on_rows_touched() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().never();
    repo.expect_find_id_by_email().return_once(|_| Ok(None));
    repo.expect_update().return_once(|_, _| Ok(false));

    let err = make_lenient_service(repo)
        .update_user(UserId::new(1), ada())
        .await
        .expect_err("no row touched");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn strict_delete_reports_missing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let err = make_service(repo)
        .delete_user(UserId::new(1))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn lenient_delete_is_idempotent() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let result = make_lenient_service(repo).delete_user(UserId::new(1)).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn metrics_observe_each_operation_outcome() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    let mut metrics = MockUserOperationMetrics::new();
    metrics
        .expect_record()
        .withf(|record| {
            record.operation == UserOperation::Get && record.outcome == OperationOutcome::NotFound
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = make_service(repo).with_metrics(Arc::new(metrics));
    let err = service.get_user(UserId::new(1)).await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn failing_metrics_do_not_change_the_response() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().return_once(|_| Ok(true));
    let mut metrics = MockUserOperationMetrics::new();
    metrics
        .expect_record()
        .times(1)
        .returning(|_| Err(UserOperationMetricsError::export("registry gone")));

    let service = make_service(repo).with_metrics(Arc::new(metrics));
    assert!(service.delete_user(UserId::new(1)).await.is_ok());
}
