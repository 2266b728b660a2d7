//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Each test boots its own cluster, creates a database and applies the
//! migrations under `backend/migrations`. Set `SKIP_TEST_CLUSTER=1` to skip
//! when the cluster cannot start.

use diesel::pg::PgConnection;
use diesel::{Connection, QueryableByName, RunQueryDsl};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use user_registry::domain::ports::{UserPersistenceError, UserRepository};
use user_registry::domain::{User, UserId, UserProfile};
use user_registry::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

mod support;

use support::pg_embed::{handle_cluster_setup_failure, provision_database, test_cluster};

const DATABASE: &str = "user_registry_test";

struct TestContext {
    runtime: Runtime,
    repository: DieselUserRepository,
    database_url: String,
    _cluster: TestCluster,
}

impl TestContext {
    fn row_count(&self) -> i64 {
        #[derive(QueryableByName)]
        struct RowCount {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            count: i64,
        }

        let mut conn = PgConnection::establish(&self.database_url).expect("direct connection");
        diesel::sql_query("SELECT COUNT(*) AS count FROM users")
            .get_result::<RowCount>(&mut conn)
            .expect("count users")
            .count
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database_url = provision_database(&cluster, DATABASE)?;

    let config = PoolConfig::new(database_url.as_str()).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.into_message())?;

    Ok(TestContext {
        runtime,
        repository: DieselUserRepository::new(pool),
        database_url,
        _cluster: cluster,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn inserted_users_can_be_found_by_id_and_email(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: inserted_users_can_be_found_by_id_and_email skipped");
        return;
    };
    let repository = &context.repository;
    let profile = UserProfile::new("Ada", "ada@example.com");

    context.runtime.block_on(async {
        let id = repository.insert(&profile).await.expect("insert succeeds");

        let found = repository.find_by_id(id).await.expect("lookup succeeds");
        assert_eq!(found, Some(User::new(id, profile.clone())));

        let by_email = repository
            .find_id_by_email("ada@example.com")
            .await
            .expect("email lookup succeeds");
        assert_eq!(by_email, Some(id));

        let unknown = repository
            .find_id_by_email("grace@example.com")
            .await
            .expect("email lookup succeeds");
        assert_eq!(unknown, None);
    });
}

#[rstest]
fn ids_come_from_the_sequence(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: ids_come_from_the_sequence skipped");
        return;
    };
    let repository = &context.repository;

    context.runtime.block_on(async {
        let first = repository
            .insert(&UserProfile::new("Ada", "ada@example.com"))
            .await
            .expect("first insert");
        let second = repository
            .insert(&UserProfile::new("Grace", "grace@example.com"))
            .await
            .expect("second insert");

        assert_eq!(first, UserId::new(1));
        assert_eq!(second, UserId::new(2));
    });
}

#[rstest]
fn second_insert_with_same_email_is_a_duplicate(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: second_insert_with_same_email_is_a_duplicate skipped");
        return;
    };
    let repository = &context.repository;

    context.runtime.block_on(async {
        repository
            .insert(&UserProfile::new("Ada", "ada@example.com"))
            .await
            .expect("first insert");

        let err = repository
            .insert(&UserProfile::new("Imposter", "ada@example.com"))
            .await
            .expect_err("unique constraint rejects the second row");
        assert_eq!(err, UserPersistenceError::DuplicateEmail);
    });
    assert_eq!(context.row_count(), 1);
}

#[rstest]
fn update_overwrites_profile_and_rejects_taken_email(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: update_overwrites_profile_and_rejects_taken_email skipped");
        return;
    };
    let repository = &context.repository;

    context.runtime.block_on(async {
        let ada = repository
            .insert(&UserProfile::new("Ada", "ada@example.com"))
            .await
            .expect("insert ada");
        let grace = repository
            .insert(&UserProfile::new("Grace", "grace@example.com"))
            .await
            .expect("insert grace");

        let renamed = UserProfile::new("Augusta", "augusta@example.com");
        assert!(repository.update(ada, &renamed).await.expect("update"));
        assert_eq!(
            repository.find_by_id(ada).await.expect("lookup"),
            Some(User::new(ada, renamed))
        );

        let err = repository
            .update(grace, &UserProfile::new("Grace", "augusta@example.com"))
            .await
            .expect_err("email already taken");
        assert_eq!(err, UserPersistenceError::DuplicateEmail);
    });
}

#[rstest]
fn missing_rows_report_false_on_update_and_delete(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: missing_rows_report_false_on_update_and_delete skipped");
        return;
    };
    let repository = &context.repository;
    let missing = UserId::new(42);

    context.runtime.block_on(async {
        let updated = repository
            .update(missing, &UserProfile::new("Ada", "ada@example.com"))
            .await
            .expect("update runs");
        assert!(!updated);

        let deleted = repository.delete(missing).await.expect("delete runs");
        assert!(!deleted);

        assert_eq!(repository.find_by_id(missing).await.expect("lookup"), None);
    });
}

#[rstest]
fn delete_removes_the_row(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: delete_removes_the_row skipped");
        return;
    };
    let repository = &context.repository;

    context.runtime.block_on(async {
        let id = repository
            .insert(&UserProfile::new("Ada", "ada@example.com"))
            .await
            .expect("insert");

        assert!(repository.delete(id).await.expect("first delete"));
        assert!(!repository.delete(id).await.expect("second delete"));
        assert_eq!(repository.find_by_id(id).await.expect("lookup"), None);
    });
    assert_eq!(context.row_count(), 0);
}

#[rstest]
fn concurrent_inserts_with_one_email_leave_one_row(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_inserts_with_one_email_leave_one_row skipped");
        return;
    };
    let first = context.repository.clone();
    let second = context.repository.clone();

    let (left, right) = context.runtime.block_on(async move {
        let left = tokio::spawn(async move {
            first
                .insert(&UserProfile::new("Ada", "ada@example.com"))
                .await
        });
        let right = tokio::spawn(async move {
            second
                .insert(&UserProfile::new("Lovelace", "ada@example.com"))
                .await
        });
        (
            left.await.expect("first task completes"),
            right.await.expect("second task completes"),
        )
    });

    let outcomes = [left, right];
    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1, "exactly one insert wins: {outcomes:?}");
    assert!(
        outcomes
            .iter()
            .any(|outcome| outcome == &Err(UserPersistenceError::DuplicateEmail)),
        "the loser sees the unique constraint: {outcomes:?}"
    );
    assert_eq!(context.row_count(), 1);
}
