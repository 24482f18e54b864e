use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{DonationNewCmd, Engine, EngineError, ProjectNewCmd, ProjectUpdateCmd};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.create_user("admin", "s3cret", true).await.unwrap();
    engine.create_user("alice", "wonder", false).await.unwrap();
    engine.create_user("bob", "builder", false).await.unwrap();
    (engine, db)
}

fn project(name: &str, full_amount: i64) -> ProjectNewCmd {
    ProjectNewCmd::new(name, "help them", full_amount)
}

#[tokio::test]
async fn donations_fill_projects_oldest_first() {
    let (engine, _db) = engine_with_db().await;

    let shelter = engine
        .create_project(project("Shelter", 100), "admin")
        .await
        .unwrap();
    assert_eq!(shelter.funding.invested_amount, 0);

    let first = engine
        .create_donation(DonationNewCmd::new(30), "alice")
        .await
        .unwrap();
    let second = engine
        .create_donation(DonationNewCmd::new(50), "bob")
        .await
        .unwrap();
    let third = engine
        .create_donation(DonationNewCmd::new(40), "alice")
        .await
        .unwrap();
    assert!(first.funding.fully_invested);
    assert!(second.funding.fully_invested);
    assert_eq!(third.funding.invested_amount, 20);
    assert!(!third.funding.fully_invested);
    assert_eq!(third.funding.close_date, None);

    let shelter = engine.project(shelter.id).await.unwrap();
    assert_eq!(shelter.funding.invested_amount, 100);
    assert!(shelter.funding.fully_invested);
    assert!(shelter.funding.close_date.is_some());

    // The leftover of the third donation goes to the next project.
    let food = engine
        .create_project(project("Food", 50), "admin")
        .await
        .unwrap();
    assert_eq!(food.funding.invested_amount, 20);
    assert!(!food.funding.fully_invested);

    let donations = engine.list_donations("admin").await.unwrap();
    assert_eq!(donations.len(), 3);
    assert!(donations.iter().all(|d| d.funding.fully_invested));
    let total_in: i64 = donations.iter().map(|d| d.funding.invested_amount).sum();
    let total_out: i64 = engine
        .list_projects()
        .await
        .unwrap()
        .iter()
        .map(|p| p.funding.invested_amount)
        .sum();
    assert_eq!(total_in, total_out);
}

#[tokio::test]
async fn new_project_absorbs_waiting_donations() {
    let (engine, _db) = engine_with_db().await;

    for amount in [10, 20, 30] {
        engine
            .create_donation(DonationNewCmd::new(amount), "alice")
            .await
            .unwrap();
    }

    let project = engine
        .create_project(project("Shelter", 25), "admin")
        .await
        .unwrap();
    assert!(project.funding.fully_invested);
    assert_eq!(project.funding.invested_amount, 25);

    let donations = engine.user_donations("alice").await.unwrap();
    let invested: Vec<_> = donations
        .iter()
        .map(|d| (d.funding.invested_amount, d.funding.fully_invested))
        .collect();
    assert_eq!(invested, vec![(10, true), (15, false), (0, false)]);
}

#[tokio::test]
async fn create_project_validation() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.create_project(project("Shelter", 10), "alice").await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.create_project(project("Shelter", 10), "ghost").await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.create_project(project("   ", 10), "admin").await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine
            .create_project(project(&"x".repeat(101), 10), "admin")
            .await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine
            .create_project(ProjectNewCmd::new("Shelter", " ", 10), "admin")
            .await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine.create_project(project("Shelter", 0), "admin").await,
        Err(EngineError::InvalidAmount(_))
    ));

    let created = engine
        .create_project(project("  Shelter ", 10), "admin")
        .await
        .unwrap();
    assert_eq!(created.name, "Shelter");

    assert_eq!(
        engine.create_project(project("SHELTER", 10), "admin").await,
        Err(EngineError::ExistingKey("SHELTER".to_string()))
    );
    assert_eq!(engine.list_projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_project_rules() {
    let (engine, _db) = engine_with_db().await;
    let shelter = engine
        .create_project(project("Shelter", 100), "admin")
        .await
        .unwrap();
    engine
        .create_project(project("Food", 100), "admin")
        .await
        .unwrap();
    engine
        .create_donation(DonationNewCmd::new(40), "alice")
        .await
        .unwrap();

    assert!(matches!(
        engine
            .update_project(shelter.id, ProjectUpdateCmd::new().name("Roof"), "alice")
            .await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine
            .update_project(Uuid::new_v4(), ProjectUpdateCmd::new().name("Roof"), "admin")
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine
            .update_project(shelter.id, ProjectUpdateCmd::new().name("food"), "admin")
            .await,
        Err(EngineError::ExistingKey(_))
    ));
    assert!(matches!(
        engine
            .update_project(shelter.id, ProjectUpdateCmd::new().description(""), "admin")
            .await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine
            .update_project(shelter.id, ProjectUpdateCmd::new().full_amount(39), "admin")
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    let untouched = engine
        .update_project(shelter.id, ProjectUpdateCmd::new(), "admin")
        .await
        .unwrap();
    assert_eq!(untouched, engine.project(shelter.id).await.unwrap());
    assert_eq!(untouched.funding.full_amount, 100);

    // Renaming to its own name with a different case is allowed.
    let renamed = engine
        .update_project(shelter.id, ProjectUpdateCmd::new().name("SHELTER"), "admin")
        .await
        .unwrap();
    assert_eq!(renamed.name, "SHELTER");

    let raised = engine
        .update_project(shelter.id, ProjectUpdateCmd::new().full_amount(60), "admin")
        .await
        .unwrap();
    assert_eq!(raised.funding.full_amount, 60);
    assert!(!raised.funding.fully_invested);

    let closed = engine
        .update_project(shelter.id, ProjectUpdateCmd::new().full_amount(40), "admin")
        .await
        .unwrap();
    assert!(closed.funding.fully_invested);
    assert!(closed.funding.close_date.is_some());
    assert_eq!(engine.project(shelter.id).await.unwrap(), closed);

    assert!(matches!(
        engine
            .update_project(shelter.id, ProjectUpdateCmd::new().description("new"), "admin")
            .await,
        Err(EngineError::ProjectClosed(_))
    ));
}

#[tokio::test]
async fn delete_project_rules() {
    let (engine, _db) = engine_with_db().await;
    let funded = engine
        .create_project(project("Shelter", 100), "admin")
        .await
        .unwrap();
    engine
        .create_donation(DonationNewCmd::new(1), "alice")
        .await
        .unwrap();
    let empty = engine
        .create_project(project("Food", 100), "admin")
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_project(funded.id, "admin").await,
        Err(EngineError::ProjectFunded(_))
    ));
    assert!(matches!(
        engine.delete_project(empty.id, "bob").await,
        Err(EngineError::Forbidden(_))
    ));

    let deleted = engine.delete_project(empty.id, "admin").await.unwrap();
    assert_eq!(deleted.name, "Food");
    assert!(matches!(
        engine.project(empty.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_project(empty.id, "admin").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn donation_validation_and_visibility() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.create_donation(DonationNewCmd::new(10), "ghost").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.create_donation(DonationNewCmd::new(0), "alice").await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.create_donation(DonationNewCmd::new(-5), "alice").await,
        Err(EngineError::InvalidAmount(_))
    ));

    let blank = engine
        .create_donation(DonationNewCmd::new(10).comment("   "), "alice")
        .await
        .unwrap();
    assert_eq!(blank.comment, None);
    let commented = engine
        .create_donation(DonationNewCmd::new(10).comment(" for cats "), "bob")
        .await
        .unwrap();
    assert_eq!(commented.comment.as_deref(), Some("for cats"));

    let alice = engine.user_donations("alice").await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].id, blank.id);

    assert!(matches!(
        engine.list_donations("alice").await,
        Err(EngineError::Forbidden(_))
    ));
    assert_eq!(engine.list_donations("admin").await.unwrap().len(), 2);
}

#[tokio::test]
async fn completion_rate_orders_closed_projects_by_duration() {
    let (engine, db) = engine_with_db().await;
    for name in ["Slow", "Fast", "Open"] {
        engine
            .create_project(project(name, 10), "admin")
            .await
            .unwrap();
    }
    engine
        .create_donation(DonationNewCmd::new(20), "alice")
        .await
        .unwrap();

    let start = Utc::now() - Duration::days(10);
    let backend = db.get_database_backend();
    for (name, days) in [("Slow", 5), ("Fast", 1)] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "UPDATE charity_projects SET create_date = ?, close_date = ? WHERE name = ?",
            vec![
                start.into(),
                (start + Duration::days(days)).into(),
                name.into(),
            ],
        ))
        .await
        .unwrap();
    }

    let report = engine.projects_by_completion_rate().await.unwrap();
    let names: Vec<_> = report.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Fast", "Slow"]);
    assert_eq!(report[0].collection_time(), Some(Duration::days(1)));
}

#[tokio::test]
async fn users_and_authentication() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.create_user("alice", "another", false).await,
        Err(EngineError::ExistingKey("alice".to_string()))
    );
    assert!(matches!(
        engine.create_user("carol", "no", false).await,
        Err(EngineError::InvalidPassword(_))
    ));
    assert!(matches!(
        engine.create_user("carol", "carol123", false).await,
        Err(EngineError::InvalidPassword(_))
    ));
    assert!(matches!(
        engine.user("carol").await,
        Err(EngineError::KeyNotFound(_))
    ));

    let alice = engine.authenticate("alice", "wonder").await.unwrap().unwrap();
    assert!(!alice.is_superuser);
    assert_eq!(engine.authenticate("alice", "wrong").await.unwrap(), None);
    assert_eq!(engine.authenticate("ghost", "wonder").await.unwrap(), None);

    let promoted = engine.ensure_superuser("alice", "ignored").await.unwrap();
    assert!(promoted.is_superuser);
    assert!(engine.user("alice").await.unwrap().is_superuser);
    // The existing password is kept.
    assert!(engine.authenticate("alice", "wonder").await.unwrap().is_some());

    let created = engine.ensure_superuser("root", "toor!").await.unwrap();
    assert!(created.is_superuser);
    assert!(engine.authenticate("root", "toor!").await.unwrap().is_some());
}

#[tokio::test]
async fn failed_insert_rolls_back_allocation() {
    let (engine, db) = engine_with_db().await;
    for amount in [30, 50] {
        engine
            .create_donation(DonationNewCmd::new(amount), "alice")
            .await
            .unwrap();
    }

    db.execute_unprepared(
        "CREATE TRIGGER reject_projects BEFORE INSERT ON charity_projects \
         BEGIN SELECT RAISE(ABORT, 'projects are frozen'); END;",
    )
    .await
    .unwrap();

    assert!(matches!(
        engine.create_project(project("Shelter", 60), "admin").await,
        Err(EngineError::Database(_))
    ));
    assert!(engine.list_projects().await.unwrap().is_empty());
    let donations = engine.user_donations("alice").await.unwrap();
    assert!(
        donations
            .iter()
            .all(|d| d.funding.invested_amount == 0 && !d.funding.fully_invested)
    );

    db.execute_unprepared("DROP TRIGGER reject_projects")
        .await
        .unwrap();
    let food = engine
        .create_project(project("Food", 100), "admin")
        .await
        .unwrap();
    assert_eq!(food.funding.invested_amount, 80);

    db.execute_unprepared(
        "CREATE TRIGGER reject_donations BEFORE INSERT ON donations \
         BEGIN SELECT RAISE(ABORT, 'donations are frozen'); END;",
    )
    .await
    .unwrap();

    assert!(matches!(
        engine.create_donation(DonationNewCmd::new(20), "bob").await,
        Err(EngineError::Database(_))
    ));
    let food = engine.project(food.id).await.unwrap();
    assert_eq!(food.funding.invested_amount, 80);
    assert!(!food.funding.fully_invested);
    assert!(engine.user_donations("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn schema_rejects_inconsistent_amounts() {
    let (engine, db) = engine_with_db().await;
    engine
        .create_project(project("Shelter", 100), "admin")
        .await
        .unwrap();
    engine
        .create_donation(DonationNewCmd::new(40), "alice")
        .await
        .unwrap();

    for sql in [
        "UPDATE charity_projects SET invested_amount = full_amount + 1",
        "UPDATE charity_projects SET invested_amount = -1",
        "UPDATE charity_projects SET full_amount = 0, invested_amount = 0",
        "UPDATE donations SET invested_amount = full_amount + 1",
        "UPDATE donations SET full_amount = -5, invested_amount = -5",
    ] {
        assert!(db.execute_unprepared(sql).await.is_err(), "{sql}");
    }

    let shelter = &engine.list_projects().await.unwrap()[0];
    assert_eq!(shelter.funding.invested_amount, 40);
    assert_eq!(shelter.funding.full_amount, 100);
}
