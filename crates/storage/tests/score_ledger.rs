//! Ledger and roster behaviour against a real Postgres.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -p storage -- --ignored`.

use sqlx::PgPool;
use storage::{
    dto::{group::CreateGroupRequest, student::CreateStudentRequest},
    error::StorageError,
    models::{Role, Student},
    repository::{
        group::GroupRepository, roster::RosterRepository, score::ScoreLedger,
        student::StudentRepository, user::UserRepository,
    },
};
use uuid::Uuid;

async fn seed_group(pool: &PgPool, name: &str) -> Uuid {
    let teacher = UserRepository::new(pool)
        .create(&format!("{}@example.com", Uuid::new_v4()), "Ms Zhang", Role::Teacher)
        .await
        .unwrap();

    GroupRepository::new(pool)
        .create(&CreateGroupRequest {
            name: name.to_string(),
            description: None,
            teacher_id: teacher.user_id,
        })
        .await
        .unwrap()
        .group_id
}

async fn seed_student(pool: &PgPool, group_id: Uuid, name: &str, opening: i32) -> Student {
    let student = StudentRepository::new(pool)
        .create(&CreateStudentRequest {
            group_id,
            name: name.to_string(),
            height: None,
            weight: None,
            heart_rate: None,
            vital_capacity: None,
            sit_and_reach: None,
            run_50m: None,
            rope_skipping: None,
            single_leg_stand: None,
        })
        .await
        .unwrap();

    if opening != 0 {
        ScoreLedger::new(pool)
            .apply_score(student.student_id, opening, "opening balance")
            .await
            .unwrap();
    }

    student
}

async fn roster_total(pool: &PgPool, student_id: Uuid) -> Option<i32> {
    RosterRepository::new(pool)
        .list_groups_with_students()
        .await
        .unwrap()
        .into_iter()
        .flat_map(|g| g.students)
        .find(|s| s.student_id == student_id)
        .map(|s| s.total_score)
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_award_returns_total_and_roster_agrees(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;
    let student = seed_student(&pool, group_id, "Leo", 100).await;

    let (record, updated_total) = ScoreLedger::new(&pool)
        .apply_score(student.student_id, 3, "good behavior")
        .await
        .unwrap();

    assert_eq!(updated_total, 103);
    assert_eq!(record.points_delta, 3);
    assert_eq!(record.reason, "good behavior");
    assert_eq!(roster_total(&pool, student.student_id).await, Some(103));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_penalty_can_take_total_below_zero(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;
    let student = seed_student(&pool, group_id, "Mia", 100).await;

    let (_, updated_total) = ScoreLedger::new(&pool)
        .apply_score(student.student_id, -150, "penalty")
        .await
        .unwrap();

    assert_eq!(updated_total, -50);
    assert_eq!(roster_total(&pool, student.student_id).await, Some(-50));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_read_your_writes_every_time(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;
    let student = seed_student(&pool, group_id, "Ivy", 0).await;
    let ledger = ScoreLedger::new(&pool);

    for i in 1..=20 {
        ledger
            .apply_score(student.student_id, 5, "x")
            .await
            .unwrap();
        assert_eq!(roster_total(&pool, student.student_id).await, Some(5 * i));
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_total_matches_ledger_after_mixed_writes(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;
    let a = seed_student(&pool, group_id, "Leo", 150).await;
    let b = seed_student(&pool, group_id, "Mia", 95).await;
    let ledger = ScoreLedger::new(&pool);

    for (student, delta) in [(&a, 5), (&b, -20), (&a, -7), (&b, 12), (&a, 40)] {
        ledger
            .apply_score(student.student_id, delta, "activity")
            .await
            .unwrap();
    }

    // Rejected writes must not leave anything behind either.
    assert!(ledger.apply_score(a.student_id, 0, "nothing").await.is_err());
    assert!(ledger.apply_score(b.student_id, 3, "  ").await.is_err());

    for audit in ledger.audit_all().await.unwrap() {
        assert!(audit.is_consistent(), "{} drifted by {}", audit.name, audit.difference());
    }
    assert_eq!(ledger.audit(a.student_id).await.unwrap().ledger_total, 188);
    assert_eq!(ledger.audit(b.student_id).await.unwrap().ledger_total, 87);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_uncommitted_write_leaves_no_trace(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;
    let student = seed_student(&pool, group_id, "Leo", 100).await;

    {
        let mut tx = pool.begin().await.unwrap();
        let (_, total) = ScoreLedger::apply_in(&mut tx, student.student_id, 30, "interrupted")
            .await
            .unwrap();
        assert_eq!(total, 130);
        // Dropped before commit, as if the request died mid-transaction.
    }

    let ledger = ScoreLedger::new(&pool);
    let history = ledger.history(student.student_id, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history.iter().all(|r| r.reason != "interrupted"));
    assert_eq!(roster_total(&pool, student.student_id).await, Some(100));
}

fn new_student(group_id: Uuid, name: &str) -> CreateStudentRequest {
    CreateStudentRequest {
        group_id,
        name: name.to_string(),
        height: None,
        weight: None,
        heart_rate: None,
        vital_capacity: None,
        sit_and_reach: None,
        run_50m: None,
        rope_skipping: None,
        single_leg_stand: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_student_and_opening_balance_share_a_transaction(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;

    {
        let mut tx = pool.begin().await.unwrap();
        let student = StudentRepository::create_in(&mut tx, &new_student(group_id, "Ivy"))
            .await
            .unwrap();
        ScoreLedger::apply_in(&mut tx, student.student_id, 200, "Opening balance")
            .await
            .unwrap();
    }
    let students = StudentRepository::new(&pool).list_for_group(group_id).await.unwrap();
    assert!(students.is_empty());

    let mut tx = pool.begin().await.unwrap();
    let student = StudentRepository::create_in(&mut tx, &new_student(group_id, "Ivy"))
        .await
        .unwrap();
    ScoreLedger::apply_in(&mut tx, student.student_id, 200, "Opening balance")
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(roster_total(&pool, student.student_id).await, Some(200));
    let audit = ScoreLedger::new(&pool).audit(student.student_id).await.unwrap();
    assert!(audit.is_consistent());
    assert_eq!(audit.record_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_blank_student_name_is_invalid_input(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;

    let result = StudentRepository::new(&pool).create(&new_student(group_id, "   ")).await;
    assert!(matches!(result, Err(StorageError::InvalidInput(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_unknown_student_is_not_found(pool: PgPool) {
    let result = ScoreLedger::new(&pool)
        .apply_score(Uuid::new_v4(), 5, "ghost")
        .await;

    assert!(matches!(result, Err(StorageError::NotFound)));
    let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM score_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(records, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_concurrent_awards_are_not_lost(pool: PgPool) {
    let group_id = seed_group(&pool, "Grade 3 Class 1").await;
    let student = seed_student(&pool, group_id, "Leo", 0).await;

    let mut handles = Vec::new();
    for _ in 0..25 {
        let pool = pool.clone();
        let id = student.student_id;
        handles.push(tokio::spawn(async move {
            ScoreLedger::new(&pool).apply_score(id, 2, "relay").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let audit = ScoreLedger::new(&pool).audit(student.student_id).await.unwrap();
    assert_eq!(audit.total_score, 50);
    assert_eq!(audit.record_count, 25);
    assert!(audit.is_consistent());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_deleting_group_cascades_to_students_and_records(pool: PgPool) {
    let doomed = seed_group(&pool, "Doomed").await;
    let kept = seed_group(&pool, "Kept").await;
    let gone = seed_student(&pool, doomed, "Leo", 120).await;
    let stays = seed_student(&pool, kept, "Mia", 80).await;

    GroupRepository::new(&pool).delete(doomed).await.unwrap();

    let roster = RosterRepository::new(&pool)
        .list_groups_with_students()
        .await
        .unwrap();
    assert!(roster.iter().all(|g| g.group_id != doomed));
    assert_eq!(roster_total(&pool, gone.student_id).await, None);
    assert_eq!(roster_total(&pool, stays.student_id).await, Some(80));

    let orphaned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM score_records WHERE student_id = $1")
        .bind(gone.student_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn test_roster_orders_groups_and_students(pool: PgPool) {
    let older = seed_group(&pool, "Older").await;
    let newer = seed_group(&pool, "Newer").await;
    sqlx::query("UPDATE groups SET created_at = NOW() - INTERVAL '1 day' WHERE group_id = $1")
        .bind(older)
        .execute(&pool)
        .await
        .unwrap();

    for (name, score) in [("Leo", 150), ("Ivy", 200), ("Max", 120), ("Amy", 180), ("Tom", 95)] {
        seed_student(&pool, newer, name, score).await;
    }

    let roster = RosterRepository::new(&pool)
        .list_groups_with_students()
        .await
        .unwrap();

    assert_eq!(roster[0].group_id, newer);
    assert_eq!(roster[1].group_id, older);
    let scores: Vec<i32> = roster[0].students.iter().map(|s| s.total_score).collect();
    assert_eq!(scores, [200, 180, 150, 120, 95]);
}
