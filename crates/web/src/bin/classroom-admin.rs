use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use storage::{
    Database,
    dto::{group::CreateGroupRequest, student::CreateStudentRequest},
    error::StorageError,
    models::Role,
    repository::{
        group::GroupRepository, score::ScoreLedger, student::StudentRepository,
        user::UserRepository,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use web::{
    config::ReportConfig,
    features::reports::services::{build_report_generator, load_group_snapshot},
};

#[derive(Parser)]
#[command(name = "classroom-admin")]
#[command(about = "Classroom Points maintenance tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and create the demo accounts, class and students
    Seed,
    /// Delete every user, group, student and score record
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Compare every cached total with its ledger; fails on drift
    Audit,
    /// Generate a class report for one group
    Report {
        #[arg(long)]
        group: Uuid,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

struct DemoStudent {
    name: &'static str,
    height: i64,
    weight: i64,
    heart_rate: i32,
    opening_balance: i32,
}

const DEMO_STUDENTS: [DemoStudent; 5] = [
    DemoStudent { name: "Leo", height: 120, weight: 25, heart_rate: 80, opening_balance: 150 },
    DemoStudent { name: "Ivy", height: 118, weight: 23, heart_rate: 85, opening_balance: 200 },
    DemoStudent { name: "Max", height: 125, weight: 28, heart_rate: 75, opening_balance: 120 },
    DemoStudent { name: "Amy", height: 115, weight: 22, heart_rate: 90, opening_balance: 180 },
    DemoStudent { name: "Tom", height: 130, weight: 30, heart_rate: 70, opening_balance: 95 },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "classroom_admin={},storage={},reporting={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Seed => handle_seed(&db).await?,
        Commands::Reset { yes } => handle_reset(&db, yes).await?,
        Commands::Audit => handle_audit(&db).await?,
        Commands::Report { group, output } => handle_report(&db, group, output).await?,
    }

    Ok(())
}

async fn handle_seed(db: &Database) -> anyhow::Result<()> {
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    let users = UserRepository::new(db.pool());
    ensure_user(&users, "admin@example.com", "Administrator", Role::Admin).await?;
    let teacher = ensure_user(&users, "teacher@example.com", "Ms Zhang", Role::Teacher).await?;

    let groups = GroupRepository::new(db.pool());
    let existing = groups
        .list_for_teacher(teacher)
        .await?
        .into_iter()
        .find(|g| g.group.name == "Grade 3 Class 1");
    let group_id = match existing {
        Some(g) => g.group.group_id,
        None => {
            groups
                .create(&CreateGroupRequest {
                    name: "Grade 3 Class 1".to_string(),
                    description: Some("Demo class".to_string()),
                    teacher_id: teacher,
                })
                .await?
                .group_id
        }
    };

    for demo in &DEMO_STUDENTS {
        // Student and opening balance commit together.
        let mut tx = db.pool().begin().await?;
        let created = StudentRepository::create_in(
            &mut tx,
            &CreateStudentRequest {
                group_id,
                name: demo.name.to_string(),
                height: Some(Decimal::from(demo.height)),
                weight: Some(Decimal::from(demo.weight)),
                heart_rate: Some(demo.heart_rate),
                vital_capacity: None,
                sit_and_reach: None,
                run_50m: None,
                rope_skipping: None,
                single_leg_stand: None,
            },
        )
        .await;

        match created {
            Ok(student) => {
                ScoreLedger::apply_in(&mut tx, student.student_id, demo.opening_balance, "Opening balance")
                    .await?;
                tx.commit().await?;
                tracing::info!("Seeded {} with {} points", demo.name, demo.opening_balance);
            }
            Err(StorageError::ConstraintViolation(_)) => {
                tracing::info!("Student {} already seeded, skipping", demo.name);
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("✓ Seed complete");
    println!("  Group: Grade 3 Class 1 ({})", group_id);
    println!("  Teacher: teacher@example.com ({})", teacher);

    Ok(())
}

async fn ensure_user(
    users: &UserRepository<'_>,
    email: &str,
    name: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    if let Some(user) = users.find_by_email(email).await? {
        return Ok(user.user_id);
    }
    let user = users.create(email, name, role).await?;
    Ok(user.user_id)
}

async fn handle_reset(db: &Database, yes: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("Refusing to delete all data without --yes");
    }

    let deleted = UserRepository::new(db.pool()).delete_all().await?;
    println!("✓ Deleted {} users and everything they owned", deleted);

    Ok(())
}

async fn handle_audit(db: &Database) -> anyhow::Result<()> {
    let audits = ScoreLedger::new(db.pool()).audit_all().await?;

    let mut drifted = 0;
    for audit in &audits {
        let marker = if audit.is_consistent() { "✓" } else { "✗" };
        if !audit.is_consistent() {
            drifted += 1;
        }
        println!(
            "{} {:<24} total {:>6}  ledger {:>6}  records {:>4}",
            marker, audit.name, audit.total_score, audit.ledger_total, audit.record_count
        );
    }

    println!("\n{} students audited, {} inconsistent", audits.len(), drifted);
    if drifted > 0 {
        bail!("{} students have totals that differ from their ledger", drifted);
    }

    Ok(())
}

async fn handle_report(db: &Database, group: Uuid, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ReportConfig::from_env().context("Failed to load report configuration")?;
    let generator = build_report_generator(&config).context("Failed to initialize report providers")?;

    let snapshot = load_group_snapshot(db.pool(), group)
        .await
        .with_context(|| format!("Failed to load group {}", group))?;
    let report = generator.generate(&snapshot).await?;

    tracing::info!(
        "Report source: {:?}, provider: {}",
        report.source,
        report.provider.as_deref().unwrap_or("none")
    );

    match output {
        Some(path) => {
            std::fs::write(&path, &report.markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Report written to {}", path.display());
        }
        None => println!("{}", report.markdown),
    }

    Ok(())
}
