use anyhow::{bail, Context, Result};
use campus_timetabler::allocator::allocate_electives;
use campus_timetabler::catalog::CatalogStore;
use campus_timetabler::reporter;
use campus_timetabler::scheduler::{generate, CancelFlag};
use campus_timetabler::types::{
    CourseType, DayOfWeek, EngineConfig, GenerationRequest, NewRoom, NewStudentGroup, NewSubject,
    NewTeacher, SemesterType, StudentChoice, TeacherUnavailability,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "campus-timetabler")]
#[command(about = "Constraint-based university timetable generator")]
#[command(version)]
struct Cli {
    /// Catalog database file
    #[arg(short, long, default_value = "campus.db", global = true)]
    database: PathBuf,

    /// Engine config file (max_iterations, day_order)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed demo data, generate, publish and print a timetable
    Demo,

    /// Generate a timetable for the given groups
    Generate {
        /// Academic year, e.g. 2025-26
        #[arg(short, long)]
        year: String,

        /// Semester half: odd or even
        #[arg(short, long)]
        semester: String,

        /// Comma-separated group codes, e.g. CS-3A,CS-3B
        #[arg(short, long)]
        groups: String,

        /// Comma-separated working days (default mon-fri)
        #[arg(long)]
        days: Option<String>,

        /// Periods per day (4-8)
        #[arg(long, default_value_t = 6)]
        periods_per_day: u8,

        /// 1-based lunch period to keep free
        #[arg(long)]
        lunch_period: Option<u8>,

        /// Iteration budget override
        #[arg(long)]
        max_iterations: Option<u64>,

        /// Publish the accepted solution to the catalog
        #[arg(long)]
        publish: bool,

        /// Print the solution as wire-format JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the published timetable for a partition
    Timetable {
        #[arg(short, long)]
        year: String,

        #[arg(short, long)]
        semester: String,

        /// Restrict to one group code
        #[arg(short, long)]
        group: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Delete the published timetable for a partition
    Clear {
        #[arg(short, long)]
        year: String,

        #[arg(short, long)]
        semester: String,
    },

    /// Allocate elective seats by CGPA priority
    Allocate {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine_config = load_engine_config(cli.config.as_deref())?;
    let store = CatalogStore::open(&cli.database)
        .await
        .with_context(|| format!("failed to open catalog '{}'", cli.database.display()))?;

    match cli.command {
        Commands::Demo => run_demo(&store, &engine_config).await,
        Commands::Generate {
            year,
            semester,
            groups,
            days,
            periods_per_day,
            lunch_period,
            max_iterations,
            publish,
            json,
        } => {
            let mut config = engine_config;
            if let Some(budget) = max_iterations {
                config.max_iterations = budget;
            }
            run_generate(
                &store,
                &config,
                &year,
                &semester,
                &groups,
                days.as_deref(),
                periods_per_day,
                lunch_period,
                publish,
                json,
            )
            .await
        }
        Commands::Timetable {
            year,
            semester,
            group,
            json,
        } => run_timetable(&store, &year, &semester, group.as_deref(), json).await,
        Commands::Clear { year, semester } => run_clear(&store, &year, &semester).await,
        Commands::Allocate { json } => run_allocate(&store, json).await,
    }
}

/// Read engine knobs from a config file. An explicitly given path must
/// parse; the implicit ./config.toml falls back to defaults.
fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config '{}'", path.display()))
        }
        None => Ok(std::fs::read_to_string("config.toml")
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()),
    }
}

fn parse_semester(s: &str) -> Result<SemesterType> {
    SemesterType::parse(s).with_context(|| format!("invalid semester '{s}', expected odd|even"))
}

fn parse_days(s: &str) -> Result<Vec<DayOfWeek>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| DayOfWeek::parse(part).with_context(|| format!("invalid day '{part}'")))
        .collect()
}

async fn resolve_groups(store: &CatalogStore, codes: &str) -> Result<Vec<campus_timetabler::types::GroupId>> {
    let all = store.list_all_groups().await?;
    let mut ids = Vec::new();
    for code in codes.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let group = all
            .iter()
            .find(|g| g.code == code)
            .with_context(|| format!("unknown group code '{code}'"))?;
        ids.push(group.id);
    }
    if ids.is_empty() {
        bail!("no group codes given");
    }
    Ok(ids)
}

fn search_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("static spinner template"),
    );
    spinner.set_message("Searching for a feasible timetable...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[allow(clippy::too_many_arguments)]
async fn run_generate(
    store: &CatalogStore,
    config: &EngineConfig,
    year: &str,
    semester: &str,
    groups: &str,
    days: Option<&str>,
    periods_per_day: u8,
    lunch_period: Option<u8>,
    publish: bool,
    json: bool,
) -> Result<()> {
    let semester = parse_semester(semester)?;
    let group_ids = resolve_groups(store, groups).await?;

    let mut request = GenerationRequest::new(year, semester, group_ids);
    request.periods_per_day = periods_per_day;
    request.lunch_break_period = lunch_period;
    if let Some(days) = days {
        request.days = parse_days(days)?;
    }

    let spinner = search_spinner();
    let result = generate(store, &request, config, CancelFlag::new()).await;
    spinner.finish_and_clear();

    let solution = result.context("timetable generation failed")?;

    for warning in &solution.warnings {
        println!("{} {warning}", "Warning:".yellow());
    }
    if json {
        println!("{}", reporter::to_wire_json(&solution.slots)?);
    } else {
        println!("{}", "Timetable generated".green().bold());
        print!("{}", reporter::render_summary(&solution));
        print!("{}", reporter::render_timetable(&solution.slots));
    }

    if publish {
        store
            .publish(&solution, year, semester)
            .await
            .context("failed to publish solution")?;
        println!("{}", format!("Published for {year} ({semester})").green());
    }
    Ok(())
}

async fn run_timetable(
    store: &CatalogStore,
    year: &str,
    semester: &str,
    group: Option<&str>,
    json: bool,
) -> Result<()> {
    let semester = parse_semester(semester)?;
    let group_filter = match group {
        Some(code) => Some(resolve_groups(store, code).await?[0]),
        None => None,
    };

    let slots = store.read_timetable(year, semester, group_filter).await?;
    if json {
        println!("{}", reporter::to_wire_json(&slots)?);
    } else if slots.is_empty() {
        println!("No timetable published for {year} ({semester})");
    } else {
        print!("{}", reporter::render_timetable(&slots));
    }
    Ok(())
}

async fn run_clear(store: &CatalogStore, year: &str, semester: &str) -> Result<()> {
    let semester = parse_semester(semester)?;
    let removed = store.clear_timetable(year, semester).await?;
    println!("Removed {removed} slots for {year} ({semester})");
    Ok(())
}

async fn run_allocate(store: &CatalogStore, json: bool) -> Result<()> {
    let outcomes = allocate_electives(store).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    for outcome in &outcomes {
        match &outcome.seat {
            Some(seat) => println!(
                "{} {} (CGPA {:.2}) -> {} (preference #{})",
                "✓".green(),
                outcome.student_id,
                outcome.cgpa,
                seat.elective_name,
                seat.preference_rank
            ),
            None => println!(
                "{} {} (CGPA {:.2}) -> no seat",
                "✗".red(),
                outcome.student_id,
                outcome.cgpa
            ),
        }
    }
    let allocated = outcomes.iter().filter(|o| o.is_allocated()).count();
    println!("{allocated} of {} students allocated", outcomes.len());
    Ok(())
}

async fn run_demo(store: &CatalogStore, config: &EngineConfig) -> Result<()> {
    println!("{}", "Campus Timetabler Demo".bold().cyan());
    println!("{}", "─".repeat(40));

    seed_demo_catalog(store)
        .await
        .context("failed to seed demo data (database already populated?)")?;
    println!(
        "Seeded demo catalog: {} teachers, {} subjects, {} rooms, {} groups",
        store.list_teachers().await?.len(),
        store.list_subjects().await?.len(),
        store.list_rooms().await?.len(),
        store.list_all_groups().await?.len()
    );

    let groups = store.list_all_groups().await?;
    let mut request = GenerationRequest::new(
        "2025-26",
        SemesterType::Odd,
        groups.iter().map(|g| g.id).collect(),
    );
    request.lunch_break_period = Some(4);

    let spinner = search_spinner();
    let result = generate(store, &request, config, CancelFlag::new()).await;
    spinner.finish_and_clear();
    let solution = result.context("demo generation failed")?;

    print!("{}", reporter::render_summary(&solution));
    store
        .publish(&solution, "2025-26", SemesterType::Odd)
        .await?;
    println!("{}", "Published demo timetable for 2025-26 (odd)".green());
    print!("{}", reporter::render_timetable(&solution.slots));

    println!("{}", "Elective allocation".bold().cyan());
    run_allocate(store, false).await
}

async fn seed_demo_catalog(store: &CatalogStore) -> campus_timetabler::Result<()> {
    let teacher = |code: &str, name: &str| NewTeacher {
        code: code.to_string(),
        name: name.to_string(),
        department: "CSE".to_string(),
    };
    let rao = store.create_teacher(&teacher("CS-RAO", "Dr. Rao")).await?;
    let iyer = store.create_teacher(&teacher("CS-IYER", "Prof. Iyer")).await?;
    let menon = store.create_teacher(&teacher("CS-MENON", "Dr. Menon")).await?;
    let nair = store.create_teacher(&teacher("CS-NAIR", "Prof. Nair")).await?;
    let pillai = store.create_teacher(&teacher("CS-PILLAI", "Dr. Pillai")).await?;

    let subject = |code: &str, name: &str, hours, course_type, consecutive| NewSubject {
        code: code.to_string(),
        name: name.to_string(),
        hours_per_week: hours,
        course_type,
        department: "CSE".to_string(),
        semester: 3,
        requires_consecutive_periods: consecutive,
        max_periods_per_day: 2,
    };
    let os = store
        .create_subject(&subject("CS301", "Operating Systems", 4, CourseType::Theory, false))
        .await?;
    let dbms = store
        .create_subject(&subject("CS302", "Database Systems", 4, CourseType::Theory, false))
        .await?;
    let networks = store
        .create_subject(&subject("CS303", "Computer Networks", 3, CourseType::Theory, false))
        .await?;
    let os_lab = store
        .create_subject(&subject("CS351", "Operating Systems Lab", 2, CourseType::Lab, true))
        .await?;
    let dbms_lab = store
        .create_subject(&subject("CS352", "Database Systems Lab", 2, CourseType::Lab, true))
        .await?;
    let maths = store
        .create_subject(&subject("MA301", "Discrete Mathematics", 3, CourseType::Theory, false))
        .await?;

    store.create_room(&NewRoom::classroom("B1-101", "Block 1 Room 101", 70)).await?;
    store.create_room(&NewRoom::classroom("B1-102", "Block 1 Room 102", 60)).await?;
    store.create_room(&NewRoom::lab("B2-201", "Systems Lab", 60)).await?;
    store.create_room(&NewRoom::lab("B2-202", "Database Lab", 60)).await?;

    let group = |code: &str, name: &str, strength| NewStudentGroup {
        code: code.to_string(),
        name: name.to_string(),
        strength,
        department: "CSE".to_string(),
        semester: 3,
        academic_year: "2025-26".to_string(),
    };
    let cs3a = store.create_group(&group("CS-3A", "CSE Third Year A", 60)).await?;
    let cs3b = store.create_group(&group("CS-3B", "CSE Third Year B", 55)).await?;

    for (teacher_id, subject_id, priority) in [
        (rao, os, 1),
        (iyer, os, 2),
        (iyer, dbms, 1),
        (menon, dbms, 2),
        (menon, networks, 1),
        (nair, networks, 2),
        (rao, os_lab, 1),
        (pillai, os_lab, 2),
        (menon, dbms_lab, 1),
        (pillai, dbms_lab, 2),
        (nair, maths, 1),
        (pillai, maths, 2),
    ] {
        store.assign_teacher_subject(teacher_id, subject_id, priority).await?;
    }

    for group_id in [cs3a, cs3b] {
        for subject_id in [os, dbms, networks, os_lab, dbms_lab, maths] {
            store.assign_subject_group(subject_id, group_id).await?;
        }
    }

    store
        .add_unavailability(&TeacherUnavailability {
            teacher_id: rao,
            day_of_week: DayOfWeek::Monday,
            period_number: 1,
            reason: "department meeting".to_string(),
            is_permanent: true,
            start_date: None,
            end_date: None,
        })
        .await?;

    store.create_elective("Machine Learning", 2).await?;
    store.create_elective("Cloud Computing", 1).await?;
    store.create_elective("Internet of Things", 2).await?;

    let choice = |id: &str, name: &str, cgpa, prefs: &[&str]| StudentChoice {
        student_id: id.to_string(),
        student_name: name.to_string(),
        cgpa,
        preferences: prefs.iter().map(|s| s.to_string()).collect(),
    };
    store
        .record_student_choices(&choice(
            "21CS042",
            "Asha Verma",
            9.5,
            &["Machine Learning", "Cloud Computing"],
        ))
        .await?;
    store
        .record_student_choices(&choice(
            "21CS090",
            "Rohan Gupta",
            8.0,
            &["Machine Learning", "Cloud Computing"],
        ))
        .await?;
    store
        .record_student_choices(&choice(
            "21CS017",
            "Neha Singh",
            8.9,
            &["Cloud Computing", "Internet of Things"],
        ))
        .await?;
    store
        .record_student_choices(&choice(
            "21CS101",
            "Arjun Das",
            7.4,
            &["Machine Learning", "Internet of Things"],
        ))
        .await?;

    Ok(())
}
