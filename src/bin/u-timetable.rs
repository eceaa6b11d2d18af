use std::{error::Error, fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::{error, info};
use u_timetable::{
    models::{normalize, BindingSpec, SlotContent, WeeklySchedule},
    scheduler::{SchedulerConfig, TimetableSummary, WeekScheduler},
    store::{load_week, persist_week, MemoryStore, TimetableStore},
};

/// Generates a weekly class timetable from subject-teacher bindings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON array of `{subject, teacher, type, total, max}` bindings.
    #[arg(long, value_name = "FILE")]
    bindings: PathBuf,
    /// Scheduler configuration (weekdays, dailySlots, maxAttempts, ...).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Random seed; overrides the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Class the timetable is stored under.
    #[arg(long, default_value = "class")]
    class_id: String,
    /// Print the timetable as JSON instead of a table.
    #[arg(long)]
    json: bool,
    /// Lock the timetable once it is stored.
    #[arg(long)]
    submit: bool,
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut figment = Figment::new();
    if let Some(path) = &args.config {
        info!("Reading scheduler config from {}", path.display());
        figment = figment.merge(Json::file(path));
    }
    let mut config: SchedulerConfig = figment
        .merge(Env::prefixed("TIMETABLE_").only(&["seed"]))
        .extract()?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let specs: Vec<BindingSpec> = serde_json::from_str(&fs::read_to_string(&args.bindings)?)?;
    info!(
        "Read {} bindings from {}",
        specs.len(),
        args.bindings.display()
    );

    let weekdays = config.weekdays.clone();
    let outcome = WeekScheduler::new(config).run(&specs)?;

    let mut store = MemoryStore::new();
    persist_week(&mut store, &args.class_id, &outcome.schedule)?;
    if args.submit {
        store.submit(&args.class_id)?;
    }
    let week = load_week(&store, &args.class_id, &weekdays);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&week)?);
    } else {
        print_week(&week);
    }
    print_summary(&TimetableSummary::calculate(&week, &normalize(&specs)));
    Ok(())
}

fn print_week(week: &WeeklySchedule) {
    for day in week.days() {
        println!("\n{} Timetable:", day.day);
        for block in day.blocks() {
            let slot = block.first;
            match &slot.content {
                SlotContent::Break { break_type } => {
                    println!("  {}: {}", slot.time, break_type.as_deref().unwrap_or("Break"));
                }
                SlotContent::Lesson(lesson) => {
                    let span = if block.span > 1 {
                        format!(" x{}", block.span)
                    } else {
                        String::new()
                    };
                    println!(
                        "  {}: {} - {} ({}){span}",
                        slot.time, lesson.subject_id, lesson.teacher_id, lesson.lesson_type
                    );
                }
                SlotContent::Empty => println!("  {}: -", slot.time),
            }
        }
    }
}

fn print_summary(summary: &TimetableSummary) {
    println!("\nAllocation:");
    for s in &summary.subjects {
        println!(
            "  {} ({}): {}/{}",
            s.subject_id, s.lesson_type, s.allocated, s.weekly_quota
        );
    }
    for (teacher, slots) in &summary.teacher_load {
        println!("  {teacher}: {slots} slot(s)");
    }
    for breach in summary.daily_cap_breaches() {
        println!(
            "  {} {} ({}) over daily cap: {} > {}",
            breach.day, breach.subject_id, breach.lesson_type, breach.allocated, breach.daily_cap
        );
    }
}
