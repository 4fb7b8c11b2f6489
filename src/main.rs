use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use nordic_gait::analysis::analyze_frames;
use nordic_gait::config::Config;
use nordic_gait::render::save_thumbnail;
use nordic_gait::session::{
    generate_report, summarize_scan, summarize_session, Direction, Session, SessionRecorder, SessionSource,
};
use nordic_gait::source::{read_all, FrameSource, JsonLinesSource};
use nordic_gait::store::{JsonDirRepository, SessionRecord, SessionRepository};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a recording of detector output and store the session
    Record {
        /// JSON-lines file with one detector frame per line
        #[arg(short, long)]
        input: PathBuf,

        /// Side of the walker facing the camera
        #[arg(long, default_value = "front")]
        direction: Direction,

        /// Where the frames came from (camera or video)
        #[arg(long, default_value = "video")]
        source: SessionSource,

        /// Student the session belongs to
        #[arg(long)]
        student: Option<String>,

        /// URI of the original video
        #[arg(long)]
        video_uri: Option<String>,
    },

    /// Score every frame of a video scan and print a summary
    Scan {
        /// JSON-lines file with one detector frame per line
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the stored report of a session
    Show {
        /// Session id
        id: String,
    },

    /// List stored sessions
    List {
        /// Only sessions of this student
        #[arg(long)]
        student: Option<String>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match args.command {
        Command::Record {
            input,
            direction,
            source,
            student,
            video_uri,
        } => record(&config, &input, direction, source, student, video_uri),
        Command::Scan { input } => scan(&input),
        Command::Show { id } => show(&config, &id),
        Command::List { student } => list(&config, student.as_deref()),
        Command::InitConfig { path } => {
            Config::default().save(&path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn record(
    config: &Config,
    input: &Path,
    direction: Direction,
    source: SessionSource,
    student: Option<String>,
    video_uri: Option<String>,
) -> Result<()> {
    let mut frames = JsonLinesSource::open(input)?;

    let started_at = Utc::now();
    let mut recorder = SessionRecorder::start(direction, source, started_at).rules(config.rules);
    if let Some(student) = student {
        recorder = recorder.student(student);
    }
    if let Some(uri) = video_uri {
        recorder = recorder.video_uri(uri);
    }

    let mut first_timestamp = None;
    let mut last_timestamp = 0u64;
    let mut frame_count = 0u64;
    let mut total_analysis_time = std::time::Duration::ZERO;

    while let Some(frame) = frames.next_frame()? {
        first_timestamp.get_or_insert(frame.timestamp_ms);
        last_timestamp = frame.timestamp_ms;

        let analysis_start = Instant::now();
        let raised = recorder.record(frame).len();
        total_analysis_time += analysis_start.elapsed();
        frame_count += 1;

        if raised > 0 {
            tracing::debug!("Frame {}: {} violation(s)", frame_count, raised);
        }

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_ms = total_analysis_time.as_secs_f64() * 1000.0 / frame_count as f64;
            tracing::info!("Frame {}: analysis={:.2}ms", frame_count, avg_ms);
        }
    }

    // Imported footage lasts as long as its timestamps say, live capture as long as we ran
    let ended_at = match source {
        SessionSource::Video => {
            let span_ms = last_timestamp.saturating_sub(first_timestamp.unwrap_or(last_timestamp));
            started_at + Duration::milliseconds(i64::try_from(span_ms).unwrap_or(i64::MAX))
        }
        SessionSource::Camera => Utc::now(),
    };
    let session = recorder.finish(ended_at);

    let statistics = summarize_session(&session);
    let report = generate_report(&session, &statistics);
    let thumbnail_uri = write_thumbnail(config, &session)?;

    let record = SessionRecord::from_session(&session, &statistics, report.clone(), thumbnail_uri)?;
    let repository = JsonDirRepository::open(&config.store_dir)
        .with_context(|| format!("Failed to open session store {}", config.store_dir.display()))?;
    repository.save(record).context("Failed to store session")?;

    println!("{}", report);
    Ok(())
}

fn write_thumbnail(config: &Config, session: &Session) -> Result<Option<String>> {
    let Some(dir) = &config.thumbnail_dir else {
        return Ok(None);
    };
    let frames = session.frames();
    let Some(frame) = frames.get(frames.len() / 2) else {
        return Ok(None);
    };
    let path = dir.join(format!("{}.png", session.id()));
    save_thumbnail(frame, &path)?;
    Ok(Some(path.display().to_string()))
}

fn scan(input: &Path) -> Result<()> {
    let mut source = JsonLinesSource::open(input)?;
    let frames = read_all(&mut source)?;

    let scan_start = Instant::now();
    let results = analyze_frames(&frames);
    tracing::info!(
        "Scanned {} frames in {:.1}ms",
        results.len(),
        scan_start.elapsed().as_secs_f64() * 1000.0
    );

    print!("{}", summarize_scan(&results));
    Ok(())
}

fn show(config: &Config, id: &str) -> Result<()> {
    let repository = JsonDirRepository::open(&config.store_dir)?;
    let record = repository
        .get(id)
        .with_context(|| format!("Failed to load session {}", id))?;
    println!("{}", record.report);
    Ok(())
}

fn list(config: &Config, student: Option<&str>) -> Result<()> {
    let repository = JsonDirRepository::open(&config.store_dir)?;
    let records = match student {
        Some(student) => repository.list_for_student(student)?,
        None => repository.list()?,
    };

    for record in records {
        let statistics = record.statistics()?;
        println!(
            "{}  {}  {:<5}  {:<6}  {:>5} frames  {:>3} violations  {}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.id,
            record.direction,
            record.source,
            statistics.total_frames,
            statistics.total_violations,
            record.student_id.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
