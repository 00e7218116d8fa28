use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use advisor_core::{recommend, ProgramMap, QaConfig, QaIndex};
use advisor_ingest::{default_sources, http_client, ingest, load_or_ingest, SourceMap};

#[derive(Parser)]
#[command(name = "advisor")]
#[command(about = "Q&A and elective recommendations over scraped master's programs", long_about = None)]
struct Cli {
    /// Path to the ingested-program snapshot
    #[arg(long, default_value = "./data/programs.json")]
    snapshot: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the program pages and linked curriculum PDFs
    Ingest {
        /// Override or extend the default sources (KEY=URL, repeatable)
        #[arg(long = "source", value_parser = parse_key_val)]
        sources: Vec<(String, String)>,
    },
    /// Ask a free-text question about the programs
    Ask {
        question: String,
        /// Restrict the answer to one program key
        #[arg(long)]
        program: Option<String>,
        /// Minimum similarity score before a question counts as on-topic
        #[arg(long, default_value_t = 0.1)]
        threshold: f32,
        /// Number of chunks concatenated into the answer
        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
    /// Recommend electives for a program given a skill background
    Recommend {
        #[arg(long)]
        program: String,
        /// Comma-separated skills: python,ml,math,nlp,cv,pm,se,ds
        #[arg(long)]
        skills: String,
        #[arg(long, default_value_t = 7)]
        top: usize,
        /// Also print the top-20 internal scores
        #[arg(long)]
        verbose: bool,
    },
    /// Print a short per-program comparison
    Compare,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, url)) if !key.is_empty() && !url.is_empty() => {
            Ok((key.to_string(), url.to_string()))
        }
        _ => Err(format!("expected KEY=URL, got '{s}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let Cli { snapshot, command } = Cli::parse();

    match command {
        Commands::Ingest { sources } => cmd_ingest(&snapshot, sources).await,
        Commands::Ask {
            question,
            program,
            threshold,
            top_k,
        } => {
            let cfg = QaConfig {
                relevance_threshold: threshold,
                top_k,
            };
            cmd_ask(&snapshot, &question, program, &cfg).await
        }
        Commands::Recommend {
            program,
            skills,
            top,
            verbose,
        } => cmd_recommend(&snapshot, &program, &skills, top, verbose).await,
        Commands::Compare => cmd_compare(&snapshot).await,
    }
}

async fn cmd_ingest(snapshot: &Path, overrides: Vec<(String, String)>) -> Result<()> {
    let mut sources: SourceMap = default_sources();
    for (key, url) in overrides {
        sources.insert(key, url);
    }
    let client = http_client()?;
    let programs = ingest(&client, &sources, snapshot).await?;
    let chunks: usize = programs.values().map(|p| p.text_chunks.len()).sum();
    tracing::info!(programs = programs.len(), chunks, "ingest complete");
    println!("OK. Saved {chunks} chunks.");
    Ok(())
}

async fn cmd_ask(
    snapshot: &Path,
    question: &str,
    program: Option<String>,
    cfg: &QaConfig,
) -> Result<()> {
    if question.trim().is_empty() {
        println!("Пустой вопрос. Сформулируйте вопрос об обучении и программах.");
        return Ok(());
    }
    let programs = load_programs(snapshot).await?;
    let index = QaIndex::build(&programs);
    let only = program.map(|p| vec![p]);
    let (reply, score) = index.ask(question, only.as_deref(), cfg).into_reply();
    println!("[score={score:.3}]");
    println!("{reply}");
    Ok(())
}

async fn cmd_recommend(
    snapshot: &Path,
    program: &str,
    skills: &str,
    top: usize,
    verbose: bool,
) -> Result<()> {
    let programs = load_programs(snapshot).await?;
    let record = match programs.get(program) {
        Some(record) => record,
        None => {
            let known = programs.keys().cloned().collect::<Vec<_>>().join(", ");
            println!("Unknown program key: {program}. Use one of: {known}");
            std::process::exit(1);
        }
    };

    let rec = recommend(record, skills, top);
    if rec.picks.is_empty() {
        println!("Не удалось подобрать элективы: в данных программы нет списка дисциплин.");
    } else {
        println!("Рекомендованные дисциплины ({program}):");
        for (i, title) in rec.picks.iter().enumerate() {
            println!("{}. {title}", i + 1);
        }
    }
    if verbose {
        println!("\nТоп-20 по внутреннему скору:");
        for (title, score) in &rec.scored {
            println!("{score:2}  {title}");
        }
    }
    Ok(())
}

async fn cmd_compare(snapshot: &Path) -> Result<()> {
    let programs = load_programs(snapshot).await?;
    println!("Сравнение программ:");
    for record in programs.values() {
        println!(
            "- {}: {} текстовых фрагментов, ~{} извлечённых дисциплин",
            record.name,
            record.text_chunks.len(),
            record.courses.len()
        );
    }
    Ok(())
}

async fn load_programs(snapshot: &Path) -> Result<ProgramMap> {
    let client = http_client()?;
    load_or_ingest(&client, &default_sources(), snapshot).await
}
