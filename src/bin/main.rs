use clap::Parser;
use crossterm::style::Stylize;
use deck_core::deck::{DeckOptions, DeckPlanner};
use deck_core::DeckEngine;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const MAX_SKIPPED_SHOWN: usize = 20;

/// Builds flashcard data from a words CSV and a translations CSV.
#[derive(Parser, Debug)]
#[command(name = "deck_builder", version)]
struct Cli {
    /// Characters/words source (label;pronunciation;characters...;word groups...).
    words_csv: PathBuf,

    /// Translation source (word;pronunciation;category: gloss, gloss | ...).
    translations_csv: PathBuf,

    /// Card data output consumed by the deck renderer.
    #[arg(short = 'o', long, default_value = "chinese_dict.json")]
    output: PathBuf,

    #[arg(short = 'd', long, default_value = "Chinese Dictionary")]
    deck_name: String,

    /// Where to list words that got no card because they lack a translation.
    #[arg(long, default_value = "words_without_translation.csv")]
    missing: PathBuf,

    /// Also save the built index as a binary snapshot.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Maximum co-occurring words and homophones listed per character.
    #[arg(long, default_value_t = 10)]
    max_listed: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    for path in [&cli.words_csv, &cli.translations_csv] {
        if !path.exists() {
            eprintln!("{} file {} not found", "Error:".red().bold(), path.display());
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> deck_core::Result<ExitCode> {
    println!("Parsing sources...");
    let engine = DeckEngine::from_files(&cli.words_csv, &cli.translations_csv)?;

    let words_count = engine.list_all_words().len();
    println!("Found {} unique words", words_count);
    if words_count == 0 {
        eprintln!("{} no words found", "Error:".red().bold());
        return Ok(ExitCode::FAILURE);
    }

    if let Some(path) = &cli.snapshot {
        engine.save_snapshot(path)?;
        info!("Index snapshot saved to {}", path.display());
    }

    let planner = DeckPlanner::new(DeckOptions {
        deck_name: cli.deck_name.clone(),
        max_listed: cli.max_listed,
    });
    let plan = planner.plan(&engine);
    plan.write_json(&cli.output)?;
    plan.write_untranslated_csv(&cli.missing)?;

    println!("\nCard data saved to: {}", cli.output.display());
    println!("Cards generated: {}", plan.cards.len().to_string().green());
    if !plan.untranslated.is_empty() {
        println!(
            "Skipped (no translation): {}",
            plan.untranslated.len().to_string().yellow()
        );
        let shown: Vec<&str> = plan
            .untranslated
            .iter()
            .take(MAX_SKIPPED_SHOWN)
            .map(|w| w.word.as_str())
            .collect();
        let more = if plan.untranslated.len() > MAX_SKIPPED_SHOWN { "..." } else { "" };
        println!("Skipped words: {}{}", shown.join(", "), more);
    }
    println!("Untranslated words listed in '{}'", cli.missing.display());
    println!("\n{}", "Done!".green().bold());
    Ok(ExitCode::SUCCESS)
}
