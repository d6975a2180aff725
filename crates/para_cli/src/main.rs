//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `para_core` linkage.
//! - Run a fixed set of sample thoughts through the keyword pipeline.
//!
//! Usage: `para_cli [config.json]`. When a config with `logging.log_dir` is
//! given, file logging is enabled before processing.

use para_core::{
    CategoryHints, CoreConfig, KeywordCategorizer, ProcessingStatistics, Thought,
    ThoughtProcessor,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("para_core version={}", para_core::core_version());

    let config = match std::env::args().nth(1) {
        Some(path) => match CoreConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("config error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => CoreConfig::default(),
    };

    if config.logging.log_dir.is_some() {
        if let Err(err) = para_core::init_logging(&config.logging) {
            eprintln!("logging error: {err}");
            return ExitCode::FAILURE;
        }
        log::info!("event=cli_start module=cli status=ok");
    }

    let thoughts = match sample_thoughts() {
        Ok(thoughts) => thoughts,
        Err(err) => {
            eprintln!("sample error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let processor = ThoughtProcessor::with_config(KeywordCategorizer, config.processing);
    let results = processor.process_many_parallel(&thoughts, None);
    for result in &results {
        match result.resource() {
            Some(resource) => println!(
                "ok title={:?} category={} tags=[{}]",
                resource.title(),
                resource.category(),
                resource.tags()
            ),
            None => println!(
                "failed title={:?} status={} error={}",
                result.thought().title(),
                result.thought().status(),
                result.error_message().unwrap_or_default()
            ),
        }
    }

    let stats = ProcessingStatistics::from_results(&results);
    println!(
        "total={} successful={} failed={} success_rate={:.1}",
        stats.total_processed, stats.successful, stats.failed, stats.success_rate
    );
    ExitCode::SUCCESS
}

fn sample_thoughts() -> para_core::ModelResult<Vec<Thought>> {
    Ok(vec![
        Thought::new("Ship v1", "finish the launch deadline")?,
        Thought::with_hints(
            "Gym",
            "stay fit",
            CategoryHints::new(None, Some("health".to_string())),
        )?,
        Thought::new("Interesting article", "about octopi")?,
    ])
}
