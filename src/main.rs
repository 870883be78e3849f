use std::fs::{self, File};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use fsq::cli::{Args, ColorMode};
use fsq::core::context::{ProgressCallback, ResultCallback};
use fsq::core::engine::search_advanced;
use fsq::output::{StreamPrinter, write_json};

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let criteria = args.to_criteria()?;
    let timeout_ms = criteria.timeout.map(|t| t.as_millis());

    // fail fast on an unreadable root instead of silently finding nothing
    fs::read_dir(&criteria.root_path).with_context(|| {
        format!(
            "'{}': No such file or directory",
            criteria.root_path.display()
        )
    })?;

    let printer = if args.json {
        None
    } else {
        Some(Arc::new(StreamPrinter::new(
            open_output(args)?,
            use_color(args),
            args.preview_lines(),
        )))
    };

    let result_callback: Option<ResultCallback> = printer.as_ref().map(|printer| {
        let printer = Arc::clone(printer);
        Box::new(move |result: &fsq::SearchResult| printer.print(result)) as ResultCallback
    });

    let progress_callback: Option<ProgressCallback> = if args.quiet || args.stats {
        None
    } else {
        // one-time notice so a long quiet search doesn't look hung
        let start = Instant::now();
        let shown = AtomicBool::new(false);
        Some(Box::new(move |processed, _queued, found| {
            if !shown.load(Ordering::Relaxed) && found == 0 && start.elapsed().as_secs() >= 5 {
                eprintln!("Processed: {processed} files, Found: {found} results...");
                shown.store(true, Ordering::Relaxed);
            }
            true
        }))
    };

    let outcome = search_advanced(criteria, result_callback, progress_callback)?;

    if let Some(printer) = &printer {
        printer.finish();
    }

    if outcome.timed_out {
        if let Some(ms) = timeout_ms {
            eprintln!("Warning: Search timed out after {ms} ms");
        }
    }

    if args.json {
        let mut out = open_output(args)?;
        write_json(&outcome.results, &mut out).context("Failed to output results")?;
    }

    if args.stats {
        let stats = outcome.stats;
        eprintln!(
            "Threads: {} | Submitted: {} | Completed: {} | Files processed: {}",
            stats.threads, stats.total_submitted, stats.completed, outcome.processed_files
        );
    }

    Ok(())
}

fn open_output(args: &Args) -> anyhow::Result<Box<dyn Write + Send>> {
    match &args.output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot open output file '{}'", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn use_color(args: &Args) -> bool {
    if args.json || args.output_file.is_some() {
        return false;
    }
    match args.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => console::Term::stdout().features().colors_supported(),
    }
}
