use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use roster_cards::bootstrap;
use roster_cards::config::{self, RunConfig};
use roster_cards::fake_feed::StaticFeedSource;
use roster_cards::feed::{FeedSource, HttpFeedSource};
use roster_cards::http_cache::DiskCache;
use roster_cards::page::Page;
use roster_cards::state::RenderOutcome;

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if config::has_flag(&args, "--help") {
        println!("{}", config::USAGE);
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let cfg = RunConfig::from_args_and_env(args)?;

    let mut page = match cfg.template.as_deref() {
        Some(path) => Page::from_file(path)?,
        None => Page::with_default_template(),
    };

    let source: Box<dyn FeedSource> = if cfg.offline {
        Box::new(StaticFeedSource::sample())
    } else {
        let cache = if cfg.use_cache {
            DiskCache::default_location()
        } else {
            None
        };
        Box::new(HttpFeedSource::from_env(cache))
    };

    let outcome = bootstrap::run(source.as_ref(), &mut page, cfg.render_options())?;
    if !cfg.quiet {
        print_logs(&outcome);
    }

    let html = page.to_html()?;
    match cfg.out.as_deref() {
        Some(path) => write_file(path, &html)?,
        None => io::stdout()
            .write_all(html.as_bytes())
            .context("failed writing page to stdout")?,
    }

    if let Some(path) = cfg.summary.as_deref() {
        let json = serde_json::to_string_pretty(&outcome).context("serialize summary")?;
        write_file(path, &json)?;
    }
    Ok(())
}

fn print_logs(outcome: &RenderOutcome) {
    for line in &outcome.logs {
        eprintln!("{line}");
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
