mod cli;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};
use docpage::app::{PageManifest, ReplayScript, Result, build_page, document_html, run_script};

#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build { manifest, output, open } => {
            let manifest = PageManifest::load(&manifest)?;
            let doc = build_page(&manifest)?;
            let html = document_html(&doc);
            match output {
                Some(path) => {
                    write_output(&path, &html)?;
                    if open && let Err(e) = open::that(&path) {
                        log::warn!("could not open {}: {}", path.display(), e);
                    }
                }
                None => print!("{html}"),
            }
        }
        Commands::Replay {
            manifest,
            script,
            output,
            diff,
        } => {
            let manifest = PageManifest::load(&manifest)?;
            let script = ReplayScript::load(&script)?;
            let doc = build_page(&manifest)?;
            let report = run_script(doc, manifest.settings, &script, diff)?;

            for (index, step) in report.steps.iter().enumerate() {
                let mut line = format!("{:>3}. {}", index + 1, step.step);
                if !step.outcome.handled.is_empty() {
                    line.push_str(&format!(" -> {}", step.outcome.handled.join(", ")));
                }
                if step.outcome.default_prevented {
                    line.push_str(" (default prevented)");
                }
                println!("{line}");
            }
            for scroll in report.scroll_lines() {
                println!("scroll {scroll}");
            }
            println!("final scroll top: {:.1}", report.final_scroll_top);
            if let Some(diff) = &report.diff {
                print!("{diff}");
            }
            if let Some(path) = output {
                write_output(&path, &report.html)?;
            }
        }
    }
    Ok(())
}

fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
