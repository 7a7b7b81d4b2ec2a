//! Guided distortion flow.
//!
//! Source folder → destination folder → confirmation → `run::execute()`.

use crate::cli::run::RunArgs;
use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use distort_core::pipeline::FileDiscovery;
use distort_core::Config;
use std::path::PathBuf;

use super::theme::distort_theme;

/// Walk the user through choosing both folders, then run the batch.
pub fn guided_run(config: &Config) -> anyhow::Result<()> {
    let theme = distort_theme();
    let warn = Style::new().for_stderr().yellow();
    let dim = Style::new().for_stderr().dim();

    // ── Step 1: source folder ───────────────────────────────────────────────

    let (input, listing) = loop {
        let Some(path) = prompt_folder(&theme, "Folder with the source images")? else {
            return Ok(());
        };

        match FileDiscovery::new(config.processing.clone()).discover(&path) {
            Ok(listing) if listing.files.is_empty() => {
                eprintln!("  {}", warn.apply_to("That folder contains no files."));
            }
            Ok(listing) => break (path, listing),
            Err(e) => {
                eprintln!("  {}", warn.apply_to(e.to_string()));
            }
        }
    };

    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Found {} file(s) ({:.1} MB)",
            listing.files.len(),
            FileDiscovery::total_size(&listing.files) as f64 / 1_000_000.0
        ))
    );

    // ── Step 2: destination folder ──────────────────────────────────────────

    let output = loop {
        let Some(path) = prompt_folder(&theme, "Existing folder for the results")? else {
            return Ok(());
        };
        if path.is_dir() {
            break path;
        }
        eprintln!(
            "  {}",
            warn.apply_to(format!("Not a folder: {}", path.display()))
        );
    };

    // ── Step 3: confirmation ────────────────────────────────────────────────

    eprintln!();
    let bold = Style::new().for_stderr().bold();
    eprintln!(
        "  {}",
        bold.apply_to(format!("Ready to distort {} file(s)", listing.files.len()))
    );
    eprintln!(
        "  {}",
        dim.apply_to(format!("{} → {}", input.display(), output.display()))
    );
    eprintln!();

    let confirm = Confirm::with_theme(&theme)
        .with_prompt("Start?")
        .default(true)
        .interact_opt()?;
    if !matches!(confirm, Some(true)) {
        return Ok(());
    }

    let args = RunArgs {
        input,
        output,
        ..RunArgs::default()
    };
    let summary = crate::cli::run::execute(args, config)?;

    let green = Style::new().for_stderr().green();
    eprintln!(
        "  {} {} written, {} skipped",
        green.apply_to("✓"),
        summary.written(),
        summary.skipped()
    );

    // ── Post-run menu ───────────────────────────────────────────────────────

    eprintln!();
    let post_choice = Select::with_theme(&theme)
        .with_prompt("What next?")
        .items(&["Distort another folder", "Back to main menu"])
        .default(0)
        .interact_opt()?;

    if matches!(post_choice, Some(0)) {
        guided_run(config)?;
    }

    Ok(())
}

/// Prompt for a folder path, expanding `~`.
/// Returns `Ok(None)` on Ctrl+C.
fn prompt_folder(theme: &ColorfulTheme, prompt: &str) -> anyhow::Result<Option<PathBuf>> {
    let Some(raw) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    Ok(Some(PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())))
}
