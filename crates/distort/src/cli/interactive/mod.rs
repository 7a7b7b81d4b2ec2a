//! Interactive mode for a bare `distort` invocation on a TTY.
//!
//! Menu-driven front end that ends up in the same `run::execute` path as
//! `distort run`.

pub mod run;
pub mod theme;

use console::Style;
use dialoguer::Select;
use distort_core::Config;

/// `Ok(Some(value))` on success, `Ok(None)` on Ctrl+C, `Err` otherwise.
///
/// Wraps `interact_text()` calls, which have no `_opt` variant.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const MENU_ITEMS: &[&str] = &["Distort a folder", "Show configuration", "Exit"];

/// Entry point for interactive mode.
pub fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::distort_theme();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => run::guided_run(config)?,
            Some(1) => show_config(config),
            Some(2) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Print the distortion ranges currently in effect.
fn show_config(config: &Config) {
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();
    let d = &config.distortion;

    let config_path = Config::default_path();
    let path_note = if config_path.exists() {
        "(exists)"
    } else {
        "(using defaults)"
    };

    eprintln!();
    eprintln!("  {}", cyan.apply_to("Current configuration:"));
    eprintln!();
    eprintln!(
        "    {:<20} {} {}",
        label.apply_to("Config file:"),
        config_path.display(),
        dim.apply_to(path_note)
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Step probability:"),
        d.gate_probability
    );
    eprintln!(
        "    {:<20} 0..={}°",
        label.apply_to("Rotation:"),
        d.max_rotation_degrees
    );
    eprintln!(
        "    {:<20} up to {}x{}",
        label.apply_to("Blur kernel:"),
        2 * d.max_blur_half_width + 1,
        2 * d.max_blur_half_width + 1
    );
    eprintln!(
        "    {:<20} σ = {}",
        label.apply_to("Noise:"),
        d.noise_stddev
    );
    eprintln!(
        "    {:<20} ±{}",
        label.apply_to("Brightness:"),
        d.brightness_limit
    );
    eprintln!(
        "    {:<20} {}..{}",
        label.apply_to("Contrast:"),
        d.contrast_min,
        d.contrast_max
    );
    eprintln!(
        "    {:<20} {} worker(s)",
        label.apply_to("Parallel:"),
        config.processing.parallel_workers
    );
    match config.processing.seed {
        Some(seed) => eprintln!("    {:<20} {}", label.apply_to("Seed:"), seed),
        None => eprintln!(
            "    {:<20} {}",
            label.apply_to("Seed:"),
            dim.apply_to("random per run")
        ),
    }
    eprintln!();
}
