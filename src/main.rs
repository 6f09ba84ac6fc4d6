use anyhow::Result;
use clap::Parser;
use servimatch::app::App;
use servimatch::cli::{print_error, Cli, CliContext};
use servimatch::styles::{init_theme, ThemeType};
use servimatch::tui::install_panic_hook;
use servimatch::utils::get_log_dir;
use std::process::ExitCode;

/// File logging: stdout belongs to the TUI.
fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(&log_dir, "servimatch.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let guard = init_logging()?;

    if cli.command.is_some() {
        let result = cli.execute();
        drop(guard);
        return result;
    }

    let ctx = CliContext::load(
        cli.config.as_deref(),
        cli.api_url.as_deref(),
        cli.token.as_deref(),
    )?;
    let Some(session) = ctx.session else {
        print_error("No hay sesión activa. Usa --token o `servimatch login <TOKEN>` primero.");
        drop(guard);
        return Ok(ExitCode::FAILURE);
    };

    let no_color = cli.no_colors || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let theme_type = if no_color {
        ThemeType::NoColor
    } else {
        ctx.config.theme.parse().unwrap_or_default()
    };
    init_theme(theme_type);

    install_panic_hook();
    let mut app = App::new(ctx.config, session)?;
    let result = app.run();

    drop(guard);
    result.map(|()| ExitCode::SUCCESS)
}
