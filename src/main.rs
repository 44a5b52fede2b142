use std::{fs, io, path::Path};

use anyhow::Context;
use clap::Parser;
use script_console::{
    Session,
    config::Args,
    console::{ConsoleApp, run_batch},
};
use tracing::{Level, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let path = args.log_path();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .context("log file path has no file name")?;
    fs::create_dir_all(dir).with_context(|| format!("{}: cannot create log dir", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("{}: cannot open log file", path.display()))?;

    // the terminal belongs to the UI, so logs only go to the file
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(appender)
        .with_ansi(false)
        .init();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    info!(batch = args.batch, "script-console v{} starting", env!("CARGO_PKG_VERSION"));

    let mut session = Session::new(args.session_config());
    if args.batch {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        return run_batch(&mut session, stdin.lock(), &mut stdout);
    }

    let mut app = ConsoleApp::new(session);
    app.run()?;

    let history = app.session().history();
    info!(
        entries = history.committed().len(),
        transcript_lines = history.transcript().line_count(),
        "session ended"
    );
    Ok(())
}
