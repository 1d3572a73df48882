mod cli;
mod config;
mod effects;
mod logging;
mod prefs;
mod render;
mod session;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dashboard_engine::ReqwestApi;
use dashboard_logging::{dash_error, dash_info};

use crate::cli::{Cli, Command, JobsCommand};
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::logging::LogSettings;
use crate::session::Session;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(&LogSettings::from_flags(cli.verbose, cli.log_file.as_deref()));
    dash_info!("recruit-dashboard {} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.reset_prefs {
        prefs::clear_prefs(&config.output_dir);
    }
    let api = ReqwestApi::new(config.api_settings()).context("failed to build the HTTP client")?;
    let mut session = Session::new(EffectRunner::new(Arc::new(api), config));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run(&mut session, cli.command, &mut out);
    session.close();
    out.flush()?;

    if let Err(err) = &result {
        dash_error!("Command failed: {err:#}");
    }
    result
}

fn run(session: &mut Session, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Candidates(args) => session.candidates(args, out),
        Command::Show { email } => session.show(&email, out),
        Command::SetStatus { email, status } => session.set_status(&email, status, out),
        Command::ResumeUrl { email } => session.resume_url(&email, out),
        Command::Jobs(JobsCommand::List { search, status }) => {
            session.list_jobs(search, status, out)
        }
        Command::Jobs(JobsCommand::Add(fields)) => session.add_job(fields, out),
        Command::Jobs(JobsCommand::Edit { id, fields }) => session.edit_job(&id, fields, out),
        Command::Jobs(JobsCommand::Delete { id, yes }) => {
            if !yes && !confirm(&format!("Delete job posting {id}?"), out)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            session.delete_job(&id, out)
        }
        Command::Upload { path } => session.upload(&path, out),
    }
}

fn confirm(question: &str, out: &mut dyn Write) -> anyhow::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
