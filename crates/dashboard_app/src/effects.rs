use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use dashboard_core::{CandidateMatchRecord, Effect, ExportFormat, Msg};
use dashboard_engine::{
    resume_file_url, write_csv_export, write_pdf_export, DashboardApi, EngineCommand,
    EngineHandle, ExportError,
};
use dashboard_logging::{dash_info, dash_warn};

use crate::config::AppConfig;
use crate::prefs::save_prefs;

/// Executes effects: backend calls go to the engine thread, exports and
/// preference writes run inline and report back immediately.
pub struct EffectRunner {
    engine: EngineHandle,
    config: AppConfig,
    resume_urls: Vec<String>,
}

impl EffectRunner {
    pub fn new(api: Arc<dyn DashboardApi>, config: AppConfig) -> Self {
        Self {
            engine: EngineHandle::new(api),
            config,
            resume_urls: Vec::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs `effects` and returns the messages that completed synchronously.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut completed = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchMatches { request } => {
                    self.engine.submit(EngineCommand::FetchMatches { request });
                }
                Effect::FetchJobs { request, status } => {
                    self.engine
                        .submit(EngineCommand::FetchJobs { request, status });
                }
                Effect::UpdateStatus {
                    request,
                    email,
                    status,
                } => {
                    self.engine.submit(EngineCommand::UpdateStatus {
                        request,
                        email,
                        status,
                    });
                }
                Effect::CreateJob { request, draft } => {
                    self.engine.submit(EngineCommand::CreateJob { request, draft });
                }
                Effect::UpdateJob { request, id, draft } => {
                    self.engine
                        .submit(EngineCommand::UpdateJob { request, id, draft });
                }
                Effect::DeleteJob { request, id } => {
                    self.engine.submit(EngineCommand::DeleteJob { request, id });
                }
                Effect::UploadResume { request, path } => {
                    self.engine.submit(EngineCommand::UploadResume {
                        request,
                        path: PathBuf::from(path),
                    });
                }
                Effect::Export { format, records } => {
                    completed.push(self.export(format, &records));
                }
                Effect::OpenResumeFile { email } => {
                    match resume_file_url(&self.config.api_base, &email) {
                        Ok(url) => self.resume_urls.push(url.to_string()),
                        Err(err) => dash_warn!("No resume URL: {err}"),
                    }
                }
                Effect::PersistViewPrefs(prefs) => {
                    if let Err(err) = save_prefs(&self.config.output_dir, &prefs) {
                        dash_warn!("{err}");
                        completed.push(Msg::ViewPrefsSaveFailed(err.to_string()));
                    }
                }
            }
        }
        completed
    }

    fn export(&self, format: ExportFormat, records: &[CandidateMatchRecord]) -> Msg {
        let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();
        let options = self.config.export_options(Some(generated_at));
        let written = match format {
            ExportFormat::Csv => write_csv_export(records, &options),
            ExportFormat::Pdf => write_pdf_export(records, &options),
        };
        let result = written
            .map(|path| path.display().to_string())
            .map_err(|err: ExportError| {
                dash_warn!("Export to {} failed: {err}", format.as_str());
                err.to_string()
            });
        if result.is_ok() {
            dash_info!("Exported {} candidates as {}", records.len(), format.as_str());
        }
        Msg::ExportFinished { format, result }
    }

    /// Waits up to `timeout` for the next backend completion.
    pub fn next_event(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(|event| event.into_msg())
    }

    /// Resume URLs requested since the last call.
    pub fn take_resume_urls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.resume_urls)
    }
}
