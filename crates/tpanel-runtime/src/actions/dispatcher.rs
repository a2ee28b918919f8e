//! Action validation, routing and per-request context.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info};

use tpanel_core::{
    Action, ActionRejection, ActionRequest, EventBroadcaster, EventTarget, LineSink, LogLevel, ObserverId,
    PanelEvent, PanelSettings, ProcessRunner, StreamingRunner,
};

use super::{gemini, modules, remote, ssh};

/// Unexpected failure inside a handler.
///
/// Expected failures (a command exiting non-zero, a missing key) are reported
/// by the handler itself; this is everything else.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Forwards streamed output lines to one observer as `task_log` events.
pub struct ObserverLineSink<'a> {
    broadcaster: &'a dyn EventBroadcaster,
    observer: ObserverId,
}

impl<'a> ObserverLineSink<'a> {
    pub fn new(broadcaster: &'a dyn EventBroadcaster, observer: ObserverId) -> Self {
        Self {
            broadcaster,
            observer,
        }
    }
}

impl LineSink for ObserverLineSink<'_> {
    fn line(&self, level: LogLevel, message: String) {
        debug!(observer = %self.observer, ?level, "{}", message);
        self.broadcaster.emit(
            PanelEvent::task_log(level, message),
            EventTarget::Observer(self.observer),
        );
    }
}

/// What a handler sees of one request: the shared ports and who asked.
pub(super) struct RequestContext<'a> {
    pub(super) settings: &'a PanelSettings,
    pub(super) runner: &'a dyn ProcessRunner,
    pub(super) streamer: &'a dyn StreamingRunner,
    broadcaster: &'a dyn EventBroadcaster,
    requester: ObserverId,
}

impl RequestContext<'_> {
    /// Send an event to the requester only.
    pub(super) fn send(&self, event: PanelEvent) {
        self.broadcaster
            .emit(event, EventTarget::Observer(self.requester));
    }

    /// Send a one-shot `log` event to the requester.
    pub(super) fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.send(PanelEvent::log(level, message));
    }

    /// Sink that streams lines to the requester.
    pub(super) fn sink(&self) -> ObserverLineSink<'_> {
        ObserverLineSink::new(self.broadcaster, self.requester)
    }
}

/// Validates action requests and runs the matching handler.
pub struct ActionDispatcher {
    settings: Arc<PanelSettings>,
    runner: Arc<dyn ProcessRunner>,
    streamer: Arc<dyn StreamingRunner>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl ActionDispatcher {
    pub fn new(
        settings: Arc<PanelSettings>,
        runner: Arc<dyn ProcessRunner>,
        streamer: Arc<dyn StreamingRunner>,
        broadcaster: Arc<dyn EventBroadcaster>,
    ) -> Self {
        Self {
            settings,
            runner,
            streamer,
            broadcaster,
        }
    }

    fn context(&self, requester: ObserverId) -> RequestContext<'_> {
        RequestContext {
            settings: &self.settings,
            runner: self.runner.as_ref(),
            streamer: self.streamer.as_ref(),
            broadcaster: self.broadcaster.as_ref(),
            requester,
        }
    }

    /// Handle one request from `requester`.
    ///
    /// Never fails: rejections and handler errors are reported to the
    /// requester as a single `log` event.
    pub async fn dispatch(&self, requester: ObserverId, request: ActionRequest) {
        let ctx = self.context(requester);

        let validated = match Action::validate(&request, &self.settings) {
            Ok(action) => check_on_disk(action).await,
            Err(rejection) => Err(rejection),
        };
        let action = match validated {
            Ok(action) => action,
            Err(rejection) => {
                info!(observer = %requester, kind = %request.kind, %rejection, "Action rejected");
                ctx.log(rejection.level(), rejection.to_string());
                return;
            }
        };

        let kind = action.kind();
        info!(observer = %requester, action = %kind, "Running action");

        let outcome = match action {
            Action::ShowSshKey => ssh::show_ssh_key(&ctx).await,
            Action::EnableSsh => {
                ssh::enable_ssh(&ctx).await;
                Ok(())
            }
            Action::StartHttpServer => {
                ctx.log(
                    LogLevel::Info,
                    "HTTP server functionality integrated in main server",
                );
                Ok(())
            }
            Action::GeminiAuthStatus => {
                gemini::auth_status(&ctx).await;
                Ok(())
            }
            Action::GeminiLogin => {
                gemini::login(&ctx).await;
                Ok(())
            }
            Action::RunModule { name, script } => {
                modules::run_module(&ctx, &name, &script).await;
                Ok(())
            }
            Action::TestGithubSsh => {
                ssh::test_github_ssh(&ctx).await;
                Ok(())
            }
            Action::SetRepoRemoteSsh { repo } => {
                remote::set_repo_remote_ssh(&ctx, &repo).await;
                Ok(())
            }
        };

        match outcome {
            Ok(()) => debug!(observer = %requester, action = %kind, "Action finished"),
            Err(e) => {
                error!(observer = %requester, action = %kind, error = %e, "Action failed");
                ctx.log(LogLevel::Error, format!("Error processing action: {e}"));
            }
        }
    }
}

/// Reject actions whose script or repository is not on disk.
async fn check_on_disk(action: Action) -> Result<Action, ActionRejection> {
    match action {
        Action::RunModule { ref script, .. } => {
            let is_file = tokio::fs::metadata(script)
                .await
                .is_ok_and(|meta| meta.is_file());
            if !is_file {
                return Err(ActionRejection::ModuleScriptMissing(script.clone()));
            }
        }
        Action::SetRepoRemoteSsh { ref repo } => {
            if !tokio::fs::try_exists(repo).await.unwrap_or(false) {
                return Err(ActionRejection::PathNotFound(repo.clone()));
            }
        }
        _ => {}
    }
    Ok(action)
}
