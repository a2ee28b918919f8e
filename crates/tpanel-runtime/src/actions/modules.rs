//! Setup module execution.

use std::path::Path;

use tpanel_core::{CommandLine, LogLevel, PanelEvent};

use super::dispatcher::RequestContext;

/// Set for every module run so scripts skip interactive prompts.
const AUTO_ENV: (&str, &str) = ("TERMUX_AI_AUTO", "1");

pub(super) async fn run_module(ctx: &RequestContext<'_>, name: &str, script: &Path) {
    let task = format!("module:{name}");
    ctx.send(PanelEvent::TaskStart { task: task.clone() });

    let command = CommandLine::new("bash")
        .arg(script)
        .env(AUTO_ENV.0, AUTO_ENV.1);
    let exit_code = ctx
        .streamer
        .stream(&command, &ctx.sink(), &format!("[{name}] "))
        .await;

    ctx.send(PanelEvent::TaskComplete { task, exit_code });
    if exit_code == 0 {
        ctx.log(LogLevel::Success, format!("Module {name} completed"));
    } else {
        ctx.log(
            LogLevel::Error,
            format!("Module {name} failed (exit {exit_code})"),
        );
    }
}
