//! Gemini CLI authentication actions.

use tpanel_core::{CommandLine, LogLevel, PanelEvent, ProcessRunner};

use super::dispatcher::RequestContext;

fn auth_command(subcommand: &str) -> CommandLine {
    CommandLine::new("gemini").args(["auth", subcommand])
}

/// Run `gemini auth test`; returns whether it passed and what it printed.
async fn check_auth(runner: &dyn ProcessRunner) -> (bool, String) {
    let output = runner.run(&auth_command("test")).await;
    let details = if output.success() && !output.stdout.is_empty() {
        output.stdout.clone()
    } else {
        output.diagnostics().to_string()
    };
    (output.success(), details)
}

pub(super) async fn auth_status(ctx: &RequestContext<'_>) {
    let (authenticated, details) = check_auth(ctx.runner).await;
    if authenticated {
        ctx.log(LogLevel::Success, "Gemini CLI authenticated");
    } else {
        ctx.log(
            LogLevel::Warning,
            format!("Gemini CLI not authenticated: {details}"),
        );
    }
    ctx.send(PanelEvent::GeminiAuth {
        authenticated,
        details,
    });
}

pub(super) async fn login(ctx: &RequestContext<'_>) {
    ctx.log(
        LogLevel::Info,
        "Starting Gemini CLI login (a browser window will open)...",
    );

    let exit_code = ctx
        .streamer
        .stream(&auth_command("login"), &ctx.sink(), "[gemini] ")
        .await;
    if exit_code == 0 {
        ctx.log(
            LogLevel::Success,
            "Gemini login finished. Checking status...",
        );
    } else {
        ctx.log(
            LogLevel::Warning,
            format!("Login process exited with code {exit_code}. Checking status anyway..."),
        );
    }

    let (authenticated, details) = check_auth(ctx.runner).await;
    ctx.send(PanelEvent::GeminiAuth {
        authenticated,
        details,
    });
}
