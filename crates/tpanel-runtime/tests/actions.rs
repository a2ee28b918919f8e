//! Action dispatcher behavior against fake runners.

mod common;

use common::{Harness, Reply, log_level};
use serde_json::{Value, json};
use tpanel_core::{ActionRequest, EventTarget, LogLevel, ObserverId, PanelEvent};

fn request(value: Value) -> ActionRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn unknown_action_warns_without_running_anything() {
    let h = Harness::new();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "rm_rf", "params": {"path": "/"}})))
        .await;

    assert_eq!(
        h.events.logs(me),
        [(LogLevel::Warning, "Unknown action: rm_rf".to_string())]
    );
    assert_eq!(h.events.all().len(), 1);
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn disallowed_module_warns_without_running_anything() {
    let h = Harness::new();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(
            me,
            request(json!({"type": "run_module", "params": {"name": "99-evil"}})),
        )
        .await;

    let logs = h.events.logs(me);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].0, LogLevel::Warning);
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn allowed_module_without_script_is_an_error() {
    let h = Harness::new();
    // A directory named like the script does not count.
    std::fs::create_dir(h.home.path().join("02-neovim-setup.sh")).unwrap();
    let me = ObserverId::new();

    for name in ["01-zsh-setup", "02-neovim-setup"] {
        h.dispatcher
            .dispatch(
                me,
                request(json!({"type": "run_module", "params": {"name": name}})),
            )
            .await;
    }

    let logs = h.events.logs(me);
    assert_eq!(logs.len(), 2);
    for (level, message) in &logs {
        assert_eq!(*level, LogLevel::Error);
        assert!(message.starts_with("Module not found: "));
    }
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn remote_rewrite_of_missing_path_is_an_error() {
    let h = Harness::new();
    let me = ObserverId::new();
    let missing = h.home.path().join("no-such-repo");

    h.dispatcher
        .dispatch(
            me,
            request(json!({
                "type": "set_repo_remote_ssh",
                "params": {"path": missing.display().to_string()}
            })),
        )
        .await;

    assert_eq!(
        h.events.logs(me),
        [(
            LogLevel::Error,
            format!("Invalid repository path: {}", missing.display())
        )]
    );
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn run_module_streams_and_reports_exit_code() {
    let h = Harness::new();
    let script = h.home.path().join("01-zsh-setup.sh");
    std::fs::write(&script, "echo hi\n").unwrap();
    h.runner.reply(
        &format!("TERMUX_AI_AUTO=1 bash {}", script.display()),
        Reply::streaming(3, &[(false, "installing"), (true, "oops")]),
    );
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(
            me,
            request(json!({"type": "run_module", "params": {"name": "01-zsh-setup"}})),
        )
        .await;

    let events = h.events.for_observer(me);
    assert_eq!(
        events[..4],
        [
            PanelEvent::TaskStart {
                task: "module:01-zsh-setup".to_string()
            },
            PanelEvent::task_log(LogLevel::Info, "[01-zsh-setup] installing"),
            PanelEvent::task_log(LogLevel::Error, "[01-zsh-setup] oops"),
            PanelEvent::TaskComplete {
                task: "module:01-zsh-setup".to_string(),
                exit_code: 3
            },
        ]
    );
    assert_eq!(log_level(&events[4]), Some(LogLevel::Error));
    assert_eq!(events.len(), 5);
}

#[tokio::test]
async fn https_remote_is_rewritten_to_ssh() {
    let h = Harness::new();
    let repo = h.home.path().display().to_string();
    h.runner
        .reply(
            &format!("git -C {repo} remote get-url origin"),
            Reply::ok("https://github.com/owner/repo.git"),
        )
        .reply(
            &format!("git -C {repo} remote set-url origin git@github.com:owner/repo.git"),
            Reply::ok(""),
        );
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(
            me,
            request(json!({"type": "set_repo_remote_ssh", "params": {"path": repo}})),
        )
        .await;

    assert_eq!(h.runner.calls().len(), 2);
    assert_eq!(
        h.events.logs(me),
        [(
            LogLevel::Success,
            "Remote origin updated to SSH: git@github.com:owner/repo.git".to_string()
        )]
    );
}

#[tokio::test]
async fn unrecognized_remote_is_never_written() {
    let h = Harness::new();
    let repo = h.home.path().display().to_string();
    h.runner.reply(
        &format!("git -C {repo} remote get-url origin"),
        Reply::ok("/srv/git/project.git"),
    );
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(
            me,
            request(json!({"type": "set_repo_remote_ssh", "params": {"path": repo}})),
        )
        .await;

    assert!(h.runner.calls().iter().all(|c| !c.contains("set-url")));
    let logs = h.events.logs(me);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].0, LogLevel::Warning);
}

#[tokio::test]
async fn ssh_remote_is_left_alone() {
    let h = Harness::new();
    let repo = h.home.path().display().to_string();
    h.runner.reply(
        &format!("git -C {repo} remote get-url origin"),
        Reply::ok("git@github.com:owner/repo.git"),
    );
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(
            me,
            request(json!({"type": "set_repo_remote_ssh", "params": {"path": repo}})),
        )
        .await;

    assert_eq!(h.runner.calls().len(), 1);
    assert_eq!(h.events.logs(me)[0].0, LogLevel::Success);
}

#[tokio::test]
async fn unreadable_remote_is_an_error() {
    let h = Harness::new();
    let repo = h.home.path().display().to_string();
    h.runner.reply(
        &format!("git -C {repo} remote get-url origin"),
        Reply::exit(2, "", "error: No such remote 'origin'"),
    );
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(
            me,
            request(json!({"type": "set_repo_remote_ssh", "params": {"path": repo}})),
        )
        .await;

    assert_eq!(
        h.events.logs(me),
        [(
            LogLevel::Error,
            "Could not read remote: error: No such remote 'origin'".to_string()
        )]
    );
}

#[tokio::test]
async fn show_ssh_key_sends_trimmed_key() {
    let h = Harness::new();
    std::fs::create_dir_all(h.settings.ssh_public_key.parent().unwrap()).unwrap();
    std::fs::write(&h.settings.ssh_public_key, "ssh-ed25519 AAAA user@host\n").unwrap();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "show_ssh_key"})))
        .await;

    let events = h.events.for_observer(me);
    assert_eq!(
        events[0],
        PanelEvent::SshKey {
            key: "ssh-ed25519 AAAA user@host".to_string()
        }
    );
    assert_eq!(log_level(&events[1]), Some(LogLevel::Success));
}

#[tokio::test]
async fn missing_ssh_key_is_an_error() {
    let h = Harness::new();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "show_ssh_key"})))
        .await;

    let logs = h.events.logs(me);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].0, LogLevel::Error);
    assert!(logs[0].1.contains("ssh-keygen -t ed25519"));
}

#[tokio::test]
async fn unreadable_ssh_key_reports_processing_error() {
    // A directory where the key file should be makes the read fail.
    let h = Harness::new();
    std::fs::create_dir_all(&h.settings.ssh_public_key).unwrap();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "show_ssh_key"})))
        .await;

    let logs = h.events.logs(me);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].0, LogLevel::Error);
    assert!(logs[0].1.starts_with("Error processing action: "));
}

#[tokio::test]
async fn enable_ssh_outside_termux_only_warns() {
    let h = Harness::new();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "enable_ssh"})))
        .await;

    assert_eq!(h.events.logs(me)[0].0, LogLevel::Warning);
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn enable_ssh_inside_termux_runs_sv_enable() {
    let h = Harness::with_settings(|mut settings| {
        settings.termux_marker = settings.home_dir.clone();
        settings
    });
    h.runner.reply("sv-enable sshd", Reply::ok(""));
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "enable_ssh"})))
        .await;

    assert_eq!(h.runner.calls(), ["sv-enable sshd"]);
    assert_eq!(h.events.logs(me)[0].0, LogLevel::Success);
}

#[tokio::test]
async fn start_http_server_is_informational() {
    let h = Harness::new();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "start_http_server"})))
        .await;

    assert_eq!(h.events.logs(me)[0].0, LogLevel::Info);
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn gemini_auth_status_reports_failure_details() {
    let h = Harness::new();
    h.runner
        .reply("gemini auth test", Reply::exit(1, "", "not logged in"));
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "gemini_auth_status"})))
        .await;

    let events = h.events.for_observer(me);
    assert_eq!(log_level(&events[0]), Some(LogLevel::Warning));
    assert_eq!(
        events[1],
        PanelEvent::GeminiAuth {
            authenticated: false,
            details: "not logged in".to_string()
        }
    );
}

#[tokio::test]
async fn gemini_login_streams_then_rechecks() {
    let h = Harness::new();
    h.runner
        .reply(
            "gemini auth login",
            Reply::streaming(0, &[(false, "Open https://example.test to continue")]),
        )
        .reply("gemini auth test", Reply::ok("Logged in as user"));
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "gemini_login"})))
        .await;

    let events = h.events.for_observer(me);
    assert_eq!(log_level(&events[0]), Some(LogLevel::Info));
    assert_eq!(
        events[1],
        PanelEvent::task_log(LogLevel::Info, "[gemini] Open https://example.test to continue")
    );
    assert_eq!(log_level(&events[2]), Some(LogLevel::Success));
    assert_eq!(
        events[3],
        PanelEvent::GeminiAuth {
            authenticated: true,
            details: "Logged in as user".to_string()
        }
    );
}

#[tokio::test]
async fn github_ssh_test_accepts_exit_one() {
    let h = Harness::new();
    h.runner.reply(
        "ssh -o StrictHostKeyChecking=no -T git@github.com",
        Reply::streaming(1, &[(true, "Hi user! You've successfully authenticated")]),
    );
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "test_github_ssh"})))
        .await;

    let logs = h.events.logs(me);
    assert_eq!(
        logs,
        [(LogLevel::Success, "SSH test finished (exit 1)".to_string())]
    );
}

#[tokio::test]
async fn github_ssh_launch_failure_is_an_error() {
    let h = Harness::new();
    let me = ObserverId::new();

    h.dispatcher
        .dispatch(me, request(json!({"type": "test_github_ssh"})))
        .await;

    assert_eq!(h.events.logs(me)[0].0, LogLevel::Error);
}

#[tokio::test]
async fn concurrent_requests_are_not_cross_delivered() {
    let h = Harness::new();
    h.runner
        .reply("gemini auth test", Reply::ok("Logged in"))
        .reply(
            "ssh -o StrictHostKeyChecking=no -T git@github.com",
            Reply::streaming(255, &[(true, "Permission denied")]),
        );
    let alice = ObserverId::new();
    let bob = ObserverId::new();

    tokio::join!(
        h.dispatcher
            .dispatch(alice, request(json!({"type": "gemini_auth_status"}))),
        h.dispatcher
            .dispatch(bob, request(json!({"type": "test_github_ssh"}))),
    );

    assert!(
        h.events
            .all()
            .iter()
            .all(|(target, _)| matches!(target, EventTarget::Observer(id) if *id == alice || *id == bob))
    );
    assert!(
        h.events
            .for_observer(alice)
            .iter()
            .all(|e| matches!(e, PanelEvent::Log { .. } | PanelEvent::GeminiAuth { .. }))
    );
    assert!(
        h.events
            .for_observer(bob)
            .iter()
            .all(|e| matches!(e, PanelEvent::Log { .. } | PanelEvent::TaskLog { .. }))
    );
    assert_eq!(h.events.logs(bob).last().unwrap().0, LogLevel::Error);
}
