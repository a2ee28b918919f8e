//! Shared fakes for runtime integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use tpanel_core::{
    CommandLine, CommandOutput, EventBroadcaster, EventTarget, LineSink, LogLevel, ObserverId,
    PanelEvent, PanelSettings, ProcessRunner, StreamingRunner,
};
use tpanel_runtime::ActionDispatcher;

/// Records every emitted event with its target.
#[derive(Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<(EventTarget, PanelEvent)>>,
}

impl EventBroadcaster for RecordingBroadcaster {
    fn emit(&self, event: PanelEvent, target: EventTarget) {
        self.events.lock().unwrap().push((target, event));
    }
}

impl RecordingBroadcaster {
    pub fn all(&self) -> Vec<(EventTarget, PanelEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Events delivered to `observer`, in order.
    pub fn for_observer(&self, observer: ObserverId) -> Vec<PanelEvent> {
        self.all()
            .into_iter()
            .filter(|(target, _)| *target == EventTarget::Observer(observer))
            .map(|(_, event)| event)
            .collect()
    }

    /// `(level, message)` of every `log` event delivered to `observer`.
    pub fn logs(&self, observer: ObserverId) -> Vec<(LogLevel, String)> {
        self.for_observer(observer)
            .into_iter()
            .filter_map(|event| match event {
                PanelEvent::Log { level, message } => Some((level, message)),
                _ => None,
            })
            .collect()
    }
}

/// Scripted replies for a command, keyed by its rendered form.
#[derive(Clone)]
pub struct Reply {
    pub output: CommandOutput,
    /// Lines streamed as `(is_stderr, text)`.
    pub lines: Vec<(bool, String)>,
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Self::exit(0, stdout, "")
    }

    pub fn exit(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            output: CommandOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code: code,
            },
            lines: Vec::new(),
        }
    }

    pub fn streaming(code: i32, lines: &[(bool, &str)]) -> Self {
        Self {
            lines: lines.iter().map(|(err, l)| (*err, (*l).to_string())).collect(),
            ..Self::exit(code, "", "")
        }
    }
}

/// Fake runner for both ports. Unknown commands fail to launch.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn reply(&self, command: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(command.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn lookup(&self, command: &CommandLine) -> Reply {
        let rendered = command.to_string();
        self.calls.lock().unwrap().push(rendered.clone());
        self.replies
            .lock()
            .unwrap()
            .get(&rendered)
            .cloned()
            .unwrap_or_else(|| Reply {
                output: CommandOutput::launch_failure(format!("no reply for {rendered}")),
                lines: Vec::new(),
            })
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &CommandLine) -> CommandOutput {
        self.lookup(command).output
    }
}

#[async_trait]
impl StreamingRunner for ScriptedRunner {
    async fn stream(&self, command: &CommandLine, sink: &dyn LineSink, prefix: &str) -> i32 {
        let reply = self.lookup(command);
        for (is_stderr, line) in reply.lines {
            let level = if is_stderr {
                LogLevel::Error
            } else {
                LogLevel::Info
            };
            sink.line(level, format!("{prefix}{line}"));
        }
        reply.output.exit_code
    }
}

/// A dispatcher wired to fakes, with settings rooted in a temp home.
pub struct Harness {
    pub home: TempDir,
    pub settings: Arc<PanelSettings>,
    pub runner: Arc<ScriptedRunner>,
    pub events: Arc<RecordingBroadcaster>,
    pub dispatcher: ActionDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(|settings| settings)
    }

    pub fn with_settings(adjust: impl FnOnce(PanelSettings) -> PanelSettings) -> Self {
        let home = TempDir::new().unwrap();
        let mut settings = PanelSettings::for_home(home.path()).with_modules_dir(home.path());
        settings.termux_marker = home.path().join("no-termux-here");
        let settings = Arc::new(adjust(settings));

        let runner = Arc::new(ScriptedRunner::default());
        let events = Arc::new(RecordingBroadcaster::default());
        let dispatcher = ActionDispatcher::new(
            Arc::clone(&settings),
            runner.clone(),
            runner.clone(),
            events.clone(),
        );

        Self {
            home,
            settings,
            runner,
            events,
            dispatcher,
        }
    }
}

/// Level of a one-shot `log` event, `None` for anything else.
pub const fn log_level(event: &PanelEvent) -> Option<LogLevel> {
    match event {
        PanelEvent::Log { level, .. } => Some(*level),
        _ => None,
    }
}
