#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bootvisor::output::{Stream, Writer};
use bootvisor::{ClientError, Event, EventStream, ExecOptions, Runtime, Workload};
use tokio::sync::mpsc;

pub const ID: &str = "610036617aa165161127bc0cec60ae7831fdc1ddf1fdef1fb7f246cc83b0c315";
pub const SHORT: &str = "610036617aa1";

pub type Feed = mpsc::UnboundedSender<Result<Event, ClientError>>;

/// In-memory capability client.
pub struct FakeRuntime {
    workloads: HashMap<String, Workload>,
    exit_code: i64,
    output: String,
    fail_exec: bool,
    execs: Mutex<Vec<(String, ExecOptions)>>,
    feed: Mutex<Option<mpsc::UnboundedReceiver<Result<Event, ClientError>>>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self {
            workloads: HashMap::new(),
            exit_code: 0,
            output: String::new(),
            fail_exec: false,
            execs: Mutex::new(Vec::new()),
            feed: Mutex::new(None),
        }
    }

    pub fn with_workload(mut self, workload: Workload) -> Self {
        self.workloads.insert(workload.id.clone(), workload);
        self
    }

    pub fn with_exit_code(mut self, code: i64) -> Self {
        self.exit_code = code;
        self
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }

    pub fn failing_exec(mut self) -> Self {
        self.fail_exec = true;
        self
    }

    /// Returns the sender feeding the raw event stream.
    pub fn with_feed(self) -> (Self, Feed) {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.feed.lock().unwrap() = Some(rx);
        (self, tx)
    }

    /// Executions created so far: (workload, options).
    pub fn execs(&self) -> Vec<(String, ExecOptions)> {
        self.execs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Runtime for FakeRuntime {
    async fn inspect(&self, id: &str) -> Result<Workload, ClientError> {
        self.workloads.get(id).cloned().ok_or_else(|| ClientError::Inspect {
            id: id.to_string(),
            error: "no such container".to_string(),
        })
    }

    async fn create_exec(&self, workload: &str, opts: ExecOptions) -> Result<String, ClientError> {
        if self.fail_exec {
            return Err(ClientError::Exec {
                id: workload.to_string(),
                error: "exec refused".to_string(),
            });
        }
        let mut execs = self.execs.lock().unwrap();
        execs.push((workload.to_string(), opts));
        Ok(format!("exec-{}", execs.len()))
    }

    async fn start_exec(&self, _exec: &str, output: &mut Stream) -> Result<(), ClientError> {
        output.print(&self.output);
        Ok(())
    }

    async fn exec_exit_code(&self, _exec: &str) -> Result<i64, ClientError> {
        Ok(self.exit_code)
    }

    async fn events(&self) -> Result<EventStream, ClientError> {
        let rx = self.feed.lock().unwrap().take().ok_or_else(|| ClientError::Events {
            error: "no event feed".to_string(),
        })?;
        Ok(Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })))
    }
}

/// Log sink recording everything written to it.
pub fn capture() -> (Stream, Arc<Mutex<String>>) {
    let written = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&written);
    let writer: Writer = Arc::new(move |s: &str| sink.lock().unwrap().push_str(s));
    (Stream::new("", writer), written)
}

/// Polls `cond` until it holds or one second passed.
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

pub fn booting(label: &str) -> Workload {
    Workload::new(ID).with_label("boot", label)
}

pub fn start_event() -> Arc<Event> {
    Arc::new(Event::container("start", ID).with_attribute("image", "nginx"))
}
