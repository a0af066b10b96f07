use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::client::{ApiError, ApiResult, TranscriberApi};
use crate::api::models::{
    CuratorSummary, JobId, JobRequest, JobStatus, KeySummary, ParagraphSummary,
    TranscriptionResult,
};
use crate::controller::composer::TranscriptView;
use crate::controller::events::{Announcer, DisplaySink, SinkUpdate, Sinks, StatusSink};
use crate::error::Priority;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

pub fn lock_env() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

pub fn processing(status: &str) -> ApiResult<JobStatus> {
    Ok(JobStatus {
        status: status.to_owned(),
        completed: false,
        success: Some(false),
        result: None,
        error: None,
    })
}

pub fn completed(result: TranscriptionResult) -> ApiResult<JobStatus> {
    Ok(JobStatus {
        status: "done".to_owned(),
        completed: true,
        success: Some(true),
        result: Some(result),
        error: None,
    })
}

pub fn failed(error: &str) -> ApiResult<JobStatus> {
    Ok(JobStatus {
        status: "failed".to_owned(),
        completed: true,
        success: Some(false),
        result: None,
        error: Some(error.to_owned()),
    })
}

pub fn single(text: &str) -> TranscriptionResult {
    TranscriptionResult::Single {
        text: text.to_owned(),
        language: Some("en".to_owned()),
    }
}

pub fn key_points() -> KeySummary {
    vec![ParagraphSummary {
        paragraph_summary: "first paragraph".to_owned(),
    }]
}

pub fn curator() -> CuratorSummary {
    CuratorSummary {
        title: "Title".to_owned(),
        one_line_summary: "One line".to_owned(),
        key_points: vec!["point".to_owned()],
    }
}

struct Scripted<T> {
    result: ApiResult<T>,
    delay: Duration,
}

/// Scripted `TranscriberApi`. Status scripts are per job; the last entry repeats.
#[derive(Default)]
pub struct FakeApi {
    created: Mutex<VecDeque<ApiResult<JobId>>>,
    statuses: Mutex<HashMap<String, VecDeque<ApiResult<JobStatus>>>>,
    status_delays: Mutex<HashMap<String, Duration>>,
    key_summary: Mutex<Option<Scripted<KeySummary>>>,
    curator_summary: Mutex<Option<Scripted<CuratorSummary>>>,
    calls: Mutex<Vec<String>>,
    submitted: Mutex<Vec<JobRequest>>,
    settled_status_calls: Mutex<Vec<String>>,
    status_in_flight: AtomicUsize,
    status_max_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn with_created(self, result: ApiResult<JobId>) -> Self {
        self.created.lock().expect("lock created").push_back(result);
        self
    }

    pub fn with_statuses(self, job: &str, script: Vec<ApiResult<JobStatus>>) -> Self {
        self.statuses
            .lock()
            .expect("lock statuses")
            .insert(job.to_owned(), script.into());
        self
    }

    pub fn with_status_delay(self, job: &str, delay: Duration) -> Self {
        self.status_delays
            .lock()
            .expect("lock delays")
            .insert(job.to_owned(), delay);
        self
    }

    pub fn with_key_summary(self, result: ApiResult<KeySummary>, delay: Duration) -> Self {
        *self.key_summary.lock().expect("lock key summary") = Some(Scripted { result, delay });
        self
    }

    pub fn with_curator_summary(self, result: ApiResult<CuratorSummary>, delay: Duration) -> Self {
        *self.curator_summary.lock().expect("lock curator") = Some(Scripted { result, delay });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock calls").clone()
    }

    pub fn status_calls(&self, job: &str) -> usize {
        let needle = format!("status:{job}");
        self.calls().iter().filter(|call| **call == needle).count()
    }

    /// Status calls for `job` that ran to completion (were not aborted).
    pub fn settled_status_calls(&self, job: &str) -> usize {
        self.settled_status_calls
            .lock()
            .expect("lock settled")
            .iter()
            .filter(|call| call.as_str() == job)
            .count()
    }

    pub fn max_status_in_flight(&self) -> usize {
        self.status_max_in_flight.load(Ordering::SeqCst)
    }

    pub fn submitted_urls(&self) -> Vec<String> {
        self.submitted
            .lock()
            .expect("lock submitted")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock calls").push(call);
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TranscriberApi for FakeApi {
    async fn create_job(&self, request: &JobRequest) -> ApiResult<JobId> {
        self.record("create".to_owned());
        self.submitted
            .lock()
            .expect("lock submitted")
            .push(request.clone());
        self.created
            .lock()
            .expect("lock created")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted job".to_owned())))
    }

    async fn job_status(&self, job_id: &JobId) -> ApiResult<JobStatus> {
        self.record(format!("status:{job_id}"));
        let now = self.status_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.status_max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _in_flight = InFlight(&self.status_in_flight);

        let delay = self
            .status_delays
            .lock()
            .expect("lock delays")
            .get(job_id.as_str())
            .copied()
            .unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let response = {
            let mut statuses = self.statuses.lock().expect("lock statuses");
            match statuses.get_mut(job_id.as_str()) {
                Some(script) if script.len() > 1 => script.pop_front(),
                Some(script) => script.front().cloned(),
                None => None,
            }
        };
        self.settled_status_calls
            .lock()
            .expect("lock settled")
            .push(job_id.as_str().to_owned());
        response.unwrap_or_else(|| Err(ApiError::Status {
            status: 404,
            detail: Some("작업을 찾을 수 없습니다".to_owned()),
        }))
    }

    async fn key_summary(&self, _text: &str) -> ApiResult<KeySummary> {
        self.record("key_summary".to_owned());
        let scripted = self.key_summary.lock().expect("lock key summary").take();
        match scripted {
            Some(Scripted { result, delay }) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(key_points()),
        }
    }

    async fn curator_summary(&self, _text: &str) -> ApiResult<CuratorSummary> {
        self.record("curator".to_owned());
        let scripted = self.curator_summary.lock().expect("lock curator").take();
        match scripted {
            Some(Scripted { result, delay }) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(curator()),
        }
    }
}

/// Captures every sink write. `log` keeps the global order across sinks.
#[derive(Default)]
pub struct Recorder {
    pub announcements: Mutex<Vec<(String, Priority)>>,
    pub statuses: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub transcripts: Mutex<Vec<Result<TranscriptView, String>>>,
    pub key_summaries: Mutex<Vec<Result<KeySummary, String>>>,
    pub curator_summaries: Mutex<Vec<Result<CuratorSummary, String>>>,
    pub log: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn sinks(self: &Arc<Self>) -> Sinks {
        Sinks {
            announcer: self.clone(),
            status: self.clone(),
            transcript: self.clone(),
            key_summary: self.clone(),
            curator_summary: self.clone(),
        }
    }

    pub fn announced(&self, message: &str) -> usize {
        self.announcements
            .lock()
            .expect("lock announcements")
            .iter()
            .filter(|(announced, _)| announced == message)
            .count()
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().expect("lock log").clone()
    }

    fn push_log(&self, entry: &str) {
        self.log.lock().expect("lock log").push(entry.to_owned());
    }
}

impl Announcer for Recorder {
    fn announce(&self, message: &str, priority: Priority) {
        self.push_log("announce");
        self.announcements
            .lock()
            .expect("lock announcements")
            .push((message.to_owned(), priority));
    }
}

impl StatusSink for Recorder {
    fn show_status(&self, status: &str) {
        self.push_log("status");
        self.statuses
            .lock()
            .expect("lock statuses")
            .push(status.to_owned());
    }

    fn show_error(&self, message: &str) {
        self.push_log("error");
        self.errors
            .lock()
            .expect("lock errors")
            .push(message.to_owned());
    }
}

fn owned<T: Clone>(update: SinkUpdate<'_, T>) -> Result<T, String> {
    match update {
        SinkUpdate::Ready(value) => Ok(value.clone()),
        SinkUpdate::Error(message) => Err(message.to_owned()),
    }
}

impl DisplaySink<TranscriptView> for Recorder {
    fn update(&self, update: SinkUpdate<'_, TranscriptView>) {
        self.push_log("transcript");
        self.transcripts
            .lock()
            .expect("lock transcripts")
            .push(owned(update));
    }
}

impl DisplaySink<KeySummary> for Recorder {
    fn update(&self, update: SinkUpdate<'_, KeySummary>) {
        self.push_log("key_summary");
        self.key_summaries
            .lock()
            .expect("lock key summaries")
            .push(owned(update));
    }
}

impl DisplaySink<CuratorSummary> for Recorder {
    fn update(&self, update: SinkUpdate<'_, CuratorSummary>) {
        self.push_log("curator");
        self.curator_summaries
            .lock()
            .expect("lock curator summaries")
            .push(owned(update));
    }
}
