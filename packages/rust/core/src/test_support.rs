//! Deterministic doubles shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use seopress_shared::{
    ContentRecord, ContentType, GenerationOptions, ImageRef, Result, SeoPressError,
};

use crate::enrichment::{EnrichmentProgress, TaskKind, TaskOutcome};
use crate::generation::GenerationCapability;

type Responder = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// A generator that answers from a closure and records every call.
pub(crate) struct ScriptedGenerator {
    respond: Responder,
    delay: Option<(&'static str, Duration)>,
    calls: Mutex<Vec<(String, GenerationOptions)>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(respond: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose every call fails.
    pub(crate) fn failing() -> Self {
        Self::new(|_| Err(SeoPressError::Generation("provider unavailable".into())))
    }

    /// Sleep before answering prompts that contain `needle`.
    pub(crate) fn with_delay(mut self, needle: &'static str, delay: Duration) -> Self {
        self.delay = Some((needle, delay));
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub(crate) fn calls_containing(&self, needle: &str) -> Vec<(String, GenerationOptions)> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|(prompt, _)| prompt.contains(needle))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GenerationCapability for ScriptedGenerator {
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((prompt.to_string(), options.clone()));

        if let Some((needle, delay)) = self.delay {
            if prompt.contains(needle) {
                tokio::time::sleep(delay).await;
            }
        }

        (self.respond)(prompt)
    }
}

/// Progress sink that remembers task outcomes.
#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub(crate) phases: Mutex<Vec<String>>,
    pub(crate) outcomes: Mutex<Vec<(TaskKind, TaskOutcome)>>,
}

impl RecordingProgress {
    pub(crate) fn outcome_of(&self, kind: TaskKind) -> Option<TaskOutcome> {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| *outcome)
    }
}

impl EnrichmentProgress for RecordingProgress {
    fn phase(&self, name: &str) {
        self.phases.lock().expect("phases lock").push(name.to_string());
    }

    fn task_finished(&self, kind: TaskKind, outcome: TaskOutcome) {
        self.outcomes.lock().expect("outcomes lock").push((kind, outcome));
    }
}

/// A representative record of the given type.
pub(crate) fn sample_record(content_type: ContentType) -> ContentRecord {
    ContentRecord {
        content_type,
        title: "Nursing Associate Degree".into(),
        description: "A two-year nursing program for working adults.".into(),
        content: "Students complete clinical rotations at partner hospitals and \
                  earn a state-recognized associate degree."
            .into(),
        date: "2024-03-01T08:00:00Z".parse().expect("valid date"),
        slug: "nursing-associate-degree".into(),
        tags: vec!["nursing".into(), "adult education".into()],
        images: Vec::new(),
        meta_data: BTreeMap::from([("category".to_string(), "health".to_string())]),
    }
}

pub(crate) fn image(src: &str, alt: &str) -> ImageRef {
    ImageRef {
        src: src.into(),
        alt: alt.into(),
    }
}
