//! Test doubles for the fetch and reasoning seams.
//!
//! Both mocks record their calls through a shared counter handle so tests
//! can assert on invocation counts after the subject under test has taken
//! ownership of the mock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{FetchError, FetchResult, ProviderError, ProviderResult};
use crate::traits::{PageRenderer, ReasoningProvider, RenderedPage};

/// Cloneable handle onto a mock's call counter.
#[derive(Clone, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Scripted failure behaviour for [`MockProvider`].
#[derive(Debug, Clone, Copy)]
pub enum ProviderScript {
    /// Every call fails with a capacity-class error.
    AlwaysCapacity,
    /// Every call fails with a non-capacity API error.
    AlwaysFail,
    /// The first `failures` calls fail with capacity errors, then calls
    /// return the configured response.
    CapacityThenSucceed { failures: u32 },
}

/// A [`ReasoningProvider`] double with a fixed response and optional
/// failure script.
pub struct MockProvider {
    name: String,
    response: String,
    script: Option<ProviderScript>,
    calls: CallCounter,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: String::new(),
            script: None,
            calls: CallCounter::default(),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    pub fn with_script(mut self, script: ProviderScript) -> Self {
        self.script = Some(script);
        self
    }

    /// Handle for asserting call counts after the mock is moved.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    fn capacity_error(&self) -> ProviderError {
        ProviderError::Capacity {
            provider: self.name.clone(),
            message: "rate limit exceeded".to_string(),
        }
    }
}

#[async_trait]
impl ReasoningProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> ProviderResult<String> {
        self.calls.increment();
        let call_number = self.calls.count();

        match self.script {
            Some(ProviderScript::AlwaysCapacity) => Err(self.capacity_error()),
            Some(ProviderScript::AlwaysFail) => Err(ProviderError::Api {
                provider: self.name.clone(),
                message: "internal server error".to_string(),
            }),
            Some(ProviderScript::CapacityThenSucceed { failures })
                if call_number <= failures as usize =>
            {
                Err(self.capacity_error())
            }
            _ => Ok(self.response.clone()),
        }
    }
}

/// A [`PageRenderer`] double that serves pre-seeded pages by URL.
pub struct MockRenderer {
    pages: Mutex<HashMap<String, RenderedPage>>,
    calls: CallCounter,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            calls: CallCounter::default(),
        }
    }

    /// Seed a page the renderer will return for `url`.
    pub fn with_page(
        self,
        url: impl Into<String>,
        markdown: impl Into<String>,
        links: Vec<String>,
    ) -> Self {
        {
            let mut pages = self.pages.lock().unwrap();
            pages.insert(
                url.into(),
                RenderedPage {
                    markdown: markdown.into(),
                    links,
                    title: None,
                },
            );
        }
        self
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render(&self, url: &str) -> FetchResult<RenderedPage> {
        self.calls.increment();
        let pages = self.pages.lock().unwrap();
        pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Render(format!("no page seeded for {url}")))
    }
}
