//! Scripted in-memory page driver for controller and extraction tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use profile_scraper::page_extractor::js_scripts::{
    DOM_SNAPSHOT_JS, READY_STATE_JS, SCROLL_POSITION_JS, SCROLL_STEP_JS, SECTION_ITEMS_FN,
};
use profile_scraper::{
    BrowserError, BrowserResult, Config, NavigationResponse, OutputMode, PageDriver, PageSession,
    SessionFactory, WaitStrategy,
};

pub const PROFILE_URL: &str = "https://www.linkedin.com/in/ada-lovelace";
pub const VIEWPORT_HEIGHT: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Status(u16),
    NoResponse,
    Fail,
    /// The session itself cannot be opened
    FailOpen,
}

/// Everything a scripted page answers with
#[derive(Debug, Clone)]
pub struct PageScript {
    pub navigation: Navigation,
    pub final_url: String,
    pub title: String,
    pub markup: String,
    /// Present and visible elements by selector
    pub elements: HashMap<String, usize>,
    /// Present but not rendered
    pub hidden: HashSet<String>,
    /// Close controls whose click fails
    pub broken_clicks: HashSet<String>,
    pub dom: Value,
    pub sections: HashMap<String, Vec<String>>,
    pub document_height: f64,
}

impl PageScript {
    /// A healthy logged-out profile page
    pub fn profile() -> Self {
        let sections = HashMap::from([
            (
                "Experience".to_string(),
                vec![
                    "Software Engineer Google 2020 - Present 1 year 2 months".to_string(),
                    "  Software Engineer   Google 2020 - Present 1 year 2 months ".to_string(),
                    "Show more".to_string(),
                ],
            ),
            (
                "Education".to_string(),
                vec!["University of London 1830 - 1835 Mathematics".to_string()],
            ),
        ]);

        PageScript {
            navigation: Navigation::Status(200),
            final_url: PROFILE_URL.to_string(),
            title: "Ada Lovelace - Analyst | LinkedIn".to_string(),
            markup: profile_markup(),
            elements: HashMap::new(),
            hidden: HashSet::new(),
            broken_clicks: HashSet::new(),
            dom: json!({
                "heading": "Augusta A. King",
                "headline": "Mathematician",
                "location": "London, England, United Kingdom",
                "about": "  First   programmer ",
                "currentCompany": null,
                "educationTop": "University of London",
                "subline": ["London", "1,204 followers", "500+ connections", "1,204 followers"],
            }),
            sections,
            document_height: 3.0 * VIEWPORT_HEIGHT,
        }
    }

    /// Redirected to the sign-in wall
    pub fn auth_wall() -> Self {
        PageScript {
            final_url: "https://www.linkedin.com/authwall?trk=public_profile".to_string(),
            title: "Sign Up | LinkedIn".to_string(),
            ..PageScript::profile()
        }
        .with_element(".authwall-join-form")
    }

    pub fn navigation(mut self, navigation: Navigation) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn markup(mut self, markup: &str) -> Self {
        self.markup = markup.to_string();
        self
    }

    pub fn with_element(mut self, selector: &str) -> Self {
        *self.elements.entry(selector.to_string()).or_default() += 1;
        self
    }

    pub fn with_hidden(mut self, selector: &str) -> Self {
        self.hidden.insert(selector.to_string());
        self
    }

    pub fn with_broken_click(mut self, selector: &str) -> Self {
        self.broken_clicks.insert(selector.to_string());
        self
    }

    pub fn without_section(mut self, label: &str) -> Self {
        self.sections.remove(label);
        self
    }
}

/// Markup with JSON-LD, OpenGraph and filler well past the minimum length
pub fn profile_markup() -> String {
    let filler = "<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit.</p>\n".repeat(30);
    format!(
        r#"<!DOCTYPE html><html><head>
<title>Ada Lovelace - Analyst | LinkedIn</title>
<meta name="description" content="Ada Lovelace &amp; the Analytical Engine">
<meta property="og:title" content="Augusta Ada King - Countess | LinkedIn">
<meta property="og:description" content="Countess of Lovelace">
<script type="application/ld+json">{{"@context":"http://schema.org","@type":"Person" broken</script>
<script type="application/ld+json">
{{"@context":"http://schema.org","@graph":[
  {{"@type":"Person","name":"Ada Lovelace","jobTitle":["Analyst"],
    "address":{{"@type":"PostalAddress","addressLocality":"London"}}}}
]}}
</script>
</head><body>{filler}</body></html>"#
    )
}

/// Everything the sessions did, shared with the test
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

/// Hands out one scripted session per `open()`, in order
pub struct ScriptedFactory {
    scripts: Mutex<VecDeque<PageScript>>,
    pub recorder: Recorder,
}

impl ScriptedFactory {
    pub fn new(scripts: Vec<PageScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            recorder: Recorder::default(),
        }
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    type Session = ScriptedSession;

    async fn open(&self) -> BrowserResult<ScriptedSession> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BrowserError::LaunchFailed("no scripted session left".into()))?;
        if script.navigation == Navigation::FailOpen {
            return Err(BrowserError::LaunchFailed("scripted launch failure".into()));
        }
        self.recorder.opens.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession::with_recorder(script, self.recorder.clone()))
    }
}

struct SessionState {
    script: PageScript,
    scrolls: u32,
}

pub struct ScriptedSession {
    state: Mutex<SessionState>,
    recorder: Recorder,
}

impl ScriptedSession {
    pub fn new(script: PageScript) -> Self {
        Self::with_recorder(script, Recorder::default())
    }

    pub fn with_recorder(script: PageScript, recorder: Recorder) -> Self {
        Self {
            state: Mutex::new(SessionState { script, scrolls: 0 }),
            recorder,
        }
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn scrolls(&self) -> u32 {
        self.state.lock().unwrap().scrolls
    }
}

#[async_trait]
impl PageDriver for ScriptedSession {
    async fn navigate(
        &self,
        url: &str,
        _wait: WaitStrategy,
        _timeout: Duration,
    ) -> BrowserResult<Option<NavigationResponse>> {
        self.recorder.push(format!("navigate:{url}"));
        let state = self.state.lock().unwrap();
        match state.script.navigation {
            Navigation::Status(status) => Ok(Some(NavigationResponse {
                status: Some(status),
                url: state.script.final_url.clone(),
            })),
            Navigation::NoResponse => Ok(None),
            Navigation::Fail | Navigation::FailOpen => {
                Err(BrowserError::Timeout("navigation after 10ms".into()))
            }
        }
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<Value> {
        let mut state = self.state.lock().unwrap();
        let value = if script == DOM_SNAPSHOT_JS {
            state.script.dom.clone()
        } else if script == SCROLL_STEP_JS {
            state.scrolls += 1;
            Value::Bool(true)
        } else if script == SCROLL_POSITION_JS {
            json!({
                "bottom": VIEWPORT_HEIGHT * f64::from(state.scrolls + 1),
                "height": state.script.document_height,
            })
        } else if script == READY_STATE_JS {
            Value::String("complete".into())
        } else {
            return Err(BrowserError::Evaluation(format!("unscripted: {script}")));
        };
        Ok(value)
    }

    async fn evaluate_function(&self, declaration: &str, args: Vec<Value>) -> BrowserResult<Value> {
        if declaration != SECTION_ITEMS_FN {
            return Err(BrowserError::Evaluation("unscripted function".into()));
        }
        let label = args.first().and_then(Value::as_str).unwrap_or_default();
        let state = self.state.lock().unwrap();
        Ok(state
            .script
            .sections
            .get(label)
            .map(|items| json!(items))
            .unwrap_or(Value::Null))
    }

    async fn count(&self, selector: &str, _timeout: Duration) -> BrowserResult<usize> {
        let state = self.state.lock().unwrap();
        let visible = state.script.elements.get(selector).copied().unwrap_or(0);
        let hidden = usize::from(state.script.hidden.contains(selector));
        Ok(visible + hidden)
    }

    async fn is_visible(&self, selector: &str, _timeout: Duration) -> BrowserResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.script.elements.contains_key(selector))
    }

    async fn click(&self, selector: &str, _timeout: Duration) -> BrowserResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.script.broken_clicks.contains(selector) {
            return Err(BrowserError::Interaction(format!("click '{selector}' intercepted")));
        }
        self.recorder.push(format!("click:{selector}"));
        // A close control removes the overlay it belongs to
        state
            .script
            .elements
            .retain(|target, _| !selector.contains(target.as_str()) && !is_overlay_of(target, selector));
        Ok(())
    }

    async fn press_key(&self, key: &str) -> BrowserResult<()> {
        self.recorder.push(format!("key:{key}"));
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.state.lock().unwrap().script.final_url.clone())
    }

    async fn title(&self) -> BrowserResult<String> {
        Ok(self.state.lock().unwrap().script.title.clone())
    }

    async fn full_markup(&self) -> BrowserResult<String> {
        Ok(self.state.lock().unwrap().script.markup.clone())
    }
}

/// Pairs the overlay roots with close controls that do not embed the root
/// selector text.
fn is_overlay_of(target: &str, close: &str) -> bool {
    matches!(
        (target, close),
        (".modal__overlay--visible", "button.modal__dismiss")
            | ("#artdeco-global-alert-container", "button[action-type=\"ACCEPT\"]")
    )
}

#[async_trait]
impl PageSession for ScriptedSession {
    async fn close(self) {
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        self.recorder.push("close".to_string());
    }
}

/// Zero delays, output under `dir`
pub fn test_config(dir: &Path) -> Config {
    Config {
        max_retries: 3,
        retry_backoff_ms: 0,
        scroll_settle_ms: 0,
        output_file: dir.join("profiles.json"),
        output_mode: OutputMode::Append,
        ..Config::default()
    }
}
