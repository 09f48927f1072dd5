//! Scripted in-process page
//!
//! A `Scenario` describes a page as a sequence of named stages. Each stage
//! lists the elements visible in it; clicking an element can move the page to
//! another stage or fail as if the node had been detached. Waits are recorded
//! instead of slept, so flows run deterministically and instantly.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::{
    errors::PageError,
    port::PagePort,
    selector::SelectorList,
    types::{ElementHandle, LoadState},
};

/// Declarative page description, loadable from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// URL reported before any navigation
    pub url: String,

    /// Initial stage name; defaults to the first stage
    #[serde(default)]
    pub start: Option<String>,

    pub stages: Vec<Stage>,
}

impl Scenario {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            start: None,
            stages: Vec::new(),
        }
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,

    #[serde(default)]
    pub elements: Vec<ScriptedElement>,

    /// Network-idle waits in this stage time out
    #[serde(default)]
    pub network_busy: bool,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            network_busy: false,
        }
    }

    pub fn element(mut self, element: ScriptedElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn network_busy(mut self) -> Self {
        self.network_busy = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedElement {
    pub id: String,

    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub on_click: Option<ClickEffect>,
}

fn default_tag() -> String {
    "button".to_string()
}

impl ScriptedElement {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            text: String::new(),
            attributes: BTreeMap::new(),
            on_click: None,
        }
    }

    pub fn button(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, "button").text(text)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn goes_to(mut self, stage: impl Into<String>) -> Self {
        self.on_click = Some(ClickEffect::Goto(stage.into()));
        self
    }

    pub fn fails_with(mut self, message: impl Into<String>) -> Self {
        self.on_click = Some(ClickEffect::Fail(message.into()));
        self
    }

    fn handle(&self) -> ElementHandle {
        ElementHandle {
            node_id: self.id.clone(),
            tag: self.tag.to_ascii_lowercase(),
            text: self.text.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// What happens when a scripted element is clicked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickEffect {
    /// Re-render into the named stage
    Goto(String),
    /// Click fails as if the node had been detached
    Fail(String),
}

/// A wait the page was asked to perform
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedWait {
    LoadState(LoadState, Duration),
    Timeout(Duration),
}

#[derive(Debug)]
struct PageState {
    stage: usize,
    url: String,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    uploads: Vec<(String, PathBuf)>,
    waits: Vec<RecordedWait>,
    navigations: Vec<String>,
}

/// `PagePort` implementation driven by a `Scenario`
pub struct ScriptedPage {
    scenario: Scenario,
    state: Mutex<PageState>,
}

impl ScriptedPage {
    pub fn new(scenario: Scenario) -> Result<Self, PageError> {
        if scenario.stages.is_empty() {
            return Err(PageError::Navigation(
                "scenario must declare at least one stage".to_string(),
            ));
        }
        let stage = match &scenario.start {
            Some(name) => stage_index(&scenario, name)?,
            None => 0,
        };
        for element in scenario.stages.iter().flat_map(|s| s.elements.iter()) {
            if let Some(ClickEffect::Goto(target)) = &element.on_click {
                stage_index(&scenario, target)?;
            }
        }
        let url = scenario.url.clone();
        Ok(Self {
            scenario,
            state: Mutex::new(PageState {
                stage,
                url,
                clicks: Vec::new(),
                fills: Vec::new(),
                uploads: Vec::new(),
                waits: Vec::new(),
                navigations: Vec::new(),
            }),
        })
    }

    /// Name of the stage currently rendered
    pub fn current_stage(&self) -> String {
        let state = self.state.lock();
        self.scenario.stages[state.stage].name.clone()
    }

    /// Node ids clicked so far, in order
    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().fills.clone()
    }

    pub fn uploads(&self) -> Vec<(String, PathBuf)> {
        self.state.lock().uploads.clone()
    }

    pub fn waits(&self) -> Vec<RecordedWait> {
        self.state.lock().waits.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }

    fn visible(&self, state: &PageState) -> &[ScriptedElement] {
        &self.scenario.stages[state.stage].elements
    }

    fn find_attached(
        &self,
        state: &PageState,
        node_id: &str,
    ) -> Result<ScriptedElement, PageError> {
        self.visible(state)
            .iter()
            .find(|el| el.id == node_id)
            .cloned()
            .ok_or_else(|| PageError::Detached(format!("node {node_id} is no longer attached")))
    }
}

fn stage_index(scenario: &Scenario, name: &str) -> Result<usize, PageError> {
    scenario
        .stages
        .iter()
        .position(|s| s.name == name)
        .ok_or_else(|| PageError::Navigation(format!("unknown stage '{name}'")))
}

#[async_trait]
impl PagePort for ScriptedPage {
    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.state.lock().url.clone())
    }

    async fn goto(&self, url: &str) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.url = url.to_string();
        state.navigations.push(url.to_string());
        Ok(())
    }

    async fn wait_for_load_state(
        &self,
        load_state: LoadState,
        timeout: Duration,
    ) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state
            .waits
            .push(RecordedWait::LoadState(load_state, timeout));
        let busy = self.scenario.stages[state.stage].network_busy;
        if busy && load_state == LoadState::NetworkIdle {
            return Err(PageError::Timeout(format!(
                "{} not reached within {}ms",
                load_state.name(),
                timeout.as_millis()
            )));
        }
        Ok(())
    }

    async fn wait_for_timeout(&self, duration: Duration) -> Result<(), PageError> {
        self.state.lock().waits.push(RecordedWait::Timeout(duration));
        Ok(())
    }

    async fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.query_selector_all(selector).await?.into_iter().next())
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        let selector = SelectorList::parse(selector)?;
        let state = self.state.lock();
        Ok(self
            .visible(&state)
            .iter()
            .map(ScriptedElement::handle)
            .filter(|handle| selector.matches(handle))
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        let mut state = self.state.lock();
        let scripted = self.find_attached(&state, &element.node_id)?;
        match &scripted.on_click {
            Some(ClickEffect::Fail(message)) => {
                return Err(PageError::Detached(message.clone()));
            }
            Some(ClickEffect::Goto(target)) => {
                state.stage = stage_index(&self.scenario, target)?;
                debug!(node = %element.node_id, stage = %target, "scripted page re-rendered");
            }
            None => {}
        }
        state.clicks.push(element.node_id.clone());
        Ok(())
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        let mut state = self.state.lock();
        self.find_attached(&state, &element.node_id)?;
        state.fills.push((element.node_id.clone(), text.to_string()));
        Ok(())
    }

    async fn set_input_files(&self, element: &ElementHandle, path: &Path) -> Result<(), PageError> {
        let mut state = self.state.lock();
        let scripted = self.find_attached(&state, &element.node_id)?;
        if scripted.attributes.get("type").map(String::as_str) != Some("file") {
            return Err(PageError::Selector(format!(
                "node {} is not a file input",
                element.node_id
            )));
        }
        state
            .uploads
            .push((element.node_id.clone(), path.to_path_buf()));
        Ok(())
    }
}
