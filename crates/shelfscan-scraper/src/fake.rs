//! In-memory [`Renderer`] for tests.
//!
//! A page is a tree of [`Node`]s. Each node lists the exact selector strings
//! it answers to, so a query matches a node only if the selector string is
//! one the node declared. Queries return matches in pre-order (document order).

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use shelfscan_core::ScrapeConfig;

use crate::error::RenderError;
use crate::pagination::{SCROLL_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};
use crate::renderer::Renderer;

pub(crate) const HOME: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    NextPage,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    selectors: Vec<String>,
    text: String,
    attrs: HashMap<String, String>,
    children: Vec<Node>,
    revealed_after_scrolls: usize,
    fail_text: bool,
    action: Option<Action>,
}

impl Node {
    pub(crate) fn new<const N: usize>(selectors: [&str; N]) -> Self {
        Self {
            selectors: selectors.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub(crate) fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Hidden from page queries until the page was scrolled `scrolls` times.
    pub(crate) fn revealed_after(mut self, scrolls: usize) -> Self {
        self.revealed_after_scrolls = scrolls;
        self
    }

    /// Reading this node's text fails, like a stale element would.
    pub(crate) fn failing_text(mut self) -> Self {
        self.fail_text = true;
        self
    }

    pub(crate) fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    fn matches(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }

    fn collect_descendants(&self, selector: &str, out: &mut Vec<Node>) {
        for child in &self.children {
            if child.matches(selector) {
                out.push(child.clone());
            }
            child.collect_descendants(selector, out);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakePage {
    nodes: Vec<Node>,
    heights: Vec<u64>,
}

impl FakePage {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            heights: Vec::new(),
        }
    }

    /// Successive `document.body.scrollHeight` readings; the last one repeats.
    pub(crate) fn with_heights(mut self, heights: Vec<u64>) -> Self {
        self.heights = heights;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Showing {
    List,
    Detail(String),
}

#[derive(Debug)]
struct State {
    list_pages: Vec<FakePage>,
    current_list: usize,
    scrolls: usize,
    height_reads: usize,
    details: HashMap<String, FakePage>,
    failing_opens: HashSet<String>,
    fail_navigate: bool,
    fail_current_context: bool,
    contexts: HashMap<u32, Showing>,
    active: u32,
    next_handle: u32,
    events: Vec<String>,
}

pub(crate) struct FakeRenderer {
    state: Mutex<State>,
}

impl FakeRenderer {
    /// A browser whose home context shows `list_pages[0]`; clicking a
    /// next-page control moves to the following list page.
    pub(crate) fn new(list_pages: Vec<FakePage>) -> Self {
        let mut contexts = HashMap::new();
        contexts.insert(HOME, Showing::List);
        Self {
            state: Mutex::new(State {
                list_pages,
                current_list: 0,
                scrolls: 0,
                height_reads: 0,
                details: HashMap::new(),
                failing_opens: HashSet::new(),
                fail_navigate: false,
                fail_current_context: false,
                contexts,
                active: HOME,
                next_handle: HOME + 1,
                events: Vec::new(),
            }),
        }
    }

    pub(crate) fn with_detail(self, url: &str, page: FakePage) -> Self {
        self.lock().details.insert(url.to_string(), page);
        self
    }

    /// Opening a context for `url` fails.
    pub(crate) fn with_failing_open(self, url: &str) -> Self {
        self.lock().failing_opens.insert(url.to_string());
        self
    }

    pub(crate) fn with_failing_navigation(self) -> Self {
        self.lock().fail_navigate = true;
        self
    }

    /// Asking for the active context fails, like a driver that lost the window.
    pub(crate) fn with_failing_current_context(self) -> Self {
        self.lock().fail_current_context = true;
        self
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    pub(crate) fn active_context(&self) -> u32 {
        self.lock().active
    }

    pub(crate) fn open_contexts(&self) -> usize {
        self.lock().contexts.len()
    }

    pub(crate) fn current_list_page(&self) -> usize {
        self.lock().current_list
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake renderer state poisoned")
    }
}

impl State {
    fn showing(&self) -> Result<&Showing, RenderError> {
        self.contexts
            .get(&self.active)
            .ok_or_else(|| RenderError::Context(format!("context {} is closed", self.active)))
    }

    fn visible_nodes(&self) -> Result<Vec<Node>, RenderError> {
        match self.showing()? {
            Showing::List => Ok(self
                .list_pages
                .get(self.current_list)
                .map(|p| {
                    p.nodes
                        .iter()
                        .filter(|n| n.revealed_after_scrolls <= self.scrolls)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()),
            Showing::Detail(url) => Ok(self
                .details
                .get(url)
                .map(|p| p.nodes.clone())
                .unwrap_or_default()),
        }
    }

    fn document_height(&mut self) -> u64 {
        let heights = self
            .list_pages
            .get(self.current_list)
            .map(|p| p.heights.clone())
            .unwrap_or_default();
        let read = self.height_reads;
        self.height_reads += 1;
        match heights.last() {
            Some(last) => *heights.get(read).unwrap_or(last),
            None => 1000,
        }
    }

    fn reset_list_page(&mut self, index: usize) {
        self.current_list = index;
        self.scrolls = 0;
        self.height_reads = 0;
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    type Element = Node;
    type Context = u32;

    async fn navigate(&self, url: &str) -> Result<(), RenderError> {
        let mut state = self.lock();
        state.events.push(format!("navigate:{url}"));
        if state.fail_navigate {
            return Err(RenderError::Driver("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        let active = state.active;
        state.contexts.insert(active, Showing::List);
        state.reset_list_page(0);
        Ok(())
    }

    async fn execute(&self, script: &str) -> Result<Value, RenderError> {
        let mut state = self.lock();
        if script == SCROLL_HEIGHT_SCRIPT {
            Ok(Value::from(state.document_height()))
        } else if script == SCROLL_TO_BOTTOM_SCRIPT {
            state.scrolls += 1;
            state.events.push("scroll".to_string());
            Ok(Value::Null)
        } else {
            Err(RenderError::Script(format!("unsupported script: {script}")))
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Node>, RenderError> {
        let state = self.lock();
        let mut out = Vec::new();
        for node in state.visible_nodes()? {
            if node.matches(selector) {
                out.push(node.clone());
            }
            node.collect_descendants(selector, &mut out);
        }
        Ok(out)
    }

    async fn find_all_within(&self, parent: &Node, selector: &str) -> Result<Vec<Node>, RenderError> {
        let mut out = Vec::new();
        parent.collect_descendants(selector, &mut out);
        Ok(out)
    }

    async fn text(&self, element: &Node) -> Result<String, RenderError> {
        if element.fail_text {
            return Err(RenderError::Driver("stale element reference".to_string()));
        }
        Ok(element.text.clone())
    }

    async fn attribute(&self, element: &Node, name: &str) -> Result<Option<String>, RenderError> {
        Ok(element.attrs.get(name).cloned())
    }

    async fn click(&self, element: &Node) -> Result<(), RenderError> {
        let mut state = self.lock();
        match element.action {
            Some(Action::NextPage) => {
                state.events.push("click:next".to_string());
                let next = state.current_list + 1;
                state.reset_list_page(next);
            }
            None => state.events.push("click".to_string()),
        }
        Ok(())
    }

    async fn scroll_into_view(&self, _element: &Node) -> Result<(), RenderError> {
        self.lock().events.push("scroll_into_view".to_string());
        Ok(())
    }

    async fn current_context(&self) -> Result<u32, RenderError> {
        let state = self.lock();
        if state.fail_current_context {
            return Err(RenderError::Context("no such window".to_string()));
        }
        Ok(state.active)
    }

    async fn open_context(&self, url: &str) -> Result<u32, RenderError> {
        let mut state = self.lock();
        if state.failing_opens.contains(url) {
            state.events.push(format!("open_failed:{url}"));
            return Err(RenderError::Context(format!("could not open {url}")));
        }
        let handle = state.next_handle;
        state.next_handle += 1;
        state.contexts.insert(handle, Showing::Detail(url.to_string()));
        state.active = handle;
        state.events.push(format!("open:{url}"));
        Ok(handle)
    }

    async fn switch_context(&self, context: &u32) -> Result<(), RenderError> {
        let mut state = self.lock();
        if !state.contexts.contains_key(context) {
            return Err(RenderError::Context(format!("no such context {context}")));
        }
        state.active = *context;
        state.events.push(format!("switch:{context}"));
        Ok(())
    }

    async fn close_context(&self, context: &u32) -> Result<(), RenderError> {
        let mut state = self.lock();
        if state.contexts.remove(context).is_none() {
            return Err(RenderError::Context(format!("no such context {context}")));
        }
        state.events.push(format!("close:{context}"));
        Ok(())
    }
}

/// Config with the default selectors and waits short enough for tests.
pub(crate) fn test_config() -> ScrapeConfig {
    ScrapeConfig {
        start_url: "https://f1store.formula1.com/en/".to_string(),
        page_wait: Duration::from_millis(40),
        scroll_pause: Duration::ZERO,
        detail_wait: Duration::from_millis(30),
        settle_delay: Duration::ZERO,
        poll_interval: Duration::from_millis(5),
        ..ScrapeConfig::default()
    }
}

/// A listing card in the storefront's primary markup.
pub(crate) fn card(title: &str, href: &str, price: &str) -> Node {
    Node::new(["div.ds-card"])
        .child(
            Node::new(["a"])
                .attr("href", href)
                .child(Node::new(["[class*='title']"]).text(title)),
        )
        .child(Node::new(["[class*='price']"]).text(price))
}

pub(crate) fn next_control(disabled: bool) -> Node {
    Node::new(["a[data-trk-id='next-page']"])
        .attr("aria-disabled", if disabled { "true" } else { "false" })
        .action(Action::NextPage)
}

pub(crate) fn current_page_marker() -> Node {
    Node::new(["a.page-link.current-page"])
}

/// A listing page: cards, the current-page marker, and a next control.
pub(crate) fn list_page(cards: Vec<Node>, has_next: bool) -> FakePage {
    let mut nodes = cards;
    nodes.push(current_page_marker());
    nodes.push(next_control(!has_next));
    FakePage::new(nodes)
}

/// An in-stock size option; `value` is the paired input's value attribute.
pub(crate) fn size_label(value: Option<&str>, text: &str) -> Node {
    let mut label = Node::new(["label.size-selector-button.available"]);
    if let Some(value) = value {
        label = label.child(Node::new(["input[name='size-selector']"]).attr("value", value));
    }
    label.child(Node::new([".size-text, span"]).text(text))
}

/// A detail page with a size picker holding `labels`.
pub(crate) fn detail_page(labels: Vec<Node>) -> FakePage {
    let mut picker = Node::new([".size-selector-list, [class*='size-selector']"]);
    for label in labels {
        picker = picker.child(label);
    }
    FakePage::new(vec![picker])
}
