//! Deterministic page-behavior runtime for Rust tests.
//!
//! Three client-side behaviors — smooth anchor scrolling, reveal-on-scroll,
//! and submit-button loading states — registered against an in-memory page
//! instead of a live browser document. The [`Page`] runtime provides the host
//! capabilities the behaviors need (DOM queries, event dispatch, constraint
//! validation, a scroll/viewport model with intersection observation) so the
//! behaviors stay host-agnostic and every observable effect is assertable
//! from a test.
//!
//! ```
//! use page_behaviors::{BehaviorConfig, Page};
//!
//! let mut page = Page::from_html(
//!     r##"
//!     <a id="nav" href="#pricing">Pricing</a>
//!     <section id="pricing" class="feature-card">...</section>
//!     "##,
//! )?;
//! page.install_behaviors(BehaviorConfig::default())?;
//! page.click("#nav")?;
//! assert_eq!(page.scroll_requests().len(), 1);
//! # Ok::<(), page_behaviors::Error>(())
//! ```

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

mod behaviors;
mod dom;
mod selector;
mod validity;
mod viewport;

pub use behaviors::{BehaviorConfig, InstallReport};
pub use viewport::{RootMargin, ScrollBehavior, ScrollRequest};

use behaviors::*;
use dom::*;
use selector::*;
use validity::*;
use viewport::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    HtmlParse(String),
    Dom(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Handler>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: String, handler: Handler) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default()
            .push(handler);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
}

impl EventState {
    fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
        }
    }
}

/// An in-memory page: parsed DOM, registered behavior handlers, and a
/// deterministic viewport. Built once from HTML, mutated through user
/// actions, discarded at the end of the test.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) observers: Vec<ObserverState>,
    pub(crate) layout_overrides: HashMap<NodeId, LayoutBox>,
    pub(crate) scroll_log: Vec<ScrollRequest>,
    pub(crate) scroll_y: f64,
    pub(crate) viewport_height: f64,
    pub(crate) behaviors_installed: bool,
    pub(crate) trace: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            observers: Vec::new(),
            layout_overrides: HashMap::new(),
            scroll_log: Vec::new(),
            scroll_y: 0.0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            behaviors_installed: false,
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
        })
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Dom(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if !self.trace {
            return;
        }
        self.trace_logs.push(line);
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
    }

    pub(crate) fn node_label(&self, node_id: NodeId) -> String {
        let tag = self.dom.tag_name(node_id).unwrap_or("#text");
        match self.dom.attr(node_id, "id") {
            Some(id) if !id.is_empty() => format!("{tag}#{id}"),
            _ => tag.to_string(),
        }
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    /// Clicks the first element matching the selector: dispatches `click`,
    /// then runs the default action unless a handler prevented it.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let event = self.dispatch_event(target, "click")?;
        if event.default_prevented {
            return Ok(());
        }
        self.run_default_click_action(target)
    }

    fn run_default_click_action(&mut self, target: NodeId) -> Result<()> {
        // Fragment navigation: instant jump to the referenced element.
        if let Some(href) = self.dom.attr(target, "href") {
            if self
                .dom
                .tag_name(target)
                .map(|t| t.eq_ignore_ascii_case("a"))
                .unwrap_or(false)
            {
                if let Some(fragment) = href.strip_prefix('#') {
                    if let Some(dest) = self.dom.by_id(fragment) {
                        self.scroll_node_into_view(dest, ScrollBehavior::Auto)?;
                    }
                    return Ok(());
                }
            }
        }

        // Submit controls fire their form's submit event, gated on
        // constraint validation as interactive submission is.
        if is_submit_control(&self.dom, target) {
            if let Some(form) = form_owner(&self.dom, target) {
                if check_form_validity(&self.dom, form) {
                    self.dispatch_event(form, "submit")?;
                }
            }
        }
        Ok(())
    }

    /// Programmatic submit: fires the owning form's submit event without
    /// constraint validation, like `form.submit()`.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if let Some(form) = form_owner(&self.dom, target) {
            self.dispatch_event(form, "submit")?;
        }
        Ok(())
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: "non-element".into(),
            })?
            .to_ascii_lowercase();

        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        let kind = self
            .dom
            .attr(target, "type")
            .unwrap_or_else(|| "text".into())
            .to_ascii_lowercase();
        if tag != "input" || (kind != "checkbox" && kind != "radio") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: format!("{tag}[type={kind}]"),
            });
        }

        if self.dom.checked(target)? != checked {
            if kind == "radio" && checked {
                self.uncheck_other_radios_in_group(target)?;
            }
            self.dom.set_checked(target, checked)?;
            self.dispatch_event(target, "change")?;
        }
        Ok(())
    }

    fn uncheck_other_radios_in_group(&mut self, target: NodeId) -> Result<()> {
        let Some(name) = self.dom.attr(target, "name") else {
            return Ok(());
        };
        let owner = form_owner(&self.dom, target);
        for candidate in self.dom.all_element_nodes() {
            if candidate == target {
                continue;
            }
            let is_group_radio = self
                .dom
                .tag_name(candidate)
                .map(|t| t.eq_ignore_ascii_case("input"))
                .unwrap_or(false)
                && self
                    .dom
                    .attr(candidate, "type")
                    .map(|t| t.eq_ignore_ascii_case("radio"))
                    .unwrap_or(false)
                && self.dom.attr(candidate, "name").as_deref() == Some(name.as_str())
                && form_owner(&self.dom, candidate) == owner;
            if is_group_radio {
                self.dom.set_checked(candidate, false)?;
            }
        }
        Ok(())
    }

    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        // Target first, then bubble toward the root.
        for node in path {
            event.current_target = node;
            let handlers = self.listeners.get(event.current_target, event_type);
            for handler in handlers {
                self.run_handler(&handler, node, &mut event)?;
            }
        }

        if self.trace {
            let label = self.node_label(event.target);
            self.trace_line(format!(
                "[event] {} target={label} default_prevented={}",
                event.event_type, event.default_prevented
            ));
        }
        Ok(event)
    }

    /// `checkValidity()` for the form owning the matched element (or the
    /// form itself).
    pub fn check_validity(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        let form = form_owner(&self.dom, target)
            .ok_or_else(|| Error::Dom(format!("no form owns target: {selector}")))?;
        Ok(check_form_validity(&self.dom, form))
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.dom.query_selector(selector)?.is_some())
    }

    /// Text content with whitespace normalized.
    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(normalize_whitespace(&self.dom.text_content(target)))
    }

    pub fn inner_html(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.inner_html(target)
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn disabled(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.disabled(target))
    }

    /// Inline style property value, if declared on the element.
    pub fn style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.style_property(target, property))
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        if self.dom.query_selector(selector)?.is_some() {
            Ok(())
        } else {
            Err(Error::SelectorNotFound(selector.to_string()))
        }
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = normalize_whitespace(&self.dom.text_content(target));
        if actual == expected {
            Ok(())
        } else {
            Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            })
        }
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual == expected {
            Ok(())
        } else {
            Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            })
        }
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_property(target, property);
        if actual.as_deref() == Some(expected) {
            Ok(())
        } else {
            Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected}"),
                actual: actual
                    .map(|value| format!("{property}: {value}"))
                    .unwrap_or_else(|| format!("{property} not declared")),
                dom_snippet: self.node_snippet(target),
            })
        }
    }
}

fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests;
