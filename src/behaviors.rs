use super::*;

pub(crate) const SPINNER_MARKUP: &str = r#"<i class="fas fa-spinner fa-spin"></i>"#;
pub(crate) const DEFAULT_LOADING_LABEL: &str = "Processing...";

/// Attribute contract for the page behaviors. `Default` matches the markup
/// the behaviors were written against.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Style classes whose members fade in on scroll.
    pub reveal_classes: Vec<String>,
    /// Fraction of an element that must be visible before it reveals.
    pub reveal_threshold: f64,
    /// `rootMargin` shorthand applied to the viewport bounds.
    pub reveal_root_margin: String,
    /// Label shown while a submit button is loading, unless the button
    /// carries `data-loading-text`.
    pub loading_default_label: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            reveal_classes: vec!["product-card".to_string(), "feature-card".to_string()],
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            loading_default_label: DEFAULT_LOADING_LABEL.to_string(),
        }
    }
}

/// What one `install_behaviors` call wired up. All-zero on a repeated call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Anchors with a fragment href that received a click handler.
    pub anchors: usize,
    /// Elements prepared and observed for reveal-on-scroll.
    pub reveal_targets: usize,
    /// Opted-in submit buttons that received a click handler.
    pub loading_buttons: usize,
}

/// Behavior click handlers, stored as data in the listener store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Handler {
    /// Prevent fragment navigation and smooth-scroll to the target instead.
    SmoothAnchor,
    /// Swap the button content for a spinner and disable it, when the owning
    /// form validates.
    LoadingButton { default_label: String },
}

impl Page {
    /// Registers the three page behaviors: smooth anchor scrolling,
    /// reveal-on-scroll, and submit-button loading states.
    ///
    /// Guarded: a second call registers nothing and reports zero matches.
    /// Matching zero elements is not an error.
    pub fn install_behaviors(&mut self, config: BehaviorConfig) -> Result<InstallReport> {
        if self.behaviors_installed {
            self.trace_line("[install] skipped, already installed".to_string());
            return Ok(InstallReport::default());
        }
        self.behaviors_installed = true;

        let mut report = InstallReport::default();

        for anchor in self.dom.query_selector_all(r##"a[href^="#"]"##)? {
            self.listeners
                .add(anchor, "click".to_string(), Handler::SmoothAnchor);
            report.anchors += 1;
        }

        if !config.reveal_classes.is_empty() {
            let selector = config
                .reveal_classes
                .iter()
                .map(|class| format!(".{class}"))
                .collect::<Vec<_>>()
                .join(", ");
            let targets = self.dom.query_selector_all(&selector)?;

            let options = ObserverOptions {
                threshold: config.reveal_threshold,
                root_margin: RootMargin::parse(&config.reveal_root_margin)?,
            };
            let mut observer = ObserverState::new(options, ObserverAction::Reveal);
            for target in &targets {
                self.dom.set_style_property(*target, "opacity", "0")?;
                self.dom
                    .set_style_property(*target, "transform", "translateY(30px)")?;
                self.dom
                    .set_style_property(*target, "transition", "all 0.6s ease")?;
                observer.observe(*target);
                report.reveal_targets += 1;
            }
            self.add_observer(observer);
        }

        for button in self
            .dom
            .query_selector_all(r#"button[type="submit"][data-loading="true"]"#)?
        {
            self.listeners.add(
                button,
                "click".to_string(),
                Handler::LoadingButton {
                    default_label: config.loading_default_label.clone(),
                },
            );
            report.loading_buttons += 1;
        }

        self.trace_line(format!(
            "[install] anchors={} reveal={} buttons={}",
            report.anchors, report.reveal_targets, report.loading_buttons
        ));
        Ok(report)
    }

    pub fn behaviors_installed(&self) -> bool {
        self.behaviors_installed
    }

    pub(crate) fn run_handler(
        &mut self,
        handler: &Handler,
        node: NodeId,
        event: &mut EventState,
    ) -> Result<()> {
        match handler {
            Handler::SmoothAnchor => {
                event.default_prevented = true;
                let fragment = self
                    .dom
                    .attr(node, "href")
                    .and_then(|href| href.strip_prefix('#').map(str::to_string))
                    .unwrap_or_default();
                // A bare "#" yields an empty fragment, which matches nothing.
                if let Some(target) = self.dom.by_id(&fragment) {
                    self.scroll_node_into_view(target, ScrollBehavior::Smooth)?;
                }
                Ok(())
            }
            Handler::LoadingButton { default_label } => {
                let Some(form) = form_owner(&self.dom, node) else {
                    return Ok(());
                };
                if !check_form_validity(&self.dom, form) {
                    return Ok(());
                }
                let label = self
                    .dom
                    .attr(node, "data-loading-text")
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| default_label.clone());
                self.dom
                    .set_inner_html(node, &format!("{SPINNER_MARKUP} {label}"))?;
                self.dom.set_disabled(node, true)?;
                Ok(())
            }
        }
    }
}
