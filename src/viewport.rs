use super::*;

pub(crate) const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;
pub(crate) const DEFAULT_BLOCK_HEIGHT: f64 = 100.0;

/// How a scroll was requested, mirroring `scroll-behavior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Instant jump, the default action of fragment navigation.
    Auto,
    /// Animated scroll. The animation itself is presentation; the runtime
    /// records the request and moves the viewport in one step.
    Smooth,
}

/// One recorded scroll invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    /// `id` attribute of the element scrolled into view, when one was given.
    pub target_id: Option<String>,
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Element geometry in the flat flow model, in logical pixels from the
/// document top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayoutBox {
    pub(crate) top: f64,
    pub(crate) height: f64,
}

/// Four-value margin applied to the viewport bounds, like `rootMargin`.
/// Negative values shrink the effective viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Parses the CSS shorthand (`"0px 0px -50px 0px"`); one to four values,
    /// px units optional.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut values = Vec::new();
        for token in raw.split_whitespace() {
            let token = token.strip_suffix("px").unwrap_or(token);
            let value = token
                .parse::<f64>()
                .map_err(|_| Error::Dom(format!("invalid root margin: {raw}")))?;
            values.push(value);
        }
        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return Err(Error::Dom(format!("invalid root margin: {raw}"))),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ObserverOptions {
    pub(crate) threshold: f64,
    pub(crate) root_margin: RootMargin,
}

/// What an observer does with a delivered entry. Handlers are data, so
/// delivery never needs to borrow the page twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObserverAction {
    /// Fade the target in: opacity 1, identity transform. Idempotent.
    Reveal,
}

#[derive(Debug, Clone)]
pub(crate) struct ObserverState {
    pub(crate) options: ObserverOptions,
    pub(crate) action: ObserverAction,
    pub(crate) observed: Vec<NodeId>,
    /// Last reported intersecting state per element; entries are only
    /// re-delivered on a state change.
    pub(crate) last_state: HashMap<NodeId, bool>,
    /// Elements observed but not yet reported at all.
    pub(crate) pending_initial: Vec<NodeId>,
}

impl ObserverState {
    pub(crate) fn new(options: ObserverOptions, action: ObserverAction) -> Self {
        Self {
            options,
            action,
            observed: Vec::new(),
            last_state: HashMap::new(),
            pending_initial: Vec::new(),
        }
    }

    pub(crate) fn observe(&mut self, node: NodeId) {
        if !self.observed.contains(&node) {
            self.observed.push(node);
            self.pending_initial.push(node);
        }
    }
}

/// A single observation report, the shape tests simulate directly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IntersectionEntry {
    pub(crate) target: NodeId,
    pub(crate) is_intersecting: bool,
    pub(crate) intersection_ratio: f64,
}

pub(crate) fn intersection_ratio(
    element: LayoutBox,
    scroll_y: f64,
    viewport_height: f64,
    margin: RootMargin,
) -> f64 {
    let root_top = scroll_y - margin.top;
    let root_bottom = scroll_y + viewport_height + margin.bottom;
    let overlap_top = element.top.max(root_top);
    let overlap_bottom = (element.top + element.height).min(root_bottom);
    let overlap = (overlap_bottom - overlap_top).max(0.0);
    if element.height <= 0.0 {
        return if element.top >= root_top && element.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }
    overlap / element.height
}

pub(crate) fn is_intersecting(ratio: f64, threshold: f64) -> bool {
    if threshold > 0.0 {
        ratio >= threshold
    } else {
        ratio > 0.0
    }
}

impl Page {
    /// Viewport height in logical pixels. Defaults to 600.
    pub fn set_viewport_height(&mut self, height: f64) -> Result<()> {
        if !(height > 0.0) {
            return Err(Error::Dom(
                "set_viewport_height requires a positive height".into(),
            ));
        }
        self.viewport_height = height;
        Ok(())
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Pins an element's geometry, overriding the flow layout.
    pub fn set_layout_box(&mut self, selector: &str, top: f64, height: f64) -> Result<()> {
        let target = self.select_one(selector)?;
        self.layout_overrides.insert(target, LayoutBox { top, height });
        Ok(())
    }

    /// Moves the viewport and delivers any resulting intersection changes.
    pub fn scroll_to(&mut self, top: f64) -> Result<()> {
        let top = top.max(0.0);
        self.scroll_y = top;
        self.push_scroll_request(ScrollRequest {
            target_id: None,
            top,
            behavior: ScrollBehavior::Auto,
        });
        self.flush_observations()
    }

    /// Every scroll performed so far, in order.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_log
    }

    pub(crate) fn push_scroll_request(&mut self, request: ScrollRequest) {
        if self.trace {
            let behavior = match request.behavior {
                ScrollBehavior::Auto => "auto",
                ScrollBehavior::Smooth => "smooth",
            };
            let target = request.target_id.as_deref().unwrap_or("-");
            self.trace_line(format!(
                "[scroll] behavior={behavior} top={:.1} target={target}",
                request.top
            ));
        }
        self.scroll_log.push(request);
    }

    /// Aligns the element's top edge with the viewport top (block: start).
    pub(crate) fn scroll_node_into_view(
        &mut self,
        node: NodeId,
        behavior: ScrollBehavior,
    ) -> Result<()> {
        let layout = self.layout_box(node);
        self.scroll_y = layout.top.max(0.0);
        self.push_scroll_request(ScrollRequest {
            target_id: self.dom.attr(node, "id"),
            top: layout.top.max(0.0),
            behavior,
        });
        self.flush_observations()
    }

    /// Flow layout: block elements stack in document order, everything else
    /// shares the box of its nearest block ancestor.
    pub(crate) fn layout_box(&self, node: NodeId) -> LayoutBox {
        if let Some(layout) = self.layout_overrides.get(&node) {
            return *layout;
        }

        let mut running_y = 0.0f64;
        let mut block_boxes: HashMap<NodeId, LayoutBox> = HashMap::new();
        for element in self.dom.all_element_nodes() {
            let Some(tag) = self.dom.tag_name(element) else {
                continue;
            };
            if !is_block_tag(tag) {
                continue;
            }
            let height = self.explicit_height(element).unwrap_or(DEFAULT_BLOCK_HEIGHT);
            let layout = self
                .layout_overrides
                .get(&element)
                .copied()
                .unwrap_or(LayoutBox {
                    top: running_y,
                    height,
                });
            block_boxes.insert(element, layout);
            running_y += height;
        }

        if let Some(layout) = block_boxes.get(&node) {
            return *layout;
        }

        let mut cursor = self.dom.parent(node);
        while let Some(current) = cursor {
            if let Some(layout) = block_boxes.get(&current) {
                return *layout;
            }
            cursor = self.dom.parent(current);
        }

        LayoutBox {
            top: 0.0,
            height: DEFAULT_BLOCK_HEIGHT,
        }
    }

    fn explicit_height(&self, node: NodeId) -> Option<f64> {
        let raw = self.dom.style_property(node, "height")?;
        let raw = raw.trim();
        let raw = raw.strip_suffix("px").unwrap_or(raw);
        raw.trim().parse::<f64>().ok().filter(|h| *h >= 0.0)
    }

    pub(crate) fn add_observer(&mut self, observer: ObserverState) -> usize {
        self.observers.push(observer);
        self.observers.len() - 1
    }

    /// Delivers pending initial observations plus any intersecting-state
    /// changes. Runs after every scroll; also callable directly, standing in
    /// for the host's asynchronous delivery tick.
    pub fn flush_observations(&mut self) -> Result<()> {
        let scroll_y = self.scroll_y;
        let viewport_height = self.viewport_height;

        for index in 0..self.observers.len() {
            let (options, action, observed, pending) = {
                let observer = &mut self.observers[index];
                (
                    observer.options,
                    observer.action,
                    observer.observed.clone(),
                    std::mem::take(&mut observer.pending_initial),
                )
            };

            let mut entries = Vec::new();
            for node in observed {
                let layout = self.layout_box(node);
                let ratio =
                    intersection_ratio(layout, scroll_y, viewport_height, options.root_margin);
                let intersecting = is_intersecting(ratio, options.threshold);
                let previous = self.observers[index].last_state.get(&node).copied();
                let initial = pending.contains(&node);
                if initial || previous != Some(intersecting) {
                    entries.push(IntersectionEntry {
                        target: node,
                        is_intersecting: intersecting,
                        intersection_ratio: ratio,
                    });
                }
                self.observers[index].last_state.insert(node, intersecting);
            }

            for entry in entries {
                self.deliver_entry(action, &entry)?;
            }
        }
        Ok(())
    }

    /// Pushes a synthetic entry through the observer watching the element.
    /// Errors when nothing observes it.
    pub fn simulate_intersection(&mut self, selector: &str, is_intersecting: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let index = self
            .observers
            .iter()
            .position(|observer| observer.observed.contains(&target))
            .ok_or_else(|| Error::Dom(format!("element is not observed: {selector}")))?;

        let action = self.observers[index].action;
        let entry = IntersectionEntry {
            target,
            is_intersecting,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
        };
        self.observers[index]
            .last_state
            .insert(target, is_intersecting);
        self.observers[index].pending_initial.retain(|n| *n != target);
        self.deliver_entry(action, &entry)
    }

    fn deliver_entry(&mut self, action: ObserverAction, entry: &IntersectionEntry) -> Result<()> {
        if self.trace {
            let label = self.node_label(entry.target);
            self.trace_line(format!(
                "[observe] target={label} ratio={:.3} intersecting={}",
                entry.intersection_ratio, entry.is_intersecting
            ));
        }
        match action {
            ObserverAction::Reveal => {
                if entry.is_intersecting {
                    self.dom.set_style_property(entry.target, "opacity", "1")?;
                    self.dom
                        .set_style_property(entry.target, "transform", "translateY(0)")?;
                }
            }
        }
        Ok(())
    }
}
