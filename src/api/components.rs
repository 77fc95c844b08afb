use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::backend::ChartLibrary;
use crate::reactive::ElementRef;

use super::ChartBinding;

/// Which element ref a rendered node must be bound to by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefSlot {
    Canvas,
    Container,
}

impl RefSlot {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Container => "container",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_slot: Option<RefSlot>,
    #[serde(default)]
    pub style: IndexMap<String, String>,
    #[serde(default)]
    pub children: Vec<ViewNode>,
}

/// Presentational tree handed to the host renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewNode {
    Element(ElementNode),
    Text(String),
}

impl ViewNode {
    #[must_use]
    pub fn element(tag: impl Into<String>) -> ElementNode {
        ElementNode {
            tag: tag.into(),
            ref_slot: None,
            style: IndexMap::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// HTML-like rendering for diagnostics and snapshot tests.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape(text)),
            Self::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                if let Some(slot) = element.ref_slot {
                    let _ = write!(out, " data-ref=\"{}\"", slot.as_str());
                }
                if !element.style.is_empty() {
                    let style = element
                        .style
                        .iter()
                        .map(|(key, value)| format!("{key}: {value}"))
                        .collect::<Vec<_>>()
                        .join("; ");
                    let _ = write!(out, " style=\"{}\"", escape(&style));
                }
                out.push('>');
                for child in &element.children {
                    child.write_markup(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

impl ElementNode {
    #[must_use]
    pub fn with_ref(mut self, slot: RefSlot) -> Self {
        self.ref_slot = Some(slot);
        self
    }

    #[must_use]
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ViewNode>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn into_node(self) -> ViewNode {
        ViewNode::Element(self)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Unit rendering the bare canvas surface.
pub struct ChartCanvas<T> {
    canvas_ref: ElementRef<T>,
}

impl<T> Clone for ChartCanvas<T> {
    fn clone(&self) -> Self {
        Self {
            canvas_ref: self.canvas_ref.clone(),
        }
    }
}

impl<T: Clone + 'static> ChartCanvas<T> {
    pub const NAME: &'static str = "ChartCanvas";

    #[must_use]
    pub fn new(canvas_ref: ElementRef<T>) -> Self {
        Self { canvas_ref }
    }

    #[must_use]
    pub fn render(&self) -> ViewNode {
        ViewNode::element("canvas")
            .with_ref(RefSlot::Canvas)
            .into_node()
    }

    /// Called by the host once the rendered canvas exists.
    pub fn bind(&self, canvas: T) {
        self.canvas_ref.bind(canvas);
    }
}

/// Unit rendering a relatively positioned, full-size container around slot
/// content, or around a [`ChartCanvas`] when no content is given.
pub struct ChartContainer<T, C> {
    container_ref: ElementRef<C>,
    canvas: ChartCanvas<T>,
}

impl<T: Clone + 'static, C: Clone + 'static> ChartContainer<T, C> {
    pub const NAME: &'static str = "ChartComponent";

    #[must_use]
    pub fn new(container_ref: ElementRef<C>, canvas: ChartCanvas<T>) -> Self {
        Self {
            container_ref,
            canvas,
        }
    }

    #[must_use]
    pub fn render(&self, slot: Option<Vec<ViewNode>>) -> ViewNode {
        let children = slot.unwrap_or_else(|| vec![self.canvas.render()]);
        ViewNode::element("div")
            .with_ref(RefSlot::Container)
            .with_style("position", "relative")
            .with_style("width", "100%")
            .with_style("height", "100%")
            .with_children(children)
            .into_node()
    }

    pub fn bind(&self, container: C) {
        self.container_ref.bind(container);
    }

    #[must_use]
    pub fn canvas(&self) -> &ChartCanvas<T> {
        &self.canvas
    }
}

/// Builds the `(container, canvas)` presentational pair for a binding.
pub fn use_chart_components<L, C>(
    binding: &ChartBinding<L, C>,
) -> (ChartContainer<L::Canvas, C>, ChartCanvas<L::Canvas>)
where
    L: ChartLibrary + 'static,
    C: Clone + 'static,
{
    let canvas = ChartCanvas::new(binding.canvas_ref().clone());
    let container = ChartContainer::new(binding.container_ref().clone(), canvas.clone());
    (container, canvas)
}
