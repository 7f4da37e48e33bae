//! Rows and freely positioned elements hosted inside a panel.
//!
//! The engine does not render content; it keeps an ordered registry of what
//! the host asked to insert so ids stay unique. Adding an id that is already
//! registered is skipped with a warning rather than treated as an error.

use floatpanel_api::ContentKind;
use std::collections::HashSet;
use tracing::warn;

/// A row in the panel's vertical flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSpec {
    pub id: String,
    /// Markup fragments, rendered in order
    pub items: Vec<String>,
    pub content_editable: bool,
    /// Inline style applied to the row container
    pub inline_style: Option<String>,
}

impl RowSpec {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_item<S: Into<String>>(mut self, item: S) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn with_content_editable(mut self, editable: bool) -> Self {
        self.content_editable = editable;
        self
    }

    pub fn with_style<S: Into<String>>(mut self, style: S) -> Self {
        self.inline_style = Some(style.into());
        self
    }
}

/// An element placed at `(x, y)` pixels from the content area's origin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementSpec {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub markup: String,
    pub inline_style: Option<String>,
}

impl ElementSpec {
    pub fn new<S: Into<String>>(id: S, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_markup<S: Into<String>>(mut self, markup: S) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_style<S: Into<String>>(mut self, style: S) -> Self {
        self.inline_style = Some(style.into());
        self
    }
}

/// Declarative child description, as found in a panel's initial markup.
///
/// A child that carries an `x` or `y` coordinate becomes an
/// [`ElementSpec`]; everything else becomes a [`RowSpec`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChildSpec {
    pub id: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub style: Option<String>,
    pub content_editable: bool,
    pub items: Vec<String>,
}

/// A classified [`ChildSpec`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Row(RowSpec),
    Element(ElementSpec),
}

impl ContentItem {
    pub fn id(&self) -> &str {
        match self {
            ContentItem::Row(row) => &row.id,
            ContentItem::Element(element) => &element.id,
        }
    }
}

impl ChildSpec {
    /// Classify the child found at `index` (zero based). Children without an
    /// id are named `row-{index + 1}`.
    pub fn into_item(self, index: usize) -> ContentItem {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("row-{}", index + 1));

        if self.x.is_some() || self.y.is_some() {
            let mut element = ElementSpec::new(
                id,
                parse_coordinate(self.x.as_deref()),
                parse_coordinate(self.y.as_deref()),
            )
            .with_markup(self.items.concat());
            element.inline_style = self.style;
            ContentItem::Element(element)
        } else {
            ContentItem::Row(RowSpec {
                id,
                items: self.items,
                content_editable: self.content_editable,
                inline_style: self.style,
            })
        }
    }
}

/// Parse `"12"` or `"12px"`; anything unparseable or missing is 0.
fn parse_coordinate(raw: Option<&str>) -> f32 {
    raw.map(str::trim)
        .map(|s| s.strip_suffix("px").unwrap_or(s))
        .and_then(|s| s.trim_end().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Ordered registry of a panel's rows and elements.
#[derive(Debug, Clone, Default)]
pub struct PanelContent {
    rows: Vec<RowSpec>,
    elements: Vec<ElementSpec>,
    row_ids: HashSet<String>,
    element_ids: HashSet<String>,
}

impl PanelContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from declarative children, in document order.
    pub fn from_children<I>(children: I) -> Self
    where
        I: IntoIterator<Item = ChildSpec>,
    {
        let mut content = Self::new();
        content.add_children(children);
        content
    }

    /// Register declarative children in order, naming anonymous ones by
    /// position. Returns the kind and id of every child skipped as a
    /// duplicate.
    pub fn add_children<I>(&mut self, children: I) -> Vec<(ContentKind, String)>
    where
        I: IntoIterator<Item = ChildSpec>,
    {
        let mut skipped = Vec::new();
        for (index, child) in children.into_iter().enumerate() {
            let item = child.into_item(index);
            let id = item.id().to_string();
            let (kind, added) = self.add_item(item);
            if !added {
                skipped.push((kind, id));
            }
        }
        skipped
    }

    /// Append a row. Returns `false` without changing anything when a row
    /// with the same id already exists.
    pub fn add_row(&mut self, row: RowSpec) -> bool {
        if !self.row_ids.insert(row.id.clone()) {
            warn!("Row with id \"{}\" already exists. Skipping.", row.id);
            return false;
        }
        self.rows.push(row);
        true
    }

    /// Append an element. Returns `false` when the id is already taken.
    pub fn add_element(&mut self, element: ElementSpec) -> bool {
        if !self.element_ids.insert(element.id.clone()) {
            warn!("Element with id \"{}\" already exists. Skipping.", element.id);
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Add a classified item; returns its kind and whether it was added.
    pub fn add_item(&mut self, item: ContentItem) -> (ContentKind, bool) {
        match item {
            ContentItem::Row(row) => (ContentKind::Row, self.add_row(row)),
            ContentItem::Element(element) => (ContentKind::Element, self.add_element(element)),
        }
    }

    pub fn rows(&self) -> &[RowSpec] {
        &self.rows
    }

    pub fn elements(&self) -> &[ElementSpec] {
        &self.elements
    }

    pub fn row(&self, id: &str) -> Option<&RowSpec> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn element(&self, id: &str) -> Option<&ElementSpec> {
        self.elements.iter().find(|element| element.id == id)
    }

    /// Number of rows and elements together.
    pub fn len(&self) -> usize {
        self.rows.len() + self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.elements.is_empty()
    }
}
