//! Dashboard widget validation and ordered-list operations.
//!
//! A client's dashboard is an ordered list of widgets. Layout mutations are
//! expressed as operations on the in-memory list; the repository then
//! re-persists the whole list.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const WIDGET_PAYMENT: &str = "payment";
pub const WIDGET_METRIC: &str = "metric";
pub const WIDGET_RESOURCE: &str = "resource";
pub const WIDGET_CUSTOM: &str = "custom";

/// All valid widget type tags.
pub const VALID_WIDGET_TYPES: &[&str] =
    &[WIDGET_PAYMENT, WIDGET_METRIC, WIDGET_RESOURCE, WIDGET_CUSTOM];

/// Maximum widget title length.
pub const MAX_WIDGET_TITLE_LENGTH: usize = 200;

/// Maximum number of widgets on one dashboard.
pub const MAX_WIDGETS_PER_DASHBOARD: usize = 100;

/// A widget as submitted for persistence (no id or position yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    pub widget_type: String,
    pub title: String,
    pub data: serde_json::Value,
}

/// Direction for an adjacent swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Validate one widget and return it with a trimmed title.
///
/// The payload shape depends on the type and is deliberately opaque; the
/// only requirement is that it is present (not JSON `null`).
pub fn normalize_widget(spec: WidgetSpec) -> Result<WidgetSpec, CoreError> {
    if !VALID_WIDGET_TYPES.contains(&spec.widget_type.as_str()) {
        return Err(CoreError::Validation(format!(
            "Invalid widget_type '{}'. Must be one of: {}",
            spec.widget_type,
            VALID_WIDGET_TYPES.join(", ")
        )));
    }

    let title = spec.title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Widget title must not be empty".into()));
    }
    if title.chars().count() > MAX_WIDGET_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Widget title must be at most {MAX_WIDGET_TITLE_LENGTH} characters"
        )));
    }

    if spec.data.is_null() {
        return Err(CoreError::Validation("Widget data is required".into()));
    }

    Ok(WidgetSpec {
        title: title.to_string(),
        ..spec
    })
}

/// Validate a full layout.
pub fn normalize_layout(widgets: Vec<WidgetSpec>) -> Result<Vec<WidgetSpec>, CoreError> {
    if widgets.len() > MAX_WIDGETS_PER_DASHBOARD {
        return Err(CoreError::Validation(format!(
            "A dashboard may hold at most {MAX_WIDGETS_PER_DASHBOARD} widgets"
        )));
    }
    widgets.into_iter().map(normalize_widget).collect()
}

/// Swap the item at `position` with its neighbour in `direction`.
///
/// `Up` swaps with `position - 1`, `Down` with `position + 1`. Moving past
/// either end of the list is a validation error.
pub fn move_adjacent<T>(
    items: &mut [T],
    position: usize,
    direction: MoveDirection,
) -> Result<(), CoreError> {
    if position >= items.len() {
        return Err(CoreError::Validation(format!(
            "Position {position} is out of range for {} widgets",
            items.len()
        )));
    }

    let target = match direction {
        MoveDirection::Up => position.checked_sub(1),
        MoveDirection::Down => Some(position + 1).filter(|&p| p < items.len()),
    }
    .ok_or_else(|| {
        CoreError::Validation(format!("Widget at position {position} cannot move further"))
    })?;

    items.swap(position, target);
    Ok(())
}

/// Remove and return the item at `position`.
pub fn remove_at<T>(items: &mut Vec<T>, position: usize) -> Result<T, CoreError> {
    if position >= items.len() {
        return Err(CoreError::NotFound {
            entity: "Widget position",
            id: position as i64,
        });
    }
    Ok(items.remove(position))
}
