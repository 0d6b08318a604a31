//! Cursor-based pagination.
//!
//! Listing pages receive `?direction=next|previous&cursor=<opaque>` and turn
//! it into the Storefront API's connection arguments. The backend's
//! `pageInfo` is forwarded untouched and drives the "load previous" and
//! "load more" controls.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Which way a pagination request moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

impl Direction {
    /// Parse the `direction` query parameter. Anything other than
    /// `previous` means forward.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(value) if value.eq_ignore_ascii_case("previous") => Self::Previous,
            _ => Self::Next,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

/// Pagination query-string parameters of a listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationQuery {
    pub direction: Option<String>,
    pub cursor: Option<String>,
}

impl PaginationQuery {
    /// A request for the page adjacent to `cursor` in `direction`.
    #[must_use]
    pub fn new(direction: Direction, cursor: impl Into<String>) -> Self {
        Self {
            direction: Some(direction.as_str().to_string()),
            cursor: Some(cursor.into()),
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::from_param(self.direction.as_deref())
    }

    /// The cursor, treating an empty string as absent.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }

    /// Connection arguments for a page of `page_by` items.
    ///
    /// Backward requests read the `page_by` items before the cursor; forward
    /// requests read the `page_by` items after it (or the first page).
    #[must_use]
    pub fn variables(&self, page_by: i64) -> PaginationVariables {
        let cursor = self.cursor().map(String::from);
        match (self.direction(), cursor) {
            (Direction::Previous, Some(cursor)) => PaginationVariables {
                last: Some(page_by),
                before: Some(cursor),
                ..PaginationVariables::default()
            },
            (_, after) => PaginationVariables {
                first: Some(page_by),
                after,
                ..PaginationVariables::default()
            },
        }
    }

    /// Encode as a query string, e.g. `direction=next&cursor=abc`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("direction", self.direction().as_str());
        if let Some(cursor) = self.cursor() {
            serializer.append_pair("cursor", cursor);
        }
        serializer.finish()
    }
}

/// Connection arguments sent with a listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Pagination state reported by the backend for a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Request for the following page, if there is one.
    #[must_use]
    pub fn next(&self) -> Option<PaginationQuery> {
        if !self.has_next_page {
            return None;
        }
        self.end_cursor
            .as_deref()
            .map(|cursor| PaginationQuery::new(Direction::Next, cursor))
    }

    /// Request for the preceding page, if there is one.
    #[must_use]
    pub fn previous(&self) -> Option<PaginationQuery> {
        if !self.has_previous_page {
            return None;
        }
        self.start_cursor
            .as_deref()
            .map(|cursor| PaginationQuery::new(Direction::Previous, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_variables() {
        let vars = PaginationQuery::default().variables(8);
        assert_eq!(
            vars,
            PaginationVariables {
                first: Some(8),
                ..PaginationVariables::default()
            }
        );
    }

    #[test]
    fn test_next_page_variables() {
        let vars = PaginationQuery::new(Direction::Next, "c8").variables(8);
        assert_eq!(vars.first, Some(8));
        assert_eq!(vars.after.as_deref(), Some("c8"));
        assert_eq!(vars.last, None);
        assert_eq!(vars.before, None);
    }

    #[test]
    fn test_previous_page_variables() {
        let vars = PaginationQuery::new(Direction::Previous, "c9").variables(8);
        assert_eq!(vars.last, Some(8));
        assert_eq!(vars.before.as_deref(), Some("c9"));
        assert_eq!(vars.first, None);
    }

    #[test]
    fn test_previous_without_cursor_is_first_page() {
        let query = PaginationQuery {
            direction: Some("previous".to_string()),
            cursor: Some(String::new()),
        };
        assert_eq!(query.variables(4).first, Some(4));
    }

    #[test]
    fn test_variables_serialize_without_nulls() {
        let vars = PaginationQuery::new(Direction::Previous, "abc").variables(8);
        let json = serde_json::to_value(&vars).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"last": 8, "before": "abc"}));
    }

    #[test]
    fn test_page_info_links() {
        let info = PageInfo {
            has_next_page: true,
            has_previous_page: false,
            start_cursor: Some("s".to_string()),
            end_cursor: Some("e/1".to_string()),
        };
        assert_eq!(info.previous(), None);
        let next = info.next().unwrap_or_default();
        assert_eq!(next.to_query_string(), "direction=next&cursor=e%2F1");
    }

    #[test]
    fn test_unknown_direction_means_next() {
        assert_eq!(Direction::from_param(Some("sideways")), Direction::Next);
        assert_eq!(Direction::from_param(Some("Previous")), Direction::Previous);
    }
}
