//! Collection query parameters and their query-string rendering.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::types::TypeConstraintError;
use crate::models::envelope::PaginationMeta;
use crate::repository::errors::{RepositoryError, RepositoryResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// `field:direction` pair sent as the `sort` parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Column-header toggle: same field flips direction, a new field starts
    /// ascending.
    pub fn toggled(&self, field: &str) -> Self {
        if self.field == field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::asc(field)
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

impl FromStr for SortKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .split_once(':')
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(TypeConstraintError::InvalidValue(s.to_string())),
        };
        Ok(Self::new(field, direction))
    }
}

/// Case-insensitive substring search over one or more fields. Nested fields
/// use dots, e.g. `content.children.text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSearch {
    pub fields: &'static [&'static str],
    pub text: String,
}

/// Exact match on a single field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: &'static str,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<TextSearch>,
    pub filter: Option<FieldFilter>,
    pub sort: Option<SortKey>,
    pub pagination: Option<Pagination>,
    /// Ask the API to expand relations (images, cover media).
    pub populate: bool,
}

fn field_path(field: &str) -> String {
    field
        .split('.')
        .map(|segment| format!("[{segment}]"))
        .collect()
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank text is ignored.
    pub fn search(mut self, fields: &'static [&'static str], text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        if !text.is_empty() && !fields.is_empty() {
            self.search = Some(TextSearch { fields, text });
        }
        self
    }

    /// Blank values are ignored.
    pub fn filter(mut self, field: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.filter = Some(FieldFilter { field, value });
        }
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    pub fn populate(mut self) -> Self {
        self.populate = true;
        self
    }

    /// Query parameters in the order the API documents them.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(p) = self.pagination {
            pairs.push(("pagination[page]".to_string(), p.page.to_string()));
            pairs.push(("pagination[pageSize]".to_string(), p.per_page.to_string()));
        }

        if self.populate {
            pairs.push(("populate".to_string(), "*".to_string()));
        }

        if let Some(search) = &self.search {
            if let [field] = search.fields {
                pairs.push((
                    format!("filters{}[$containsi]", field_path(field)),
                    search.text.clone(),
                ));
            } else {
                for (idx, field) in search.fields.iter().enumerate() {
                    pairs.push((
                        format!("filters[$or][{idx}]{}[$containsi]", field_path(field)),
                        search.text.clone(),
                    ));
                }
            }
        }

        if let Some(filter) = &self.filter {
            pairs.push((
                format!("filters{}", field_path(filter.field)),
                filter.value.clone(),
            ));
        }

        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.to_string()));
        }

        pairs
    }

    /// URL-encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> RepositoryResult<String> {
        serde_html_form::to_string(self.to_query_pairs())
            .map_err(|err| RepositoryError::ValidationError(format!("query encoding: {err}")))
    }
}

/// One page of a collection, normalised from the response envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_count: 0,
            total: 0,
        }
    }

    /// Without pagination metadata the whole collection is one page.
    pub fn from_meta(items: Vec<T>, meta: Option<PaginationMeta>) -> Self {
        match meta {
            Some(meta) => Self {
                items,
                page: meta.page.max(1) as usize,
                page_count: meta.page_count as usize,
                total: meta.total as usize,
            },
            None => {
                let total = items.len();
                Self {
                    items,
                    page: 1,
                    page_count: usize::from(total > 0),
                    total,
                }
            }
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_count: self.page_count,
            total: self.total,
        }
    }
}
