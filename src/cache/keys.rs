//! Cache key construction.
//!
//! Keys are human readable: an operation tag followed by the query
//! parameters in a fixed order, paging parameters always last. The
//! declarative strategy uses the same layout under an `auto-` prefix so
//! the two strategies never read each other's entries.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::PageRequest;
use crate::repository::EntryFilter;

/// Prefix applied to keys written by the declarative strategy.
pub const AUTO_PREFIX: &str = "auto-";

// == Entry Query ==
/// A cacheable read, one variant per logical query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryQuery {
    ById(i64),
    All(PageRequest),
    Search { term: String, page: PageRequest },
    Owner { owner: String, page: PageRequest },
    DateRange {
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    },
    User { user_id: i64, page: PageRequest },
    TotalCount,
    CountByOwner(String),
}

impl EntryQuery {
    /// Operation tag leading every key of this query.
    pub fn tag(&self) -> &'static str {
        match self {
            EntryQuery::ById(_) => "entry",
            EntryQuery::All(_) => "all",
            EntryQuery::Search { .. } => "search",
            EntryQuery::Owner { .. } => "owner",
            EntryQuery::DateRange { .. } => "daterange",
            EntryQuery::User { .. } => "user",
            EntryQuery::TotalCount => "total-count",
            EntryQuery::CountByOwner(_) => "count-owner",
        }
    }

    /// Rejects missing or malformed parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            EntryQuery::ById(id) => positive_id(*id, "Entry id"),
            EntryQuery::All(page) => page.validate(),
            EntryQuery::Search { term, page } => {
                not_blank(term, "Search term")?;
                page.validate()
            }
            EntryQuery::Owner { owner, page } => {
                not_blank(owner, "Owner")?;
                page.validate()
            }
            EntryQuery::DateRange { from, to, page } => {
                if from > to {
                    return Err(AppError::Validation(format!(
                        "Date range start {} is after end {}",
                        from, to
                    )));
                }
                page.validate()
            }
            EntryQuery::User { user_id, page } => {
                positive_id(*user_id, "User id")?;
                page.validate()
            }
            EntryQuery::TotalCount => Ok(()),
            EntryQuery::CountByOwner(owner) => not_blank(owner, "Owner"),
        }
    }

    /// Key used by the manual strategy.
    pub fn manual_key(&self) -> Result<String> {
        self.validate()?;
        Ok(self.key_unchecked())
    }

    /// Key used by the declarative strategy.
    pub fn auto_key(&self) -> Result<String> {
        self.validate()?;
        Ok(self.auto_key_unchecked())
    }

    pub(crate) fn auto_key_unchecked(&self) -> String {
        format!("{}{}", AUTO_PREFIX, self.key_unchecked())
    }

    pub(crate) fn key_unchecked(&self) -> String {
        let tag = self.tag();
        match self {
            EntryQuery::ById(id) => format!("{tag}-{id}"),
            EntryQuery::All(page) => format!("{tag}-{}", paging(page)),
            EntryQuery::Search { term, page } => format!("{tag}-{}-{}", term.trim(), paging(page)),
            EntryQuery::Owner { owner, page } => format!("{tag}-{}-{}", owner.trim(), paging(page)),
            EntryQuery::DateRange { from, to, page } => {
                format!("{tag}-{}-{}-{}", from, to, paging(page))
            }
            EntryQuery::User { user_id, page } => format!("{tag}-{user_id}-{}", paging(page)),
            EntryQuery::TotalCount => tag.to_string(),
            EntryQuery::CountByOwner(owner) => format!("{tag}-{}", owner.trim()),
        }
    }

    /// Repository filter answering this query, if it is a list or count.
    pub fn filter(&self) -> Option<EntryFilter> {
        match self {
            EntryQuery::ById(_) => None,
            EntryQuery::All(_) | EntryQuery::TotalCount => Some(EntryFilter::All),
            EntryQuery::Search { term, .. } => Some(EntryFilter::Search(term.trim().to_string())),
            EntryQuery::Owner { owner, .. } | EntryQuery::CountByOwner(owner) => {
                Some(EntryFilter::Owner(owner.trim().to_string()))
            }
            EntryQuery::DateRange { from, to, .. } => Some(EntryFilter::DateRange {
                from: *from,
                to: *to,
            }),
            EntryQuery::User { user_id, .. } => Some(EntryFilter::User(*user_id)),
        }
    }

    pub fn page(&self) -> Option<PageRequest> {
        match self {
            EntryQuery::All(page)
            | EntryQuery::Search { page, .. }
            | EntryQuery::Owner { page, .. }
            | EntryQuery::DateRange { page, .. }
            | EntryQuery::User { page, .. } => Some(*page),
            EntryQuery::ById(_) | EntryQuery::TotalCount | EntryQuery::CountByOwner(_) => None,
        }
    }
}

fn paging(page: &PageRequest) -> String {
    format!("{}-{}", page.page, page.size)
}

fn not_blank(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AppError::Validation(format!("{} must not be blank", what)))
    } else {
        Ok(())
    }
}

fn positive_id(id: i64, what: &str) -> Result<()> {
    if id <= 0 {
        Err(AppError::Validation(format!("{} must be positive", what)))
    } else {
        Ok(())
    }
}
