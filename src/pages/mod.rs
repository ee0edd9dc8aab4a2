//! Page state for the console's views.
//!
//! DESIGN
//! ======
//! Each list page owns its collection, fetched once on entry, and derives the
//! visible rows from (collection, search term, status filter) on demand, so
//! the filtered view can never go stale relative to its inputs.
//!
//! Loads are ticketed: `begin_load` hands out a [`LoadTicket`] and
//! `finish_load` applies a result only while that ticket is current. Leaving
//! the page or starting another load invalidates older tickets, so a late
//! response is dropped instead of overwriting newer state.
//!
//! Mutations patch the local record only with values the server returned.
//! A failed mutation leaves the collection as it was, keeps the detail view
//! open, and records an error for display.

pub mod dashboard;
pub mod login;
pub mod shops;
pub mod streamers;
pub mod users;

use crate::api::ApiError;
use crate::filter::{self, Searchable, StatusFilter};
use crate::models::{Shop, User};


/// A record a list page can hold.
pub trait Record: Searchable + Clone {
    fn id(&self) -> &str;
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Shop {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("no record with id '{0}' on this page")]
    UnknownRecord(String),

    #[error("User must have a shop pending activation")]
    PromotionNotAllowed,

    #[error("shop has no owner to update")]
    MissingOwner,

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The shop change went through; the owner's streamer flag did not.
    #[error("shop {shop_id} was updated but its owner's streamer status was not: {}", .source.user_message())]
    OwnerUpdateFailed {
        shop_id: String,
        #[source]
        source: ApiError,
    },
}

impl ActionError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Whether an action control can be used, and why not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Enabled,
    Disabled { reason: &'static str },
}

impl Control {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Identifies one load; see [`ListPage::finish_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct ListPage<T, F> {
    items: Vec<T>,
    search: String,
    status: F,
    selected: Option<String>,
    loading: bool,
    updating: bool,
    error: Option<String>,
    generation: u64,
}

impl<T, F> Default for ListPage<T, F>
where
    T: Record,
    F: StatusFilter<T>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> ListPage<T, F>
where
    T: Record,
    F: StatusFilter<T>,
{
    /// A page that has not loaded yet; it reports loading until the first
    /// load finishes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            search: String::new(),
            status: F::default(),
            selected: None,
            loading: true,
            updating: false,
            error: None,
            generation: 0,
        }
    }

    /// Full source collection, unfiltered.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Rows passing the current status filter and search term.
    #[must_use]
    pub fn visible(&self) -> Vec<&T> {
        filter::apply(&self.items, self.status, &self.search)
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    #[must_use]
    pub fn status(&self) -> F {
        self.status
    }

    pub fn set_status(&mut self, status: F) {
        self.status = status;
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Record shown in the detail view, if one is open.
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Open the detail view for `id`. Returns false if no such record.
    pub fn open(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        self.error = None;
        true
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Start a load, superseding any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    /// Apply a fetch result if `ticket` is still current. Returns whether
    /// the result was applied. A failed fetch keeps the previous items.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<T>, ApiError>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, current = self.generation, "dropping stale page load");
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                if self.selected.as_deref().is_some_and(|id| self.get(id).is_none()) {
                    self.selected = None;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "page load failed");
                self.error = Some(e.user_message());
            }
        }
        true
    }

    /// The page is no longer shown: outstanding loads will be ignored.
    pub fn leave(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.updating = false;
        self.selected = None;
    }

    pub(crate) fn require(&self, id: &str) -> Result<&T, ActionError> {
        self.get(id).ok_or_else(|| ActionError::UnknownRecord(id.to_string()))
    }

    pub(crate) fn begin_update(&mut self) {
        self.updating = true;
        self.error = None;
    }

    /// Patch the local copy of `id` with server-confirmed values.
    pub(crate) fn confirm(&mut self, id: &str, patch: impl FnOnce(&mut T)) {
        self.updating = false;
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            patch(item);
        }
    }

    pub(crate) fn confirm_removed(&mut self, id: &str) {
        self.updating = false;
        self.items.retain(|item| item.id() != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    /// Record a failed mutation; the collection and detail view stay as
    /// they are.
    pub(crate) fn fail(&mut self, error: ActionError) -> ActionError {
        tracing::warn!(error = %error, "page action failed");
        self.updating = false;
        self.error = Some(error.user_message());
        error
    }

    pub(crate) fn count(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(item)).count()
    }
}
