//! Per-session gallery state. Pure and synchronous: the async driver in
//! [`super::FetchLoop`] owns the timing, this type owns every transition.

use crate::api::PhotoDto;
use crate::domain::{SearchMode, SortOrder};

pub const RECENT_MODE_NOTE: &str =
    "NB: Entering a whitespace or no search term will return the most recent photos from Flickr!";

pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again later.";

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit submit. Blank terms select recent mode.
    Search { term: String, sort: SortOrder },
    /// Sort dropdown changed; keeps the current term.
    SortChange(SortOrder),
    /// Scrolled near the bottom of the gallery.
    ScrollNearBottom,
}

impl Trigger {
    const fn resets_gallery(&self) -> bool {
        !matches!(self, Self::ScrollNearBottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
}

/// How the last request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Rendered { added: usize },
    TimedOut,
    Failed { message: String },
}

/// Identifies one issued request. A result carrying any other ticket is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A request the driver should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: Ticket,
    /// `None` for recent mode.
    pub term: Option<String>,
    pub page: u32,
    pub sort: SortOrder,
}

/// Result of a request as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    Photos(Vec<PhotoDto>),
    TimedOut,
    Failed(String),
}

/// One rendered gallery entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub image_url: String,
    pub alt: String,
}

impl From<PhotoDto> for Tile {
    fn from(photo: PhotoDto) -> Self {
        Self {
            image_url: photo.image_url,
            alt: photo.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    term: String,
    sort: SortOrder,
    page: u32,
    status: FetchStatus,
    generation: u64,
    tiles: Vec<Tile>,
    note: Option<&'static str>,
    last_outcome: Option<FetchOutcome>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            term: String::new(),
            sort: SortOrder::Relevant,
            page: 1,
            status: FetchStatus::Idle,
            generation: 0,
            tiles: Vec::new(),
            note: None,
            last_outcome: None,
        }
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a trigger and returns the request to send, or `None` when a
    /// request is already in flight. A dropped trigger leaves the state as is.
    pub fn begin(&mut self, trigger: Trigger) -> Option<PageRequest> {
        if self.status == FetchStatus::Loading {
            return None;
        }

        if trigger.resets_gallery() {
            self.page = 1;
            self.tiles.clear();
        }

        match trigger {
            Trigger::Search { term, sort } => {
                self.term = term;
                self.sort = sort;
            }
            Trigger::SortChange(sort) => self.sort = sort,
            Trigger::ScrollNearBottom => self.page = self.page.saturating_add(1),
        }

        let mode = SearchMode::from_raw(Some(&self.term));
        if mode == SearchMode::Recent {
            self.note = Some(RECENT_MODE_NOTE);
            self.sort = SortOrder::DateUploaded;
        } else {
            self.note = None;
        }

        self.generation += 1;
        self.status = FetchStatus::Loading;

        Some(PageRequest {
            ticket: Ticket(self.generation),
            term: mode.term().map(str::to_string),
            page: self.page,
            sort: self.sort,
        })
    }

    /// Applies the result of the request identified by `ticket`.
    ///
    /// Returns `false` and changes nothing when the ticket is stale, which is
    /// how a response arriving after its timeout already fired gets ignored.
    pub fn finish(&mut self, ticket: Ticket, result: PageResult) -> bool {
        if self.status != FetchStatus::Loading || ticket.0 != self.generation {
            return false;
        }

        let outcome = match result {
            PageResult::Photos(photos) => {
                let added = photos.len();
                self.tiles.extend(photos.into_iter().map(Tile::from));
                FetchOutcome::Rendered { added }
            }
            PageResult::TimedOut => FetchOutcome::TimedOut,
            PageResult::Failed(message) => FetchOutcome::Failed { message },
        };

        self.last_outcome = Some(outcome);
        self.status = FetchStatus::Idle;
        true
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, FetchStatus::Loading)
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub const fn note(&self) -> Option<&'static str> {
        self.note
    }

    #[must_use]
    pub const fn last_outcome(&self) -> Option<&FetchOutcome> {
        self.last_outcome.as_ref()
    }

    /// Message to show under the gallery, if the last request did not render.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self.last_outcome.as_ref()? {
            FetchOutcome::TimedOut => Some(TIMEOUT_MESSAGE),
            FetchOutcome::Failed { message } => Some(message),
            FetchOutcome::Rendered { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> PhotoDto {
        PhotoDto {
            id: id.to_string(),
            owner: String::new(),
            secret: "s".to_string(),
            server: "1".to_string(),
            farm: 1,
            title: format!("photo {id}"),
            is_public: 1,
            is_friend: 0,
            is_family: 0,
            image_url: format!("https://farm1.staticflickr.com/1/{id}_s.jpg"),
        }
    }

    fn search(term: &str) -> Trigger {
        Trigger::Search {
            term: term.to_string(),
            sort: SortOrder::Relevant,
        }
    }

    #[test]
    fn triggers_while_loading_are_dropped() {
        let mut session = SessionState::new();
        let first = session.begin(search("cats")).unwrap();

        assert!(session.begin(Trigger::ScrollNearBottom).is_none());
        assert!(session.begin(search("dogs")).is_none());
        assert!(session.begin(Trigger::SortChange(SortOrder::DateTaken)).is_none());

        assert_eq!(session.term(), "cats");
        assert_eq!(session.page(), 1);
        assert_eq!(first.term.as_deref(), Some("cats"));
    }

    #[test]
    fn scroll_appends_next_page() {
        let mut session = SessionState::new();
        let req = session.begin(search("cats")).unwrap();
        assert!(session.finish(req.ticket, PageResult::Photos(vec![photo("1"), photo("2")])));

        let req = session.begin(Trigger::ScrollNearBottom).unwrap();
        assert_eq!(req.page, 2);
        assert_eq!(req.term.as_deref(), Some("cats"));
        assert!(session.finish(req.ticket, PageResult::Photos(vec![photo("3")])));

        assert_eq!(session.tiles().len(), 3);
        assert_eq!(session.status(), FetchStatus::Idle);
        assert_eq!(session.last_outcome(), Some(&FetchOutcome::Rendered { added: 1 }));
    }

    #[test]
    fn fresh_search_and_sort_change_reset_gallery() {
        let mut session = SessionState::new();
        let req = session.begin(search("cats")).unwrap();
        session.finish(req.ticket, PageResult::Photos(vec![photo("1")]));
        let req = session.begin(Trigger::ScrollNearBottom).unwrap();
        session.finish(req.ticket, PageResult::Photos(vec![photo("2")]));

        let req = session.begin(Trigger::SortChange(SortOrder::Interesting)).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.sort, SortOrder::Interesting);
        assert!(session.tiles().is_empty());
        session.finish(req.ticket, PageResult::Photos(vec![photo("9")]));

        let req = session.begin(search("owls")).unwrap();
        assert_eq!(req.page, 1);
        assert!(session.tiles().is_empty());
    }

    #[test]
    fn blank_term_selects_recent_mode_with_note() {
        let mut session = SessionState::new();
        let req = session.begin(search("   ")).unwrap();

        assert_eq!(req.term, None);
        assert_eq!(req.sort, SortOrder::DateUploaded);
        assert_eq!(session.note(), Some(RECENT_MODE_NOTE));

        session.finish(req.ticket, PageResult::Photos(Vec::new()));
        session.begin(search("harbour")).unwrap();
        assert_eq!(session.note(), None);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut session = SessionState::new();
        let first = session.begin(search("cats")).unwrap();
        assert!(session.finish(first.ticket, PageResult::TimedOut));
        assert_eq!(session.error_message(), Some(TIMEOUT_MESSAGE));

        let second = session.begin(Trigger::ScrollNearBottom).unwrap();
        assert!(!session.finish(first.ticket, PageResult::Photos(vec![photo("late")])));
        assert!(session.is_loading());
        assert!(session.tiles().is_empty());

        assert!(session.finish(second.ticket, PageResult::Photos(vec![photo("2")])));
        assert_eq!(session.tiles().len(), 1);
    }

    #[test]
    fn late_result_after_timeout_is_ignored() {
        let mut session = SessionState::new();
        let req = session.begin(search("cats")).unwrap();
        assert!(session.finish(req.ticket, PageResult::TimedOut));
        assert!(!session.finish(req.ticket, PageResult::Photos(vec![photo("late")])));
        assert!(session.tiles().is_empty());
        assert_eq!(session.last_outcome(), Some(&FetchOutcome::TimedOut));
    }

    #[test]
    fn failure_keeps_existing_tiles() {
        let mut session = SessionState::new();
        let req = session.begin(search("cats")).unwrap();
        session.finish(req.ticket, PageResult::Photos(vec![photo("1")]));

        let req = session.begin(Trigger::ScrollNearBottom).unwrap();
        session.finish(req.ticket, PageResult::Failed("Flickr error 100".to_string()));

        assert_eq!(session.tiles().len(), 1);
        assert_eq!(session.error_message(), Some("Flickr error 100"));
        assert_eq!(session.status(), FetchStatus::Idle);
    }
}
