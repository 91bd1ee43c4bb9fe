//! The host-side holder of the current token.
//!
//! A [`History`] owns the token that mirrors the address bar fragment and
//! notifies registered watchers whenever it changes.

use std::{fmt, mem};

use log::{debug, trace};

use sheet_history_core::{HistoryToken, HistoryTokenError};

use crate::{config::AppConfig, error::SheetHistoryError};

/// Handle returned by [`History::add_watcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherId(u64);

/// Callback invoked with the previous token and the history after a change.
type Watcher = Box<dyn FnMut(&HistoryToken, &History)>;

/// The current navigation state and its watchers.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use sheet_history::{History, config::AppConfig};
///
/// let mut history = History::new(AppConfig::default());
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let log = Rc::clone(&seen);
/// history.add_watcher(move |previous, history| {
///     log.borrow_mut().push((
///         previous.url_fragment().to_string(),
///         history.current().url_fragment().to_string(),
///     ));
/// });
///
/// history.push_fragment("/123/Sales/cell/A1");
/// assert_eq!(
///     *seen.borrow(),
///     vec![("/*".to_string(), "/123/Sales/cell/A1".to_string())]
/// );
/// ```
pub struct History {
    config: AppConfig,
    current: HistoryToken,
    watchers: Vec<(WatcherId, Watcher)>,
    next_watcher_id: u64,
}

impl History {
    /// Creates a history positioned at the configured initial fragment.
    pub fn new(config: AppConfig) -> Self {
        let current = with_default_count(
            sheet_history_parser::parse(config.history().initial_fragment()),
            &config,
        );
        debug!(token = current.url_fragment(); "History created");
        Self {
            config,
            current,
            watchers: Vec::new(),
            next_watcher_id: 0,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn current(&self) -> &HistoryToken {
        &self.current
    }

    /// Parses `fragment` and makes it current.
    ///
    /// Paginated tokens without a count receive the configured default count.
    /// Returns true if the current token changed.
    pub fn push_fragment(&mut self, fragment: &str) -> bool {
        let token = with_default_count(sheet_history_parser::parse(fragment), &self.config);
        self.push_token(token)
    }

    /// Makes `token` current and notifies every watcher.
    ///
    /// Nothing happens when `token` equals the current token. Returns true if
    /// the current token changed.
    pub fn push_token(&mut self, token: HistoryToken) -> bool {
        if token == self.current {
            trace!(token = token.url_fragment(); "Token unchanged");
            return false;
        }

        let previous = mem::replace(&mut self.current, token);
        debug!(
            from = previous.url_fragment(),
            to = self.current.url_fragment();
            "Current token changed"
        );
        self.notify(&previous);
        true
    }

    /// Applies a transition to the current token and pushes the result.
    ///
    /// # Errors
    ///
    /// Returns [`SheetHistoryError::Token`] if the transition rejects its
    /// arguments. The current token is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheet_history::{History, config::AppConfig};
    ///
    /// let mut history = History::new(AppConfig::default());
    /// history.push_fragment("/123/Sales/column/A");
    /// history.apply(|token| token.freeze()).unwrap();
    /// assert_eq!(history.current().url_fragment(), "/123/Sales/column/A/freeze");
    /// ```
    pub fn apply<F>(&mut self, transition: F) -> Result<bool, SheetHistoryError>
    where
        F: FnOnce(&HistoryToken) -> Result<HistoryToken, HistoryTokenError>,
    {
        let token = transition(&self.current)?;
        Ok(self.push_token(token))
    }

    /// Registers `watcher`, called after every change in registration order.
    pub fn add_watcher<F>(&mut self, watcher: F) -> WatcherId
    where
        F: FnMut(&HistoryToken, &History) + 'static,
    {
        let id = WatcherId(self.next_watcher_id);
        self.next_watcher_id += 1;
        self.watchers.push((id, Box::new(watcher)));
        trace!(id = id.0, watchers = self.watchers.len(); "Watcher added");
        id
    }

    /// Unregisters a watcher. Returns false if `id` was not registered.
    pub fn remove_watcher(&mut self, id: WatcherId) -> bool {
        let before = self.watchers.len();
        self.watchers.retain(|(watcher_id, _)| *watcher_id != id);
        let removed = self.watchers.len() != before;
        trace!(id = id.0, removed; "Watcher removed");
        removed
    }

    fn notify(&mut self, previous: &HistoryToken) {
        // Watchers observe `self` immutably while being called mutably.
        let mut watchers = mem::take(&mut self.watchers);
        for (_, watcher) in &mut watchers {
            watcher(previous, self);
        }
        self.watchers = watchers;
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("config", &self.config)
            .field("current", &self.current)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

fn with_default_count(token: HistoryToken, config: &AppConfig) -> HistoryToken {
    match (token.offset_and_count(), config.list().default_count()) {
        (Some(oc), Some(count)) if oc.count().is_none() => token.set_count(Some(count)),
        _ => token,
    }
}
