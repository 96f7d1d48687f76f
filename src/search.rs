//! Title search, and how it drives the calendar selection

use crate::error::Error;
use crate::task::Task;
use crate::traits::TodoSource;
use crate::utils;

use chrono::Datelike;

/// Looks tasks up by title, and keeps track of the day the calendar should display.
///
/// A successful search jumps the selection to the day of the first match, so the user immediately sees the task they looked for. A search that matches nothing (or fails) leaves the selection where it was.
pub struct SearchService<S: TodoSource> {
    source: S,
    selected: String,
}

impl<S: TodoSource> SearchService<S> {
    pub fn new(source: S, initially_selected: String) -> Self {
        Self { source, selected: initially_selected }
    }

    /// The date key of the day the calendar should currently display
    pub fn selected_date_key(&self) -> &str {
        &self.selected
    }

    /// An ordinary calendar click: select a day directly
    pub fn select<D: Datelike>(&mut self, date: &D) {
        self.selected = utils::date_key(date);
    }

    /// Search tasks by title, and move the selection to the first match's day.
    ///
    /// Empty keywords and empty results are both reported as [`Error::NoMatch`], without touching the selection.
    pub async fn search(&mut self, keyword: &str) -> Result<Vec<Task>, Error> {
        if keyword.trim().is_empty() {
            return Err(Error::NoMatch { keyword: keyword.to_string() });
        }

        let results = self.source.search_by_title(keyword).await
            .map_err(|err| {
                log::error!("Unable to search for {:?}: {}", keyword, err);
                err
            })?;

        match results.first() {
            None => {
                log::info!("Nothing matches {:?}", keyword);
                Err(Error::NoMatch { keyword: keyword.to_string() })
            },
            Some(first) => {
                self.selected = utils::normalize_date_key(first.due_date())
                    .unwrap_or_else(|| first.due_date().to_string());
                log::debug!("Search {:?} moved the selection to {}", keyword, self.selected);
                Ok(results)
            },
        }
    }
}
