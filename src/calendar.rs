//! Calendar-cell decoration helpers

use chrono::Datelike;

use crate::store::TaskIndex;
use crate::utils::date_key;

/// How many tasks are filed under the given day. Zero if the day is absent from the index.
///
/// Pure, no side effects: this only exists so calendar cells can show a per-day count.
pub fn badge_count<D: Datelike>(date: &D, index: &TaskIndex) -> usize {
    index.get(&date_key(date)).map(|tasks| tasks.len()).unwrap_or(0)
}

/// Whether the given day deserves an indicator dot
pub fn has_badge<D: Datelike>(date: &D, index: &TaskIndex) -> bool {
    badge_count(date, index) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::NaiveDate;

    #[test]
    fn counts_tasks_per_day() {
        let mut index = TaskIndex::new();
        index.insert("2024-5-1".to_string(), vec![
            Task::new("a".to_string(), "08:00".to_string(), "2024-5-1".to_string()),
            Task::new("b".to_string(), "12:00".to_string(), "2024-5-1".to_string()),
            Task::new("c".to_string(), "20:00".to_string(), "2024-5-1".to_string()),
        ]);

        let may_first = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let may_second = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(badge_count(&may_first, &index), 3);
        assert_eq!(badge_count(&may_second, &index), 0);
        assert!(has_badge(&may_first, &index));
        assert!(has_badge(&may_second, &index) == false);
    }
}
