#[cfg(test)]
mod tests {
    use chrono::{Days, Local, NaiveDate, TimeZone};
    use pomodoro_grande::db::store::Store;
    use pomodoro_grande::libs::config::{Config, ONE_MINUTE_MS};
    use pomodoro_grande::libs::history::{self, aggregate, recent, total_work_minutes, totals, SessionRecord, HISTORY_LIMIT};
    use pomodoro_grande::libs::timer::TimerState;
    use serde_json::json;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_same_day_sessions_are_merged() {
        let history = aggregate(Vec::new(), SessionRecord::new(at(2025, 3, 10, 9), 2, 1, 50.0));
        let history = aggregate(history, SessionRecord::new(at(2025, 3, 10, 17), 1, 0, 25.0));

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(history[0].total_pomodoros, 3);
        assert_eq!(history[0].completed_todos, 1);
        assert_eq!(history[0].total_work_time, 75.0);
    }

    #[test]
    fn test_days_keep_first_seen_order() {
        let mut history = Vec::new();
        history = aggregate(history, SessionRecord::new(at(2025, 3, 11, 9), 1, 0, 25.0));
        history = aggregate(history, SessionRecord::new(at(2025, 3, 10, 9), 1, 0, 25.0));
        history = aggregate(history, SessionRecord::new(at(2025, 3, 11, 20), 1, 0, 25.0));

        let dates: Vec<String> = history.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-03-11", "2025-03-10"]);
        assert_eq!(history[0].total_pomodoros, 2);
    }

    #[test]
    fn test_history_is_capped_at_the_latest_days() {
        let first = at(2025, 1, 1, 12);
        let mut history = Vec::new();
        for offset in 0..HISTORY_LIMIT as u64 {
            history = aggregate(history, SessionRecord::new(first + Days::new(offset), 1, 0, 25.0));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);

        history = aggregate(history, SessionRecord::new(first + Days::new(HISTORY_LIMIT as u64), 1, 0, 25.0));

        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(history[HISTORY_LIMIT - 1].date, (first + Days::new(HISTORY_LIMIT as u64)).date_naive());
    }

    #[test]
    fn test_work_minutes_for_regular_and_ultra_sessions() {
        let config = Config::default();
        let mut state = TimerState::idle(&config);
        state.pomodoro_count = 3;
        assert_eq!(total_work_minutes(&state, &config), 75.0);

        state.ultra_focus_mode = true;
        state.remaining_millis = config.work_duration_millis - 90 * 1000;
        assert_eq!(total_work_minutes(&state, &config), 1.5);

        state.remaining_millis = config.work_duration_millis - ONE_MINUTE_MS / 3;
        let minutes = total_work_minutes(&state, &config);
        assert!((minutes - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_record_replaces_stored_history() {
        let store = Store::in_memory().unwrap();
        history::record(&store, SessionRecord::new(at(2025, 3, 10, 9), 2, 1, 50.0)).unwrap();
        history::record(&store, SessionRecord::new(at(2025, 3, 10, 11), 1, 0, 25.0)).unwrap();

        let stored = history::load(&store).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].total_pomodoros, 3);

        let raw = store.get_raw("pomodoroHistory").unwrap().unwrap();
        assert_eq!(raw[0]["createdAt"], "2025-03-10");
        assert_eq!(raw[0]["totalPomodoros"], 3);
        assert_eq!(raw[0]["completedTodos"], 1);
        assert_eq!(raw[0]["totalWorkTime"], 75.0);
    }

    #[test]
    fn test_record_skips_entries_that_do_not_decode() {
        let store = Store::in_memory().unwrap();
        store
            .set(
                "pomodoroHistory",
                &json!([
                    { "createdAt": "3/10/2025, 9:30:00 AM", "totalPomodoros": 1, "completedTodos": 0, "totalWorkTime": 25.0 },
                    { "createdAt": "2025-03-09", "totalPomodoros": 2, "completedTodos": 1, "totalWorkTime": 50.0 }
                ]),
            )
            .unwrap();

        let history = history::record(&store, SessionRecord::new(at(2025, 3, 10, 9), 1, 0, 25.0)).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(history[1].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());

        assert_eq!(history::load(&store).unwrap(), history);
    }

    #[test]
    fn test_history_that_is_not_a_list_starts_over() {
        let store = Store::in_memory().unwrap();
        store.set("pomodoroHistory", "corrupted").unwrap();

        assert!(history::load(&store).unwrap().is_empty());
        let history = history::record(&store, SessionRecord::new(at(2025, 3, 10, 9), 1, 0, 25.0)).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_recent_and_totals() {
        let mut history = Vec::new();
        history = aggregate(history, SessionRecord::new(at(2025, 3, 1, 9), 4, 2, 100.0));
        history = aggregate(history, SessionRecord::new(at(2025, 3, 9, 9), 2, 1, 50.0));
        history = aggregate(history, SessionRecord::new(at(2025, 3, 10, 9), 1, 0, 25.0));

        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let week = recent(&history, today, 7);
        assert_eq!(week.len(), 2);

        let sum = totals(&week);
        assert_eq!(sum.days, 2);
        assert_eq!(sum.total_pomodoros, 3);
        assert_eq!(sum.completed_todos, 1);
        assert_eq!(sum.total_work_time, 75.0);
    }
}
