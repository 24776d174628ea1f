mod common;

#[cfg(test)]
mod tests {
    use super::common::{Event, Harness, Recorder};
    use chrono::NaiveDate;
    use pomodoro_grande::db::keys;
    use pomodoro_grande::db::store::Store;
    use pomodoro_grande::db::todos::Todos;
    use pomodoro_grande::libs::config::{ConfigPatch, ONE_MINUTE_MS};
    use pomodoro_grande::libs::engine::Command;
    use pomodoro_grande::libs::history;
    use pomodoro_grande::libs::timer::{BreakKind, Phase, BREAK_COLOR, TICK_INTERVAL, WORK_COLOR};
    use test_context::test_context;

    fn store_with(entries: &[(&str, serde_json::Value)]) -> Store {
        let store = Store::in_memory().unwrap();
        store.set_many(entries).unwrap();
        store
    }

    /// One-minute work and break phases, two-minute long breaks.
    fn short_cycle_store() -> Store {
        store_with(&[
            (keys::WORK_TIME, serde_json::json!(ONE_MINUTE_MS)),
            (keys::BREAK_TIME, serde_json::json!(ONE_MINUTE_MS)),
            (keys::LONG_BREAK, serde_json::json!(2 * ONE_MINUTE_MS)),
        ])
    }

    #[test_context(Harness)]
    #[test]
    fn test_start_enters_work_phase(h: &mut Harness) {
        h.engine.handle(Command::Start);

        let state = h.engine.state();
        assert_eq!(state.phase(), Phase::Working);
        assert_eq!(state.remaining_millis, 25 * ONE_MINUTE_MS);
        assert_eq!(h.ticker.scheduled().len(), 1);
        assert_eq!(h.ticker.scheduled()[0].1, TICK_INTERVAL);
        assert_eq!(h.recorder.last_badge_text().as_deref(), Some("25:00"));
        assert_eq!(h.recorder.last_badge_color().as_deref(), Some(WORK_COLOR));

        assert_eq!(h.store.get::<bool>(keys::IS_RUNNING).unwrap(), Some(true));
        assert_eq!(h.store.get::<u64>(keys::TIME).unwrap(), Some(25 * ONE_MINUTE_MS));
    }

    #[test_context(Harness)]
    #[test]
    fn test_remaining_time_decreases_by_one_second_per_tick(h: &mut Harness) {
        h.engine.start();

        let mut previous = h.engine.state().remaining_millis;
        for _ in 0..90 {
            h.advance(1);
            let remaining = h.engine.state().remaining_millis;
            assert_eq!(remaining, previous - 1000);
            previous = remaining;
        }
        assert_eq!(h.recorder.last_badge_text().as_deref(), Some("23:30"));
        assert_eq!(h.store.get::<u64>(keys::TIME).unwrap(), Some(previous));
    }

    #[test_context(Harness)]
    #[test]
    fn test_restart_cancels_previous_tick_source(h: &mut Harness) {
        h.engine.start();
        let first = h.ticker.active()[0];
        h.advance(10);

        h.engine.start();
        assert_eq!(h.ticker.cancelled(), vec![first]);
        assert_eq!(h.ticker.active().len(), 1);

        h.advance(1);
        assert_eq!(h.engine.state().remaining_millis, 25 * ONE_MINUTE_MS - 1000);

        // A late tick from the first source changes nothing.
        h.engine.tick(first);
        assert_eq!(h.engine.state().remaining_millis, 25 * ONE_MINUTE_MS - 1000);
    }

    #[test_context(Harness)]
    #[test]
    fn test_full_pomodoro_enters_short_break(h: &mut Harness) {
        h.engine.start();
        h.advance(25 * 60);

        let state = h.engine.state();
        assert!(state.is_running);
        assert_eq!(state.phase(), Phase::OnBreak(BreakKind::Short));
        assert_eq!(state.remaining_millis, 5 * ONE_MINUTE_MS);
        assert_eq!(state.pomodoro_count, 1);

        assert_eq!(h.recorder.notifications(), vec!["Quick break! ☀️"]);
        assert_eq!(h.recorder.last_badge_color().as_deref(), Some(BREAK_COLOR));
        assert_eq!(h.recorder.last_badge_text().as_deref(), Some("05:00"));
        assert_eq!(h.recorder.count(&Event::Sound("clock.mp3".into(), 0.5)), 1);
        assert!(h.recorder.installed_rules().is_none());
        assert_eq!(h.store.get::<bool>(keys::IS_BREAK).unwrap(), Some(true));
    }

    #[test]
    fn test_every_fourth_break_is_long() {
        let mut h = Harness::with_store(short_cycle_store());
        h.engine.start();

        h.advance(7 * 60);

        assert_eq!(
            h.recorder.notifications(),
            vec![
                "Quick break! ☀️",
                "Focus time! ⚡",
                "Quick break! ☀️",
                "Focus time! ⚡",
                "Quick break! ☀️",
                "Focus time! ⚡",
                "Long Break! ✨",
            ]
        );
        let state = h.engine.state();
        assert_eq!(state.pomodoro_count, 4);
        assert_eq!(state.phase(), Phase::OnBreak(BreakKind::Long));
        assert_eq!(state.remaining_millis, 2 * ONE_MINUTE_MS);
        assert_eq!(h.store.get::<bool>(keys::IS_LONG_BREAK).unwrap(), Some(true));
    }

    #[test]
    fn test_work_phase_after_break_restores_blocking_and_music() {
        let mut h = Harness::with_store(short_cycle_store());
        h.engine.start();
        assert_eq!(h.recorder.count(&Event::Music("lofi.mp3".into(), 0.5, true)), 0);

        h.advance(60);
        assert!(h.recorder.installed_rules().is_none());
        h.advance(60);

        assert_eq!(h.engine.state().phase(), Phase::Working);
        assert!(h.recorder.installed_rules().is_some());
        assert_eq!(h.recorder.count(&Event::Music("lofi.mp3".into(), 0.5, true)), 1);
        assert_eq!(h.recorder.last_badge_color().as_deref(), Some(WORK_COLOR));
    }

    #[test]
    fn test_disabled_sound_and_notifications_stay_silent() {
        let store = store_with(&[
            (keys::IS_SOUND_ENABLED, serde_json::json!(false)),
            (keys::IS_NOTIFICATION_ENABLED, serde_json::json!(false)),
            (keys::IS_MUSIC_ENABLED, serde_json::json!(false)),
        ]);
        let mut h = Harness::with_store(store);
        h.engine.start();
        h.advance(30 * 60);

        let events = h.recorder.events();
        assert!(!events.iter().any(|e| matches!(e, Event::Sound(..) | Event::Music(..) | Event::Notification(..))));
        assert_eq!(h.engine.state().phase(), Phase::Working);
    }

    #[test_context(Harness)]
    #[test]
    fn test_stop_resets_and_records_history(h: &mut Harness) {
        h.engine.start();
        h.advance(25 * 60 + 30);

        h.engine.handle(Command::Stop);

        let state = h.engine.state();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.pomodoro_count, 0);
        assert_eq!(state.remaining_millis, 25 * ONE_MINUTE_MS);
        assert!(!h.engine.is_ticking());
        assert_eq!(h.recorder.last_badge_text().as_deref(), Some("25:00"));
        assert_eq!(h.recorder.last_badge_color().as_deref(), Some(WORK_COLOR));
        assert_eq!(h.recorder.events().last(), Some(&Event::BadgeText("25:00".into())));

        let records = history::load(&h.store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(records[0].total_pomodoros, 1);
        assert_eq!(records[0].completed_todos, 0);
        assert_eq!(records[0].total_work_time, 25.0);

        assert_eq!(h.store.get::<bool>(keys::IS_RUNNING).unwrap(), Some(false));
        assert_eq!(h.store.get::<u64>(keys::TIME).unwrap(), Some(25 * ONE_MINUTE_MS));
    }

    #[test_context(Harness)]
    #[test]
    fn test_stop_before_first_pomodoro_records_nothing(h: &mut Harness) {
        h.engine.start();
        h.advance(10 * 60);
        h.engine.stop();

        assert!(history::load(&h.store).unwrap().is_empty());
    }

    #[test_context(Harness)]
    #[test]
    fn test_stop_while_idle_is_idempotent(h: &mut Harness) {
        h.engine.stop();
        h.engine.stop();

        assert_eq!(h.engine.state().phase(), Phase::Idle);
        assert!(history::load(&h.store).unwrap().is_empty());
        assert!(h.ticker.cancelled().is_empty());
    }

    #[test_context(Harness)]
    #[test]
    fn test_no_tick_applies_after_stop(h: &mut Harness) {
        h.engine.start();
        let id = h.ticker.active()[0];
        h.advance(5);
        h.engine.stop();
        h.recorder.clear();

        h.engine.tick(id);
        h.engine.tick(id);

        assert_eq!(h.engine.state().remaining_millis, 25 * ONE_MINUTE_MS);
        assert!(h.recorder.events().is_empty());
        assert_eq!(h.store.get::<u64>(keys::TIME).unwrap(), Some(25 * ONE_MINUTE_MS));
    }

    #[test]
    fn test_ultra_focus_session_ends_after_work_time() {
        let store = store_with(&[
            (keys::WORK_TIME, serde_json::json!(60 * ONE_MINUTE_MS)),
            (keys::ULTRA_FOCUS_MODE, serde_json::json!(true)),
        ]);
        let mut h = Harness::with_store(store);
        h.engine.start();

        h.advance(60 * 60);

        assert_eq!(h.engine.state().phase(), Phase::Idle);
        assert!(!h.engine.is_ticking());
        assert_eq!(h.recorder.count(&Event::ClearRules), 1);
        assert_eq!(h.recorder.notifications(), vec!["Session ended! 🎉"]);

        let records = history::load(&h.store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_pomodoros, 1);
        assert!((records[0].total_work_time - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_ultra_focus_session_end_is_always_announced() {
        let store = store_with(&[
            (keys::WORK_TIME, serde_json::json!(ONE_MINUTE_MS)),
            (keys::ULTRA_FOCUS_MODE, serde_json::json!(true)),
            (keys::IS_NOTIFICATION_ENABLED, serde_json::json!(false)),
        ]);
        let mut h = Harness::with_store(store);
        h.engine.start();

        h.advance(60);

        assert_eq!(h.engine.state().phase(), Phase::Idle);
        assert_eq!(h.recorder.notifications(), vec!["Session ended! 🎉"]);
    }

    #[test]
    fn test_session_is_recorded_over_unreadable_history() {
        let store = store_with(&[
            (keys::WORK_TIME, serde_json::json!(ONE_MINUTE_MS)),
            (
                keys::POMODORO_HISTORY,
                serde_json::json!([{ "createdAt": "3/10/2025, 9:30:00 AM", "totalPomodoros": 1, "completedTodos": 0, "totalWorkTime": 25.0 }]),
            ),
        ]);
        let mut h = Harness::with_store(store);
        h.engine.start();
        h.advance(60);
        h.engine.stop();

        let records = history::load(&h.store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_pomodoros, 1);
        assert!((records[0].total_work_time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ultra_focus_stopped_early_counts_elapsed_minutes() {
        let store = store_with(&[(keys::ULTRA_FOCUS_MODE, serde_json::json!(true))]);
        let mut h = Harness::with_store(store);
        h.engine.start();

        h.advance(10 * 60 + 30);
        h.engine.stop();

        let records = history::load(&h.store).unwrap();
        assert_eq!(records[0].total_pomodoros, 0);
        assert!((records[0].total_work_time - 10.5).abs() < 1e-9);
        assert!(h.recorder.notifications().is_empty());
    }

    #[test]
    fn test_blocked_site_is_blocked_only_while_running() {
        let store = store_with(&[(keys::BLOCKED_SITES, serde_json::json!(["example.com"]))]);
        let mut h = Harness::with_store(store);

        h.engine.start();
        let rules = h.recorder.installed_rules().unwrap();
        assert!(rules.is_blocked("https://example.com/").unwrap());
        assert!(rules.is_blocked("https://www.example.com/news").unwrap());

        h.engine.stop();
        assert!(h.recorder.installed_rules().is_none());
    }

    #[test]
    fn test_persisted_running_state_is_stopped_on_startup() {
        let store = store_with(&[
            (keys::IS_RUNNING, serde_json::json!(true)),
            (keys::IS_BREAK, serde_json::json!(true)),
            (keys::TIME, serde_json::json!(42_000)),
        ]);
        let h = Harness::with_store(store);

        let state = h.engine.state();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.remaining_millis, 25 * ONE_MINUTE_MS);
        assert!(!h.engine.is_ticking());
        assert_eq!(h.recorder.count(&Event::ClearRules), 1);
        assert_eq!(h.store.get::<bool>(keys::IS_RUNNING).unwrap(), Some(false));
        assert_eq!(h.store.get::<bool>(keys::IS_BREAK).unwrap(), Some(false));
        assert!(history::load(&h.store).unwrap().is_empty());
    }

    #[test]
    fn test_persisted_idle_state_is_restored_on_startup() {
        let store = store_with(&[(keys::TIME, serde_json::json!(42_000))]);
        let h = Harness::with_store(store);

        assert_eq!(h.engine.state().remaining_millis, 42_000);
        assert_eq!(h.recorder.last_badge_text().as_deref(), Some("00:42"));
    }

    #[test_context(Harness)]
    #[test]
    fn test_completed_todos_are_counted_per_session(h: &mut Harness) {
        let todos = Todos::new(h.store.clone());
        todos.insert("write tests").unwrap();
        todos.insert("review").unwrap();
        todos.set_completed("2", true).unwrap();

        h.engine.start();
        todos.set_completed("1", true).unwrap();
        let added = todos.insert("ship").unwrap();
        todos.set_completed(&added.id, true).unwrap();

        h.engine.apply_config_patch(ConfigPatch {
            todos: Some(todos.fetch().unwrap()),
            ..Default::default()
        });
        assert_eq!(h.engine.completed_todos(), ["3".to_string(), "1".to_string()]);

        h.advance(25 * 60);
        h.engine.stop();

        let records = history::load(&h.store).unwrap();
        assert_eq!(records[0].completed_todos, 2);
    }

    #[test_context(Harness)]
    #[test]
    fn test_todo_changes_while_idle_are_ignored(h: &mut Harness) {
        h.engine.apply_config_patch(ConfigPatch {
            todos: Some(vec![pomodoro_grande::libs::todo::Todo {
                id: "1".into(),
                title: "done already".into(),
                is_completed: true,
            }]),
            ..Default::default()
        });

        assert!(h.engine.completed_todos().is_empty());
    }

    #[test_context(Harness)]
    #[test]
    fn test_work_time_change_while_idle_resets_badge(h: &mut Harness) {
        h.engine.apply_config_patch(ConfigPatch {
            work_time: Some(50 * ONE_MINUTE_MS),
            ..Default::default()
        });

        assert_eq!(h.engine.state().remaining_millis, 50 * ONE_MINUTE_MS);
        assert_eq!(h.recorder.last_badge_text().as_deref(), Some("50:00"));
        assert_eq!(h.store.get::<u64>(keys::TIME).unwrap(), Some(50 * ONE_MINUTE_MS));
    }

    #[test_context(Harness)]
    #[test]
    fn test_duration_change_while_running_applies_at_next_phase(h: &mut Harness) {
        h.engine.start();
        h.advance(60);

        h.engine.apply_config_patch(ConfigPatch {
            work_time: Some(50 * ONE_MINUTE_MS),
            break_time: Some(10 * ONE_MINUTE_MS),
            ..Default::default()
        });
        assert_eq!(h.engine.state().remaining_millis, 24 * ONE_MINUTE_MS);

        h.advance(24 * 60);
        assert_eq!(h.engine.state().remaining_millis, 10 * ONE_MINUTE_MS);
    }

    #[test_context(Harness)]
    #[test]
    fn test_site_list_change_reinstalls_rules_during_work(h: &mut Harness) {
        h.engine.start();

        h.engine.apply_config_patch(ConfigPatch {
            blocked_sites: Some(vec!["example.org".into()]),
            allowed_urls: Some(vec!["https://example.org/docs".into()]),
            ..Default::default()
        });

        let rules = h.recorder.installed_rules().unwrap();
        assert!(rules.is_blocked("https://example.org/feed").unwrap());
        assert!(!rules.is_blocked("https://example.org/docs/start").unwrap());
        assert!(!rules.is_blocked("https://youtube.com/").unwrap());
    }

    #[test]
    fn test_site_list_change_during_break_keeps_sites_open() {
        let mut h = Harness::with_store(short_cycle_store());
        h.engine.start();
        h.advance(60);

        h.engine.apply_config_patch(ConfigPatch {
            blocked_sites: Some(vec!["example.org".into()]),
            ..Default::default()
        });

        assert!(h.recorder.installed_rules().is_none());
    }

    #[test]
    fn test_collaborator_failures_do_not_interrupt_the_session() {
        let mut h = Harness::with_parts(Store::in_memory().unwrap(), Recorder::failing());
        h.engine.start();
        h.advance(25 * 60);

        assert_eq!(h.engine.state().phase(), Phase::OnBreak(BreakKind::Short));
        assert_eq!(h.recorder.notifications(), vec!["Quick break! ☀️"]);

        h.engine.stop();
        assert_eq!(history::load(&h.store).unwrap().len(), 1);
    }

    #[test]
    fn test_command_names() {
        assert_eq!("start-timer".parse::<Command>().unwrap(), Command::Start);
        assert_eq!("stop-timer".parse::<Command>().unwrap(), Command::Stop);
        assert_eq!(Command::Stop.as_str(), "stop-timer");
        assert!("pause-timer".parse::<Command>().is_err());
    }
}
