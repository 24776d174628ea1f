use super::config::Config;
use super::formatter::{format_badge, format_duration_setting, format_minutes, format_remaining};
use super::history::{HistoryTotals, PomodoroHistoryRecord};
use super::timer::TimerState;
use super::todo::Todo;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn todos(todos: &[Todo]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "DONE"]);
        for todo in todos {
            table.add_row(row![todo.id, todo.title, if todo.is_completed { "✔" } else { "" }]);
        }
        table.printstd();

        Ok(())
    }

    pub fn sites(blocked_sites: &[String], allowed_urls: &[String]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["KIND", "SITE"]);
        for site in blocked_sites {
            table.add_row(row!["blocked", site]);
        }
        for url in allowed_urls {
            table.add_row(row!["allowed", url]);
        }
        table.printstd();

        Ok(())
    }

    pub fn history(records: &[PomodoroHistoryRecord], totals: &HistoryTotals) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "POMODOROS", "TODOS", "FOCUS"]);
        for record in records {
            table.add_row(row![
                record.date.format("%Y-%m-%d"),
                record.total_pomodoros,
                record.completed_todos,
                format_minutes(record.total_work_time)
            ]);
        }
        table.add_row(row![
            format!("TOTAL ({} days)", totals.days),
            totals.total_pomodoros,
            totals.completed_todos,
            format_minutes(totals.total_work_time)
        ]);
        table.printstd();

        Ok(())
    }

    pub fn status(state: &TimerState, config: &Config, badge_text: Option<&str>, active_rules: usize) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["Phase", state.phase()]);
        table.add_row(row!["Remaining", format_remaining(state.remaining_millis)]);
        table.add_row(row!["Badge", badge_text.map(str::to_string).unwrap_or_else(|| format_badge(state.remaining_millis))]);
        table.add_row(row!["Ultra focus", if state.ultra_focus_mode { "on" } else { "off" }]);
        table.add_row(row!["Work / break / long break", durations(config)]);
        table.add_row(row!["Blocking rules", active_rules]);
        table.printstd();

        Ok(())
    }

    pub fn config(config: &Config, ultra_focus_mode: bool) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SETTING", "VALUE"]);
        table.add_row(row!["work", format_duration_setting(config.work_duration_millis)]);
        table.add_row(row!["break", format_duration_setting(config.break_duration_millis)]);
        table.add_row(row!["long break", format_duration_setting(config.long_break_duration_millis)]);
        table.add_row(row!["ultra focus", on_off(ultra_focus_mode)]);
        table.add_row(row![
            "sound",
            format!("{} {} ({:.0}%)", on_off(config.sound_enabled), config.selected_sound, config.sound_volume * 100.0)
        ]);
        table.add_row(row![
            "music",
            format!("{} {} ({:.0}%)", on_off(config.music_enabled), config.selected_music, config.music_volume * 100.0)
        ]);
        table.add_row(row!["notifications", on_off(config.notifications_enabled)]);
        table.add_row(row!["blocked sites", config.blocked_sites.len()]);
        table.add_row(row!["allowed urls", config.allowed_urls.len()]);
        table.printstd();

        Ok(())
    }
}

fn durations(config: &Config) -> String {
    format!(
        "{} / {} / {}",
        format_duration_setting(config.work_duration_millis),
        format_duration_setting(config.break_duration_millis),
        format_duration_setting(config.long_break_duration_millis)
    )
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
