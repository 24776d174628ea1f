#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === TIMER MESSAGES ===
    TimerStarted(String), // remaining time
    TimerStopped,
    PhaseChanged(String, String), // phase, remaining time
    StaleSessionStopped,
    StaleTickIgnored(u64), // tick id
    UnknownEngineCommand(String),
    HistoryRecorded {
        pomodoros: u32,
        todos: u32,
        minutes: f64,
    },

    // === COLLABORATOR MESSAGES ===
    SoundPlayed(String, f64),        // sound, volume
    MusicStarted(String, f64, bool), // music, volume, looped
    MusicStopped(String),
    Notification(String, String), // title, message
    NotificationDismissed(String),
    AudioFailed(String),
    NotificationFailed(String),
    BadgeUpdateFailed(String),
    RuleInstallFailed(String),
    RuleRemovalFailed(String),

    // === STORE MESSAGES ===
    StoreReadFailed(String),
    StoreWriteFailed(String),
    StoreWriteDeferred(String), // key
    InvalidStoredValue(String, String), // key, error
    UnknownStoreKey(String),

    // === WATCHER MESSAGES ===
    WatcherStarted,
    WatcherShuttingDown,
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    FailedToCreateSigtermHandler,
    FailedToCreateSigintHandler,

    // === COMMAND MESSAGES ===
    CommandQueued(String),
    StatusHeader,
    ConfigHeader,
    ConfigSaved,
    ConfigNothingToChange,
    DurationsLockedWhileRunning,

    // === TODO MESSAGES ===
    TodoAdded(String, String), // id, title
    TodoCompleted(String),
    TodoReopened(String),
    TodoRemoved(String),
    TodoNotFound(String),
    TodoTitleEmpty,
    NoTodos,

    // === SITE MESSAGES ===
    SiteBlocked(String),
    SiteUnblocked(String),
    SiteAlreadyBlocked(String),
    SiteNotBlocked(String),
    UrlAllowed(String),
    UrlDisallowed(String),
    UrlAlreadyAllowed(String),
    UrlNotAllowed(String),
    UrlIsBlocked(String),
    UrlIsNotBlocked(String),
    InvalidSite(String),
    NoBlockedSites,
    NoAllowedUrls,

    // === HISTORY MESSAGES ===
    HistoryHeader(u64), // days
    NoHistory,
}
