use {
    crate::Config,
    std::{io::IsTerminal, sync::Once},
    time::macros::format_description,
    tracing::Level,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes the global tracing subscriber.
///
/// Events strictly more severe than the configured stderr threshold go to
/// stderr, all other events go to stdout. `env_filter` has the syntax documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
}

/// Like [`initialize`], but can be called multiple times in a row. Later calls
/// are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(env_filter: &str) {
    // The tracing subscriber below is a global object so initializing it again
    // in the same process by a different thread would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(&Config::default().with_env_filter(env_filter));
    });
}

fn set_tracing_subscriber(config: &Config) {
    let stderr_threshold = config
        .stderr_threshold
        .into_level()
        .unwrap_or(Level::ERROR);
    let writer = std::io::stdout
        .with_min_level(stderr_threshold)
        .or_else(std::io::stderr);
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ));

    // The json and the plain formatter have different types so each branch
    // builds its own boxed layer.
    let fmt_layer = if config.use_json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(timer)
            .with_filter(EnvFilter::new(&config.env_filter))
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_timer(timer)
            .with_ansi(std::io::stdout().is_terminal())
            .with_filter(EnvFilter::new(&config.env_filter))
            .boxed()
    };

    tracing_subscriber::registry().with(fmt_layer).init();
}
