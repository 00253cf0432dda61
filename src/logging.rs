use std::io::Write;

/// `RUST_LOG` wins over `default_level` when set.
pub fn init_logger(default_level: &str) {
    env_logger::Builder
        ::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
