use std::time::Duration;
use tracing::Level;

/// Configuration for [`Db`](crate::Db).
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Whether to emit the compiled SQL before each query.
    pub logging_enabled: bool,
    /// Tracing level for SQL log events.
    pub log_level: Level,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Queries slower than this are reported with `warn!`.
    pub slow_query_threshold: Option<Duration>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            logging_enabled: true,
            log_level: Level::DEBUG,
            max_sql_length: Some(200),
            slow_query_threshold: None,
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable SQL logging.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Override the tracing level of SQL log events.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Set slow query threshold.
    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = DbConfig::new()
            .logging(false)
            .log_level(Level::INFO)
            .slow_query_threshold(Duration::from_millis(50))
            .no_truncate();
        assert!(!config.logging_enabled);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.slow_query_threshold, Some(Duration::from_millis(50)));
        assert_eq!(config.max_sql_length, None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let config = DbConfig::new().max_sql_length(4);
        assert_eq!(config.truncate_sql("SELECT"), "SELE...");
        assert_eq!(config.truncate_sql("SEL"), "SEL");
        assert_eq!(config.truncate_sql("abcé"), "abc...");
    }
}
