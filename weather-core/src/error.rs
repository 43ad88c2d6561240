use thiserror::Error;

/// Failures of a single fetch against the weather provider.
///
/// The store turns every variant into the same thing: a human-readable
/// message in `WeatherState::error` and an empty report.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure (DNS, connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response; carries the provider's message when it sent one.
    #[error("{0}")]
    Provider(String),

    /// 2xx response that lacks fields every report needs.
    #[error("Incomplete weather data from server: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn malformed(what: impl Into<String>) -> Self {
        Self::MalformedResponse(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_shown_verbatim() {
        let err = WeatherError::Provider("No matching location found.".into());
        assert_eq!(err.to_string(), "No matching location found.");
    }

    #[test]
    fn malformed_mentions_missing_part() {
        let err = WeatherError::malformed("missing `forecast`");
        assert!(err.to_string().contains("missing `forecast`"));
    }
}
