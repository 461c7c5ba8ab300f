use std::ops::Deref;

use serde::Deserialize;

/// Duration config value, e.g. `"30s"`, `"5m"` or `"1d 2h 3m 4s"`. Bare
/// numbers are interpreted as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom("Invalid duration"))
    }
}

fn parse(raw: &str) -> Option<std::time::Duration> {
    let mut total = std::time::Duration::default();
    for part in raw.split_whitespace() {
        let (digits, unit) = match part.find(|c: char| !c.is_ascii_digit()) {
            Some(idx) => part.split_at(idx),
            None => (part, ""),
        };
        let value = digits.parse::<u64>().ok()?;
        let seconds = match unit {
            "" | "s" => value,
            "m" => value * 60,
            "h" => value * 60 * 60,
            "d" => value * 24 * 60 * 60,
            _ => return None,
        };
        total += std::time::Duration::from_secs(seconds);
    }
    Some(total)
}
