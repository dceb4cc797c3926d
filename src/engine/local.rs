//! Local keyword responder
//!
//! Deterministic cascade over the lower-cased input, first match wins.
//! Single keywords match on word boundaries so "times" does not hit the
//! "time" branch; phrases match as plain substrings. Never fails and keeps
//! no history.

use async_trait::async_trait;
use chrono::Local;
use regex::Regex;

use super::ResponseEngine;
use crate::history::ConversationTurn;
use crate::Result;

/// Local pattern-matching response engine
pub struct LocalEngine {
    greeting: Regex,
    time: Regex,
    date: Regex,
    weather: Regex,
    reminder: Regex,
    calculate: Regex,
    search: Regex,
    arithmetic: Regex,
}

impl LocalEngine {
    /// Create a local engine with its patterns compiled
    ///
    /// # Panics
    ///
    /// Never panics; every pattern is a fixed, valid expression.
    #[must_use]
    pub fn new() -> Self {
        Self {
            greeting: Regex::new(r"\b(?:hello|hi)\b").expect("valid pattern"),
            time: Regex::new(r"\btime\b").expect("valid pattern"),
            date: Regex::new(r"\bdate\b").expect("valid pattern"),
            weather: Regex::new(r"\bweather\b").expect("valid pattern"),
            reminder: Regex::new(r"\bremind(?:er)?\b").expect("valid pattern"),
            calculate: Regex::new(r"\b(?:calculate|math)\b").expect("valid pattern"),
            search: Regex::new(r"\bsearch\b").expect("valid pattern"),
            arithmetic: Regex::new(
                r"what is (-?\d+) (plus|minus|times|divided by) (-?\d+)",
            )
            .expect("valid pattern"),
        }
    }

    /// Walk the cascade for one lower-cased message
    fn reply(&self, message: &str) -> String {
        let heard = message.trim();
        let text = heard.to_lowercase();

        if self.greeting.is_match(&text) {
            return "Hello! How can I help you today?".to_string();
        }

        if self.time.is_match(&text) {
            let now = Local::now();
            return format!("The current time is {}.", now.format("%-I:%M %p"));
        }

        if self.date.is_match(&text) {
            let today = Local::now();
            return format!("Today is {}.", today.format("%A, %B %-d, %Y"));
        }

        if self.weather.is_match(&text) {
            return "I don't have access to live weather data, but you can check \
                    your favorite weather app."
                .to_string();
        }

        if self.reminder.is_match(&text) {
            return "I can't set reminders yet, but that's a great idea for the future."
                .to_string();
        }

        if text.contains("play music") || text.contains("play song") {
            return "I can't play music myself, but you could open your favorite \
                    music app."
                .to_string();
        }

        if self.calculate.is_match(&text) {
            return "I can do simple math. Try asking me something like: what is \
                    12 plus 7."
                .to_string();
        }

        if self.search.is_match(&text) || text.contains("look up") {
            return "I can't search the web yet, but I'm happy to chat about what \
                    I know."
                .to_string();
        }

        if let Some(captures) = self.arithmetic.captures(&text) {
            return arithmetic_reply(&captures);
        }

        format!("I heard you say: {heard}. I'm still learning, so I may not have an answer for that yet.")
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseEngine for LocalEngine {
    async fn respond(&self, message: &str, _history: &[ConversationTurn]) -> Result<String> {
        Ok(self.reply(message))
    }

    fn retains_history(&self) -> bool {
        false
    }
}

/// Compute and phrase an arithmetic answer
///
/// Float semantics propagate: division by zero yields `inf`/`-inf`/`NaN`
/// rather than an error.
fn arithmetic_reply(captures: &regex::Captures<'_>) -> String {
    // The pattern guarantees integer captures
    let lhs: f64 = captures[1].parse().unwrap_or_default();
    let op = &captures[2];
    let rhs: f64 = captures[3].parse().unwrap_or_default();

    let result = match op {
        "plus" => lhs + rhs,
        "minus" => lhs - rhs,
        "times" => lhs * rhs,
        _ => lhs / rhs,
    };

    format!("{} {op} {} is {result}.", &captures[1], &captures[3])
}
