//! Calculator-style duration entry.
//!
//! Digits are appended to a buffer of at most six characters. The buffer is
//! read right-aligned as `HHMMSS`, so typing `5`, `9` shows `00:00:59` and a
//! third digit `1` shows `00:05:91` until it is confirmed or corrected.

use serde::{Deserialize, Serialize};

use super::display::format_hms;
use crate::error::ValidationError;

/// Longest duration accepted from the editor (03:00:00).
pub const MAX_DURATION_SECS: u64 = 10_800;

const MAX_DIGITS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "lowercase")]
pub enum EditKey {
    Digit(u8),
    Backspace,
    Delete,
    /// Confirm.
    Enter,
    /// Cancel.
    Escape,
    /// The editor lost focus; treated like `Escape`.
    Blur,
}

impl EditKey {
    /// Parse a key name as reported by a keyboard layer (`"7"`, `"Enter"`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Backspace" => Some(EditKey::Backspace),
            "Delete" => Some(EditKey::Delete),
            "Enter" => Some(EditKey::Enter),
            "Escape" => Some(EditKey::Escape),
            "Blur" => Some(EditKey::Blur),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.to_digit(10).map(|d| EditKey::Digit(d as u8)),
                    _ => None,
                }
            }
        }
    }
}

/// The in-progress edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEdit {
    digits: String,
    /// Remaining seconds when editing began; shown until the first key.
    prior_secs: u64,
    touched: bool,
}

impl TimeEdit {
    pub fn new(prior_secs: u64) -> Self {
        Self {
            digits: String::new(),
            prior_secs,
            touched: false,
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn prior_secs(&self) -> u64 {
        self.prior_secs
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Append a digit. Returns `false` if the buffer is full or `digit > 9`.
    pub fn push_digit(&mut self, digit: u8) -> bool {
        if digit > 9 || self.digits.len() >= MAX_DIGITS {
            return false;
        }
        self.digits.push(char::from(b'0' + digit));
        self.touched = true;
        true
    }

    /// Drop the most recently typed digit.
    pub fn pop_digit(&mut self) -> Option<char> {
        self.touched = true;
        self.digits.pop()
    }

    pub fn display(&self) -> String {
        if !self.touched {
            return format_hms(self.prior_secs);
        }
        let (h, m, s) = self.fields();
        format!("{h:02}:{m:02}:{s:02}")
    }

    /// Interpret the buffer.
    ///
    /// `Ok(None)` means there is nothing to commit (empty or all zeros).
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidTimeField`] when minutes or seconds are 60 or
    /// more, [`ValidationError::DurationTooLong`] above three hours.
    pub fn resolve(&self) -> Result<Option<u64>, ValidationError> {
        if self.digits.is_empty() {
            return Ok(None);
        }
        let (h, m, s) = self.fields();
        if m >= 60 || s >= 60 {
            return Err(ValidationError::InvalidTimeField {
                minutes: m,
                seconds: s,
            });
        }
        let total = u64::from(h) * 3600 + u64::from(m) * 60 + u64::from(s);
        if total == 0 {
            return Ok(None);
        }
        if total > MAX_DURATION_SECS {
            return Err(ValidationError::DurationTooLong { total_secs: total });
        }
        Ok(Some(total))
    }

    fn fields(&self) -> (u32, u32, u32) {
        let padded = format!("{:0>6}", self.digits);
        let pair = |i: usize| padded[i..i + 2].parse::<u32>().unwrap_or(0);
        (pair(0), pair(2), pair(4))
    }
}

/// Minutes stored in the mode setting for an entered duration.
pub fn minutes_for(total_secs: u64) -> u32 {
    total_secs.div_ceil(60) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(digits: &str) -> TimeEdit {
        let mut edit = TimeEdit::new(1500);
        for c in digits.chars() {
            edit.push_digit(c.to_digit(10).unwrap() as u8);
        }
        edit
    }

    #[test]
    fn digits_fill_from_the_right() {
        assert_eq!(typed("5").display(), "00:00:05");
        assert_eq!(typed("59").display(), "00:00:59");
        assert_eq!(typed("123").display(), "00:01:23");
        assert_eq!(typed("013059").display(), "01:30:59");
    }

    #[test]
    fn untouched_edit_shows_prior_value() {
        let edit = TimeEdit::new(1500);
        assert_eq!(edit.display(), "00:25:00");
    }

    #[test]
    fn emptied_buffer_shows_zeros() {
        let mut edit = typed("7");
        edit.pop_digit();
        assert_eq!(edit.display(), "00:00:00");
    }

    #[test]
    fn seventh_digit_is_ignored() {
        let mut edit = typed("123456");
        assert!(!edit.push_digit(7));
        assert_eq!(edit.digits(), "123456");
    }

    #[test]
    fn backspace_removes_rightmost_digit() {
        let mut edit = typed("1234");
        assert_eq!(edit.pop_digit(), Some('4'));
        assert_eq!(edit.display(), "00:01:23");
    }

    #[test]
    fn resolve_valid_entry() {
        assert_eq!(typed("013059").resolve(), Ok(Some(5459)));
        assert_eq!(minutes_for(5459), 91);
        assert_eq!(typed("030000").resolve(), Ok(Some(10_800)));
    }

    #[test]
    fn resolve_rejects_bad_fields() {
        assert_eq!(
            typed("006100").resolve(),
            Err(ValidationError::InvalidTimeField { minutes: 61, seconds: 0 })
        );
        assert!(matches!(
            typed("75").resolve(),
            Err(ValidationError::InvalidTimeField { seconds: 75, .. })
        ));
    }

    #[test]
    fn resolve_rejects_over_three_hours() {
        assert_eq!(
            typed("030001").resolve(),
            Err(ValidationError::DurationTooLong { total_secs: 10_801 })
        );
    }

    #[test]
    fn empty_or_zero_resolves_to_nothing() {
        assert_eq!(TimeEdit::new(60).resolve(), Ok(None));
        assert_eq!(typed("000").resolve(), Ok(None));
    }

    #[test]
    fn key_names_parse() {
        assert_eq!(EditKey::parse("7"), Some(EditKey::Digit(7)));
        assert_eq!(EditKey::parse("Enter"), Some(EditKey::Enter));
        assert_eq!(EditKey::parse("a"), None);
        assert_eq!(EditKey::parse("12"), None);
    }
}
