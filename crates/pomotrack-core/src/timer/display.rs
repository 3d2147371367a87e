//! Text renderings of durations and counters.

/// `HH:MM:SS` once an hour or more remains, `MM:SS` otherwise.
pub fn format_clock(secs: u64) -> String {
    let (h, m, s) = split_hms(secs);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Always `HH:MM:SS`.
pub fn format_hms(secs: u64) -> String {
    let (h, m, s) = split_hms(secs);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Time spent on a project: `2h 5m`, `12m`, or `<1m`.
pub fn format_accumulated(secs: u64) -> String {
    let (h, m, _) = split_hms(secs);
    if h > 0 {
        format!("{h}h {m}m")
    } else if m > 0 {
        format!("{m}m")
    } else {
        "<1m".to_string()
    }
}

pub fn format_session(count: u32) -> String {
    format!("#{count}")
}

fn split_hms(secs: u64) -> (u64, u64, u64) {
    (secs / 3600, (secs % 3600) / 60, secs % 60)
}
