use time::OffsetDateTime;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Weight applied to documents older than the recency window.
pub const RECENCY_FLOOR: f32 = 0.2;

const WINDOW_EPSILON: f64 = 1e-6;

/// Decay weight in `[RECENCY_FLOOR, 1.0]` for a document last modified at `mtime`.
///
/// `now` and `mtime` are seconds since the Unix epoch. Callers sample `now` once per request so
/// every candidate is weighed against the same instant. Timestamps in the future count as fresh.
pub fn recency_weight(mtime: f64, max_age_days: Option<u32>, now: f64) -> f32 {
	let Some(max_age_days) = max_age_days else {
		return 1.0;
	};
	let age_days = (now - mtime) / SECONDS_PER_DAY;

	if age_days.is_nan() || age_days < 0.0 {
		return 1.0;
	}

	let window = f64::from(max_age_days);

	if age_days > window {
		return RECENCY_FLOOR;
	}

	let decay = f64::from(1.0 - RECENCY_FLOOR);

	(1.0 - (age_days / (window + WINDOW_EPSILON)) * decay) as f32
}

pub fn unix_seconds(ts: OffsetDateTime) -> f64 {
	ts.unix_timestamp_nanos() as f64 / 1e9
}
