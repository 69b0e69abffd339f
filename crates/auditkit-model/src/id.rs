//! Document id generation
//!
//! Stored documents carry string ids of the form `template_<millis>` /
//! `audit_<millis>`. The wall clock alone is not unique under rapid
//! allocation, so a process-local monotonic guard bumps the counter past
//! the last issued value.

use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ISSUED_MS: AtomicI64 = AtomicI64::new(0);

/// Next unique millisecond counter value.
///
/// Returns the current UTC epoch-millis, bumped forward when the clock has
/// not advanced since the previous call.
fn next_millis() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut prev = LAST_ISSUED_MS.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_ISSUED_MS.compare_exchange(prev, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}

/// Generate a new template document id.
#[inline]
#[must_use]
pub fn template_id() -> String {
    format!("template_{}", next_millis())
}

/// Generate a new audit document id.
#[inline]
#[must_use]
pub fn audit_id() -> String {
    format!("audit_{}", next_millis())
}

/// Generate a new stage id (used when migrating legacy sections).
#[inline]
#[must_use]
pub fn stage_id() -> String {
    format!("stage_{}", next_millis())
}
