//! Opt-in debug log for broadcast calls.
//!
//! Compiled in only with the `trace` cargo feature in debug builds. Even then
//! nothing is written unless the [`ENV_VAR`] environment variable is set when
//! the first broadcast runs. Output goes to stderr, one line per event: the
//! call plan on entry, then each lane index before its call.

use std::fmt;

/// Environment variable that turns the log on.
pub const ENV_VAR: &str = "INVOKE_FORALL_TRACE";

/// Whether broadcast tracing is active for this process.
///
/// Read once; later changes to the environment are ignored.
#[cfg(all(feature = "trace", debug_assertions))]
pub fn enabled() -> bool {
    use std::sync::OnceLock;
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var(ENV_VAR).is_ok())
}

/// Whether broadcast tracing is active for this process.
///
/// Always `false` without the `trace` feature or in release builds.
#[cfg(not(all(feature = "trace", debug_assertions)))]
#[inline(always)]
pub fn enabled() -> bool {
    false
}

/// Emit one trace line without relying on `eprintln!`.
pub(crate) fn log(args: fmt::Arguments<'_>) {
    if enabled() {
        use std::io::Write;
        let _ = writeln!(std::io::stderr(), "invoke_forall: {args}");
    }
}

/// Announce the call about to be made for lane `index` of `count`.
#[inline]
pub(crate) fn lane(index: usize, count: usize) {
    if enabled() {
        log(format_args!("lane {index}/{count}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        assert_eq!(ENV_VAR, "INVOKE_FORALL_TRACE");
    }

    #[cfg(not(all(feature = "trace", debug_assertions)))]
    #[test]
    fn test_disabled_without_feature() {
        assert!(!enabled());
        // No-ops must not panic even with the variable unset.
        lane(0, 3);
        log(format_args!("ignored"));
    }

    #[test]
    fn test_enabled_is_stable() {
        assert_eq!(enabled(), enabled());
    }
}
