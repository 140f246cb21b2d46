//! High-Precision Timing
//!
//! Wall-clock time comes from `std::time::Instant`. Alongside it we read the
//! CPU cycle counter (RDTSCP on x86_64, CNTVCT_EL0 on AArch64) so a lap can
//! report cycles as well as nanoseconds.

use std::time::{Duration, Instant};

/// Read the CPU cycle/tick counter (platform-specific).
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on all x86_64 CPUs since ~2006 and waits
    // for prior instructions to retire before reading the counter.
    unsafe {
        let mut _aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut _aux)
    }
}

/// Read the virtual counter timer on AArch64 (comparable to x86 TSC).
#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides real cycle counters.
///
/// When `false`, every lap reports 0 cycles and only wall-clock time is useful.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// Timer for a single lap
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
    cycles_start: u64,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        let cycles_start = read_cycles();
        Self {
            start: Instant::now(),
            cycles_start,
        }
    }

    /// Elapsed wall-clock time and cycles since `start`
    #[inline(always)]
    pub fn stop(&self) -> (Duration, u64) {
        let elapsed = self.start.elapsed();
        let cycles = read_cycles().saturating_sub(self.cycles_start);
        (elapsed, cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let (elapsed, _cycles) = timer.stop();

        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_timer_stop_is_repeatable() {
        let timer = Timer::start();
        let (first, _) = timer.stop();
        let (second, _) = timer.stop();
        assert!(second >= first);
    }

    #[test]
    fn test_cycle_counter() {
        if HAS_CYCLE_COUNTER {
            let a = read_cycles();
            let b = read_cycles();
            assert!(b >= a, "cycle counter should be monotonic");
        }
    }
}
