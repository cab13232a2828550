//! Shortest-digit selector: strips decimal digits from the scaled interval
//! until exactly the shortest representation remains, then assembles the
//! final `(mantissa, exponent)` pair.
//!
//! The narrowing is an explicit state machine over `{lower, target, upper,
//! removed}`. Stripping stops at the first digit count where the interval
//! still separates, i.e. `upper / 10 <= lower / 10` would merge the bounds.
//! Two drive paths exist: the exact path keeps enough bookkeeping to decide
//! closed-endpoint acceptance and halfway ties on the last digit, and the
//! fast path (taken when no endpoint can be exact) only remembers whether
//! the last removed digit rounds up. Both decrement the decimal exponent
//! once per stripped digit and produce identical results wherever their
//! domains overlap.

use crate::Decimal64;
use crate::boundary::ScaledInterval;
use crate::wide::WideArith;

#[derive(Debug)]
pub(crate) struct Narrowing {
    lower: u64,
    target: u64,
    upper: u64,
    removed: i32,
    last_removed_digit: u8,
    lower_exact: bool,
    target_exact: bool,
}

impl Narrowing {
    pub(crate) fn new(iv: &ScaledInterval) -> Self {
        Self {
            lower: iv.lower,
            target: iv.target,
            upper: iv.upper,
            removed: 0,
            last_removed_digit: 0,
            lower_exact: iv.lower_exact,
            target_exact: iv.target_exact,
        }
    }

    /// The interval still separates after one more strip: some integer lies
    /// strictly between the shrunk bounds (or on an acceptable endpoint).
    fn can_strip<W: WideArith>(&self) -> bool {
        W::div10(self.upper) > W::div10(self.lower)
    }

    /// One transition of the exact path: strip a digit from all three values
    /// while tracking whether the discarded tails stay all-zero.
    fn strip_one_exact<W: WideArith>(&mut self) {
        let lower_div10 = W::div10(self.lower);
        let target_div10 = W::div10(self.target);
        self.lower_exact &= self.lower - 10 * lower_div10 == 0;
        self.target_exact &= self.last_removed_digit == 0;
        self.last_removed_digit = (self.target - 10 * target_div10) as u8;
        self.lower = lower_div10;
        self.target = target_div10;
        self.upper = W::div10(self.upper);
        self.removed += 1;
    }

    /// Exact drive: strip until the terminal condition, then keep stripping
    /// while the lower bound itself sheds trailing zeros, so a closed lower
    /// endpoint can be recognized at the final digit count.
    fn run_exact<W: WideArith>(&mut self) {
        while self.can_strip::<W>() {
            self.strip_one_exact::<W>();
        }
        if self.lower_exact {
            loop {
                let lower_div10 = W::div10(self.lower);
                if self.lower - 10 * lower_div10 != 0 {
                    break;
                }
                self.target_exact &= self.last_removed_digit == 0;
                self.last_removed_digit = (self.target - 10 * W::div10(self.target)) as u8;
                self.lower = lower_div10;
                self.target = W::div10(self.target);
                self.upper = W::div10(self.upper);
                self.removed += 1;
            }
        }
    }

    /// Selection for the exact path. The last-digit fix-up: when the
    /// remaining tail of the target is exactly `5 000...`, the truncated
    /// value sits halfway between two candidates and the tie goes to the
    /// even one.
    fn select_exact(&mut self, closed: bool) -> u64 {
        if self.target_exact && self.last_removed_digit == 5 && self.target % 2 == 0 {
            self.last_removed_digit = 4;
        }
        let on_rejected_lower =
            self.target == self.lower && (!closed || !self.lower_exact);
        self.target + u64::from(on_rejected_lower || self.last_removed_digit >= 5)
    }

    /// Fast drive: no endpoint can be exact, so only the round-up bit of the
    /// target's discarded tail matters. Strips two digits at a time while
    /// that is known to preserve separation.
    fn run_fast<W: WideArith>(&mut self) -> bool {
        let mut round_up = false;
        let upper_div100 = W::div100(self.upper);
        let lower_div100 = W::div100(self.lower);
        if upper_div100 > lower_div100 {
            let target_div100 = W::div100(self.target);
            round_up = self.target - 100 * target_div100 >= 50;
            self.lower = lower_div100;
            self.target = target_div100;
            self.upper = upper_div100;
            self.removed += 2;
        }
        while self.can_strip::<W>() {
            let target_div10 = W::div10(self.target);
            round_up = self.target - 10 * target_div10 >= 5;
            self.lower = W::div10(self.lower);
            self.target = target_div10;
            self.upper = W::div10(self.upper);
            self.removed += 1;
        }
        round_up
    }

    fn select_fast(&self, round_up: bool) -> u64 {
        self.target + u64::from(self.target == self.lower || round_up)
    }

    pub(crate) fn removed(&self) -> i32 {
        self.removed
    }
}

pub(crate) fn shortest<W: WideArith>(iv: ScaledInterval) -> Decimal64 {
    let mut narrowing = Narrowing::new(&iv);
    let mantissa = if iv.lower_exact || iv.target_exact {
        // rare: an endpoint or the target is exact at this scale (~0.7% of
        // inputs), so acceptance and ties need the full bookkeeping
        narrowing.run_exact::<W>();
        narrowing.select_exact(iv.closed)
    } else {
        let round_up = narrowing.run_fast::<W>();
        narrowing.select_fast(round_up)
    };
    assemble::<W>(mantissa, iv.exponent10 + narrowing.removed())
}

/// Final packaging. The selector never emits a removable trailing zero; the
/// trim below is a defensive pass kept for the invariant's sake.
fn assemble<W: WideArith>(mut mantissa: u64, mut exponent: i32) -> Decimal64 {
    loop {
        let div10 = W::div10(mantissa);
        if mantissa < 10 || mantissa - 10 * div10 != 0 {
            break;
        }
        mantissa = div10;
        exponent += 1;
    }
    Decimal64 { mantissa, exponent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wide::NativeWide;

    fn narrowing(lower: u64, target: u64, upper: u64) -> Narrowing {
        Narrowing {
            lower,
            target,
            upper,
            removed: 0,
            last_removed_digit: 0,
            lower_exact: false,
            target_exact: false,
        }
    }

    #[test]
    fn stopping_rule_keeps_separating_interval() {
        // four digits separate the bounds, three do not: stop at four
        let mut n = narrowing(123_449, 123_500, 123_551);
        let round_up = n.run_fast::<NativeWide>();
        assert_eq!(n.removed, 2);
        assert_eq!((n.lower, n.target, n.upper), (1234, 1235, 1235));
        assert!(!round_up);
        assert_eq!(n.select_fast(round_up), 1235);
    }

    #[test]
    fn fast_path_two_digit_strip_matches_single_steps() {
        let mut two = narrowing(999_944, 1_000_000, 1_000_111);
        let round_up_two = two.run_fast::<NativeWide>();

        let mut one = narrowing(999_944, 1_000_000, 1_000_111);
        let mut round_up_one = false;
        while one.can_strip::<NativeWide>() {
            let div10 = one.target / 10;
            round_up_one = one.target - 10 * div10 >= 5;
            one.lower /= 10;
            one.target = div10;
            one.upper /= 10;
            one.removed += 1;
        }
        assert_eq!(two.removed, one.removed);
        assert_eq!(two.target, one.target);
        assert_eq!(round_up_two, round_up_one);
    }

    #[test]
    fn target_on_rejected_lower_bound_bumps_up() {
        // target collapses onto an open lower bound: must step off it
        let mut n = narrowing(120_000, 120_004, 129_999);
        let round_up = n.run_fast::<NativeWide>();
        assert_eq!((n.lower, n.target), (120, 120));
        assert!(!round_up);
        assert_eq!(n.select_fast(round_up), 121);
    }

    #[test]
    fn exact_path_accepts_closed_lower_bound() {
        // an exact closed lower endpoint is itself the shortest answer
        let mut n = narrowing(500_000, 500_004, 500_009);
        n.lower_exact = true;
        n.run_exact::<NativeWide>();
        assert_eq!(n.target, 5);
        assert!(n.lower_exact);
        assert_eq!(n.select_exact(true), 5);
    }

    #[test]
    fn exact_tie_rounds_to_even() {
        // discarded tail is exactly 5 with an even target: stay (round down)
        let mut n = narrowing(123, 250, 378);
        n.target_exact = true;
        n.run_exact::<NativeWide>();
        assert_eq!(n.target, 2);
        assert_eq!(n.last_removed_digit, 5);
        assert!(n.target_exact);
        assert_eq!(n.select_exact(true), 2);

        // odd target: the tie moves up to the even neighbor
        let mut n = narrowing(223, 350, 478);
        n.target_exact = true;
        n.run_exact::<NativeWide>();
        assert_eq!(n.target, 3);
        assert_eq!(n.select_exact(true), 4);
    }

    #[test]
    fn inexact_tail_above_half_rounds_up() {
        // tail 5...nonzero is strictly above half: round up despite even target
        let mut n = narrowing(123, 251, 378);
        n.target_exact = true;
        n.run_exact::<NativeWide>();
        assert_eq!(n.last_removed_digit, 5);
        assert!(!n.target_exact);
        assert_eq!(n.select_exact(true), 3);
    }

    #[test]
    fn assembler_trims_trailing_zeros() {
        assert_eq!(
            assemble::<NativeWide>(500, -2),
            Decimal64 {
                mantissa: 5,
                exponent: 0
            }
        );
        assert_eq!(
            assemble::<NativeWide>(7, 3),
            Decimal64 {
                mantissa: 7,
                exponent: 3
            }
        );
        assert_eq!(
            assemble::<NativeWide>(0, 0),
            Decimal64 {
                mantissa: 0,
                exponent: 0
            }
        );
    }
}
