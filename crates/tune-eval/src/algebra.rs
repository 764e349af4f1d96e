//! Tune algebra: the musical meaning of the generic operators.
//!
//! All functions build a new [`Tune`]; the input is never modified.
//! Integer overflow while scaling durations is fatal, like integer
//! overflow anywhere else in the evaluator.

use tune_types::{Note, Tune};

use crate::error::{EvalError, EvalResult};

/// Abort on integer overflow. Overflow is not a recoverable evaluation error.
pub(crate) fn overflow(op: &str) -> ! {
    panic!("integer overflow in {op}")
}

/// Most notes a tune can hold before its storage size overflows.
const MAX_NOTES: usize = isize::MAX as usize / std::mem::size_of::<Note>();

/// Shift every pitch by `half_steps` around the chromatic cycle.
pub fn transpose(tune: &Tune, half_steps: i64) -> Tune {
    tune.notes()
        .iter()
        .map(|n| Note::new(n.pitch.transpose(half_steps), n.duration))
        .collect()
}

/// Multiply every duration by `factor`, which must be positive.
pub fn stretch(tune: &Tune, factor: i64) -> EvalResult<Tune> {
    let factor = positive_modifier(factor)?;
    Ok(tune
        .notes()
        .iter()
        .map(|n| {
            let duration = u64::from(n.duration)
                .checked_mul(factor)
                .and_then(|d| u32::try_from(d).ok())
                .unwrap_or_else(|| overflow("duration scaling"));
            Note::new(n.pitch, duration)
        })
        .collect())
}

/// Floor-divide every duration by `divisor`, which must be positive.
/// A duration that would reach zero becomes one.
pub fn compress(tune: &Tune, divisor: i64) -> EvalResult<Tune> {
    let divisor = positive_modifier(divisor)?;
    Ok(tune
        .notes()
        .iter()
        .map(|n| {
            let duration = u32::try_from(u64::from(n.duration) / divisor).unwrap_or(n.duration);
            Note::new(n.pitch, duration.max(1))
        })
        .collect())
}

fn positive_modifier(n: i64) -> EvalResult<u64> {
    if n <= 0 {
        return Err(EvalError::NonPositiveModifier { got: n });
    }
    Ok(n.unsigned_abs())
}

pub fn join(left: &Tune, right: &Tune) -> Tune {
    left.notes()
        .iter()
        .chain(right.notes())
        .copied()
        .collect()
}

/// The notes of `tune`, `count` times over. A count of zero or less gives
/// the empty tune.
pub fn repeat(tune: &Tune, count: i64) -> Tune {
    let Ok(count) = usize::try_from(count) else {
        return Tune::empty();
    };
    let total = tune
        .len()
        .checked_mul(count)
        .filter(|&n| n <= MAX_NOTES)
        .unwrap_or_else(|| overflow("repeat"));
    if total == 0 {
        return Tune::empty();
    }
    Tune::new(tune.notes().repeat(count))
}

pub fn reverse(tune: &Tune) -> Tune {
    tune.notes().iter().rev().copied().collect()
}

/// Half-open slice `[start, end)`. Negative bounds count from the end;
/// bounds are clamped to the tune, and inverted bounds give the empty tune.
pub fn slice(tune: &Tune, start: i64, end: i64) -> Tune {
    let len = tune.len();
    let start = clamp_index(start, len);
    let end = clamp_index(end, len);
    if start >= end {
        return Tune::empty();
    }
    Tune::new(tune.notes()[start..end].to_vec())
}

fn clamp_index(index: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if index < 0 {
        index.saturating_add(len_i).max(0)
    } else {
        index.min(len_i)
    };
    usize::try_from(resolved).unwrap_or(0)
}
