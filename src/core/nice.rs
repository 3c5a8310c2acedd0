//! Nice-number rounding and tick generation.
//!
//! Steps are always 1, 2 or 5 times a power of ten. Sub-unit steps are
//! carried as their inverse (`10` for `0.1`) so that bounds like `0.3` come
//! out exact instead of `0.30000000000000004`.

/// Target tick count used when a scale is niced without an explicit count.
pub const DEFAULT_TICK_COUNT: usize = 10;

const MAX_NICE_ITERATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Increment {
    /// Step of `value` domain units, `value >= 1`.
    Step(f64),
    /// Step of `1 / value` domain units, `value > 1`.
    Inverse(f64),
}

fn step_factor(error: f64) -> f64 {
    if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    }
}

fn tick_increment(start: f64, stop: f64, count: usize) -> Option<Increment> {
    if count == 0 || !start.is_finite() || !stop.is_finite() || stop <= start {
        return None;
    }
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = step_factor(error);
    if power >= 0.0 {
        Some(Increment::Step(factor * 10f64.powf(power)))
    } else {
        Some(Increment::Inverse(10f64.powf(-power) / factor))
    }
}

/// Extends `[start, stop]` outward to multiples of the tick step for about
/// `count` ticks. Returns the input unchanged when no step can be derived.
#[must_use]
pub fn nice_extent(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let (mut lo, mut hi) = (start, stop);
    let mut previous: Option<Increment> = None;

    for _ in 0..MAX_NICE_ITERATIONS {
        let Some(increment) = tick_increment(lo, hi, count) else {
            break;
        };
        if previous == Some(increment) {
            break;
        }
        match increment {
            Increment::Step(step) => {
                lo = (lo / step).floor() * step;
                hi = (hi / step).ceil() * step;
            }
            Increment::Inverse(inverse) => {
                lo = (lo * inverse).floor() / inverse;
                hi = (hi * inverse).ceil() / inverse;
            }
        }
        previous = Some(increment);
    }

    (lo, hi)
}

/// Rounds a single positive bound up to a nice number, keeping zero as the
/// lower bound.
#[must_use]
pub fn nice_upper_bound(max: f64, count: usize) -> f64 {
    nice_extent(0.0, max, count).1
}

/// Evenly spaced round values inside `[start, stop]`, about `count` of them.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi, reversed) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };

    let Some(increment) = tick_increment(lo, hi, count) else {
        return Vec::new();
    };

    let mut out: Vec<f64> = match increment {
        Increment::Step(step) => {
            let mut first = (lo / step).round();
            let mut last = (hi / step).round();
            if first * step < lo {
                first += 1.0;
            }
            if last * step > hi {
                last -= 1.0;
            }
            index_span(first, last).map(|i| i * step).collect()
        }
        Increment::Inverse(inverse) => {
            let mut first = (lo * inverse).round();
            let mut last = (hi * inverse).round();
            if first / inverse < lo {
                first += 1.0;
            }
            if last / inverse > hi {
                last -= 1.0;
            }
            index_span(first, last).map(|i| i / inverse).collect()
        }
    };

    if reversed {
        out.reverse();
    }
    out
}

fn index_span(first: f64, last: f64) -> impl Iterator<Item = f64> {
    let steps = if last >= first {
        (last - first) as usize + 1
    } else {
        0
    };
    (0..steps).map(move |offset| first + offset as f64)
}
