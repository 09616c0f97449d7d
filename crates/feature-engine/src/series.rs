//! Length-preserving rolling primitives.
//!
//! Every function returns one value per input element. Where a full window
//! is not yet available the computation falls back to the longest window
//! that is, so early elements are degraded-accuracy rather than missing.
//! Degenerate cases (zero denominator, too few points for a moment) yield
//! 0.0 by explicit guard, never NaN.

/// Rolling arithmetic mean over at most `period` trailing values.
pub fn rolling_mean(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(period.max(1));
        let window = &data[start..=i];
        out.push(window.iter().sum::<f64>() / window.len() as f64);
    }
    out
}

/// Rolling sample standard deviation (ddof = 1). Windows of one value
/// have no spread and yield 0.0.
pub fn rolling_std(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(period.max(1));
        let window = &data[start..=i];
        out.push(sample_std(window));
    }
    out
}

fn sample_std(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 2 {
        return 0.0;
    }
    let mean = window.iter().sum::<f64>() / n as f64;
    let var = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Population standard deviation over a whole slice.
pub fn population_std(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    var.sqrt()
}

pub fn rolling_max(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(period.max(1));
        out.push(data[start..=i].iter().copied().fold(f64::NEG_INFINITY, f64::max));
    }
    out
}

pub fn rolling_min(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(period.max(1));
        out.push(data[start..=i].iter().copied().fold(f64::INFINITY, f64::min));
    }
    out
}

/// Exponential moving average, `adjust = false` recurrence seeded with the
/// first value: y0 = x0, yt = alpha * xt + (1 - alpha) * y(t-1). This is the
/// form the frozen model was trained against.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if data.is_empty() {
        return vec![];
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(data.len());
    out.push(data[0]);
    for i in 1..data.len() {
        out.push(alpha * data[i] + (1.0 - alpha) * out[i - 1]);
    }
    out
}

/// k-lag difference: out[i] = data[i] - data[i-k]; 0.0 where no lag exists.
pub fn diff(data: &[f64], k: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        if i >= k && k > 0 {
            out.push(data[i] - data[i - k]);
        } else {
            out.push(0.0);
        }
    }
    out
}

/// k-lag fractional change, guarded against a zero base.
pub fn pct_change(data: &[f64], k: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        if i >= k && k > 0 && data[i - k] != 0.0 {
            out.push((data[i] - data[i - k]) / data[i - k]);
        } else {
            out.push(0.0);
        }
    }
    out
}

/// Rolling Pearson correlation of two equal-length series. Windows where
/// either side has zero variance yield 0.0.
pub fn rolling_corr(a: &[f64], b: &[f64], period: usize) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len().min(b.len());
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let start = (i + 1).saturating_sub(period.max(1));
        out.push(pearson(&a[start..=i], &b[start..=i]));
    }
    out
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }
    let mx = x.iter().sum::<f64>() / n as f64;
    let my = y.iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx <= 0.0 || vy <= 0.0 {
        return 0.0;
    }
    cov / (vx.sqrt() * vy.sqrt())
}

/// Rolling sample-adjusted skewness (the pandas formula). Windows with
/// fewer than three points or zero spread yield 0.0.
pub fn rolling_skew(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(period.max(1));
        out.push(sample_skew(&data[start..=i]));
    }
    out
}

fn sample_skew(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 3 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = window.iter().sum::<f64>() / nf;
    let m2 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / nf;
    let m3 = window.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / nf;
    if m2 <= 0.0 {
        return 0.0;
    }
    let g1 = m3 / m2.powf(1.5);
    (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1
}

/// Rolling sample excess kurtosis (the pandas formula). Windows with fewer
/// than four points or zero spread yield 0.0.
pub fn rolling_kurt(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(period.max(1));
        out.push(sample_kurt(&data[start..=i]));
    }
    out
}

fn sample_kurt(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 4 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = window.iter().sum::<f64>() / nf;
    let s2 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (nf - 1.0);
    if s2 <= 0.0 {
        return 0.0;
    }
    let m4 = window.iter().map(|x| (x - mean).powi(4)).sum::<f64>();
    let a = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0));
    let b = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    a * m4 / s2.powi(2) - b
}

/// -1.0 / 0.0 / 1.0 by sign.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Slope of the least-squares line through (x, y) pairs; 0.0 when the x
/// values have no spread.
pub fn least_squares_slope(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mx = x[..n].iter().sum::<f64>() / nf;
    let my = y[..n].iter().sum::<f64>() / nf;
    let mut num = 0.0;
    let mut den = 0.0;
    for i in 0..n {
        num += (x[i] - mx) * (y[i] - my);
        den += (x[i] - mx).powi(2);
    }
    if den <= 0.0 {
        return 0.0;
    }
    num / den
}
