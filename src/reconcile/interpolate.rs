/// Fill interior nulls by straight-line interpolation between the nearest
/// known neighbours, spacing by row position. Leading and trailing nulls are
/// left alone.
pub fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut prev: Option<(usize, f64)> = None;
    for i in 0..values.len() {
        let Some(v) = values[i] else { continue };
        if let Some((j, pv)) = prev {
            let span = (i - j) as f64;
            for (k, slot) in values.iter_mut().enumerate().take(i).skip(j + 1) {
                *slot = Some(pv + (v - pv) * (k - j) as f64 / span);
            }
        }
        prev = Some((i, v));
    }
}

/// Carry the last known value forward over nulls.
pub fn forward_fill(values: &mut [Option<f64>]) {
    let mut last = None;
    for slot in values.iter_mut() {
        match slot {
            Some(v) => last = Some(*v),
            None => *slot = last,
        }
    }
}

/// Linear interpolation, then forward fill for whatever is left at the end.
/// Nulls before the first observation stay null.
pub fn fill_gaps(values: &mut [Option<f64>]) {
    interpolate_linear(values);
    forward_fill(values);
}
