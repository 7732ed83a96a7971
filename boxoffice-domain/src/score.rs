/// Desirability scores for every seat position in a row of the given width.
///
/// Seats in the middle of the row score higher than those at the ends, and
/// scores fall off monotonically toward both sides. Scores are computed in
/// `f32` and rounded to two decimals so the same venue always produces the
/// same seat ranking.
pub fn seat_scores(width: usize) -> Vec<f32> {
    let mut scores = Vec::with_capacity(width);

    for index in 0..width {
        let mut mid = width / 2;

        // one- and two-seat rows would otherwise hit a zero divisor
        if width >= 1 && width <= 2 {
            mid += 1;
        }

        let score = if width % 2 == 0 {
            if index < mid {
                (index as f32 + 1.0) * (10.0 / (mid as f32 - 1.0))
            } else {
                (width - index) as f32 * (10.0 / (mid as f32 - 1.0))
            }
        } else if index <= mid {
            (index as f32 + 1.0) * (10.0 / mid as f32)
        } else {
            (width - index) as f32 * (10.0 / mid as f32)
        };

        scores.push(round2(score));
    }

    scores
}

/// Round to two decimal places.
fn round2(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}
