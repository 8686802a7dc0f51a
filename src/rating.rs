#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Filled,
    Empty,
}

/// Five stars for a 0–10 provider score. A trailing half point renders empty.
pub fn star_rating(value: f64) -> [Star; 5] {
    let score = if value.is_nan() { 0.0 } else { value.clamp(0.0, 10.0) };
    let filled = (score / 2.0).floor() as usize;
    std::array::from_fn(|i| if i < filled { Star::Filled } else { Star::Empty })
}

#[cfg(test)]
mod tests {
    use super::*;
    use Star::{Empty, Filled};

    #[test]
    fn floors_half_points() {
        assert_eq!(star_rating(7.9), [Filled, Filled, Filled, Empty, Empty]);
        assert_eq!(star_rating(8.0), [Filled, Filled, Filled, Filled, Empty]);
        assert_eq!(star_rating(1.9), [Empty; 5]);
    }

    #[test]
    fn clamps_out_of_range_scores() {
        assert_eq!(star_rating(10.0), [Filled; 5]);
        assert_eq!(star_rating(42.0), [Filled; 5]);
        assert_eq!(star_rating(-3.0), [Empty; 5]);
        assert_eq!(star_rating(f64::NAN), [Empty; 5]);
    }
}
