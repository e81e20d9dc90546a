use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. {
            None
        } else {
            Some(Percentage(value))
        }
    }

    /// Share of `part` in `whole`. An empty whole counts as 0%.
    pub fn of(part: usize, whole: usize) -> Percentage {
        if whole == 0 {
            return Percentage(0.);
        }
        Percentage(part as f64 / whole as f64 * 100.)
    }

    pub fn rounded(self) -> u8 {
        self.0.round().clamp(0., 100.) as u8
    }

    /// Progress bar of `width` cells.
    pub fn bar(self, width: usize) -> String {
        let filled = ((self.0 / 100.).clamp(0., 1.) * width as f64).round() as usize;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Percentage;

    #[test]
    fn test_percentage_empty_whole() {
        assert_eq!(Percentage::of(0, 0).rounded(), 0);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(Percentage::of(1, 3).rounded(), 33);
        assert_eq!(Percentage::of(2, 3).rounded(), 67);
        assert_eq!(Percentage::of(3, 3).rounded(), 100);
    }

    #[test]
    fn test_percentage_bar() {
        assert_eq!(Percentage::of(1, 2).bar(10), "[#####-----]");
        assert_eq!(Percentage::of(0, 2).bar(4), "[----]");
    }
}
