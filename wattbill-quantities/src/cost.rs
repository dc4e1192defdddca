use std::fmt::{Debug, Display, Formatter};

use crate::Quantity;

/// US dollars.
pub type Cost = Quantity<0, 0, 1>;

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.4}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_total() {
        let total: Cost = [0.205, 25.815, 32.44].into_iter().map(Cost::from).sum();
        assert_abs_diff_eq!(total.get(), 58.46, epsilon = 1e-9);
        assert_eq!(total.to_string(), "$58.46");
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::from(32.44).to_string(), "$32.44");
        assert_eq!(format!("{:?}", Cost::from(25.815)), "$25.8150");
    }
}
