use std::fmt::Debug;

/// Point visited by an iterative solver (1-D or 2-D)
pub trait Point: Copy + PartialEq + Debug {
    /// Returns `self - step * direction`
    fn descend(&self, direction: &Self, step: f64) -> Self;

    /// Returns true if every coordinate is finite
    fn is_finite(&self) -> bool;

    /// Returns the coordinates as a slice
    fn coords(&self) -> &[f64];
}

impl Point for f64 {
    fn descend(&self, direction: &Self, step: f64) -> Self {
        self - step * direction
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    fn coords(&self) -> &[f64] {
        std::slice::from_ref(self)
    }
}

impl Point for [f64; 2] {
    fn descend(&self, direction: &Self, step: f64) -> Self {
        [self[0] - step * direction[0], self[1] - step * direction[1]]
    }

    fn is_finite(&self) -> bool {
        self[0].is_finite() && self[1].is_finite()
    }

    fn coords(&self) -> &[f64] {
        self.as_slice()
    }
}

/// Formats a point for messages and iterate tables
pub fn format_point<P: Point>(p: &P) -> String {
    let parts: Vec<String> = p.coords().iter().map(|v| format!("{:.4}", v)).collect();
    if parts.len() == 1 {
        parts[0].clone()
    } else {
        format!("({})", parts.join(", "))
    }
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
