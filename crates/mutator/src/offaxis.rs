//! Residual corrections for masters that move more than one axis.
//!
//! An off-axis master records what the design space looks like where several
//! axes interact. The on-axis models already predict a value there; the
//! correction stores the leftover (the residual) together with a weighting
//! tent per nonzero axis. A correction's weight at a query is the product of
//! its tents, so it peaks at 1 on its own master and fades toward the origin
//! and toward neighboring masters on the same axis combination.

use blendspace_location::{Component, Location};

use crate::value::Interpolable;

/// What bounds a tent on one side of its peak.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Shoulder {
    /// No support point on this side: the nearest edge extends linearly.
    Open,
    /// The origin bounds this side; past it the edge keeps extending, so
    /// queries beyond zero weigh negative, matching on-axis extrapolation.
    Origin,
    /// A neighboring master's peak bounds this side; the weight is zero at
    /// the neighbor and beyond it.
    Peak(f64),
}

/// A piecewise-linear bump on one axis: 0 at the support edges, 1 at the
/// peak, linear in between, extrapolating on open and origin sides.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tent {
    peak: f64,
    below: Shoulder,
    above: Shoulder,
}

impl Tent {
    /// Build the tent peaking at `peak` given the coordinates of the other
    /// masters sharing the axis combination on this axis.
    pub(crate) fn new(peak: f64, peers: &[f64]) -> Tent {
        let mut support: Vec<f64> = peers.iter().copied().filter(|&p| p != peak).collect();
        support.push(0.0);
        let below = support
            .iter()
            .copied()
            .filter(|&s| s < peak)
            .fold(None::<f64>, |acc, s| Some(acc.map_or(s, |a| a.max(s))));
        let above = support
            .iter()
            .copied()
            .filter(|&s| s > peak)
            .fold(None::<f64>, |acc, s| Some(acc.map_or(s, |a| a.min(s))));
        let shoulder = |bound: Option<f64>| match bound {
            None => Shoulder::Open,
            Some(s) if s == 0.0 => Shoulder::Origin,
            Some(s) => Shoulder::Peak(s),
        };
        Tent {
            peak,
            below: shoulder(below),
            above: shoulder(above),
        }
    }

    fn rising(&self, anchor: f64, x: f64) -> f64 {
        (x - anchor) / (self.peak - anchor)
    }

    /// The weight of this tent at coordinate `x`.
    pub(crate) fn factor(&self, x: f64) -> f64 {
        if x == self.peak {
            return 1.0;
        }
        if x < self.peak {
            match self.below {
                Shoulder::Peak(b) if x <= b => 0.0,
                Shoulder::Peak(b) => self.rising(b, x),
                Shoulder::Origin => self.rising(0.0, x),
                // open below means the peak is negative; mirror the edge
                // anchored on the above shoulder
                Shoulder::Open => match self.above {
                    Shoulder::Peak(a) => self.rising(a, x),
                    _ => self.rising(0.0, x),
                },
            }
        } else {
            match self.above {
                Shoulder::Peak(a) if x >= a => 0.0,
                Shoulder::Peak(a) => self.rising(a, x),
                Shoulder::Origin => self.rising(0.0, x),
                Shoulder::Open => match self.below {
                    Shoulder::Peak(b) => self.rising(b, x),
                    _ => self.rising(0.0, x),
                },
            }
        }
    }
}

/// One axis of an off-axis master: the axis name plus the tent for each
/// coordinate component.
#[derive(Debug, Clone)]
pub(crate) struct TentAxis {
    pub(crate) name: String,
    horizontal: Tent,
    vertical: Tent,
}

impl TentAxis {
    pub(crate) fn new(name: String, horizontal: Tent, vertical: Tent) -> Self {
        TentAxis { name, horizontal, vertical }
    }

    fn tent(&self, component: Component) -> &Tent {
        match component {
            Component::Horizontal => &self.horizontal,
            Component::Vertical => &self.vertical,
        }
    }
}

/// The precomputed correction for one off-axis master.
#[derive(Debug, Clone)]
pub(crate) struct Correction<V> {
    axes: Vec<TentAxis>,
    pub(crate) residual: V,
}

impl<V: Interpolable> Correction<V> {
    pub(crate) fn new(axes: Vec<TentAxis>, residual: V) -> Self {
        Correction { axes, residual }
    }

    /// The weight of this correction at an all-scalar query location for one
    /// evaluation pass. Axes outside this correction's combination do not
    /// participate; a query at zero on any combination axis weighs nothing.
    pub(crate) fn weight(&self, location: &Location, component: Component) -> f64 {
        let mut weight = 1.0;
        for axis in &self.axes {
            let x = location.coordinate(&axis.name).component(component);
            weight *= axis.tent(component).factor(x);
            if weight == 0.0 {
                return 0.0;
            }
        }
        weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_master_tent_is_the_line_through_origin_and_peak() {
        let tent = Tent::new(1.0, &[]);
        assert_eq!(tent.factor(0.0), 0.0);
        assert_eq!(tent.factor(0.5), 0.5);
        assert_eq!(tent.factor(1.0), 1.0);
        // no neighbor above: the rising edge extends
        assert_eq!(tent.factor(2.0), 2.0);
        // past the origin it extends negative
        assert_eq!(tent.factor(-1.0), -1.0);
    }

    #[test]
    fn neighboring_peaks_clamp_the_tent() {
        let tent = Tent::new(1.0, &[2.0]);
        assert_eq!(tent.factor(1.0), 1.0);
        assert_eq!(tent.factor(1.5), 0.5);
        assert_eq!(tent.factor(2.0), 0.0);
        assert_eq!(tent.factor(3.0), 0.0);

        let upper = Tent::new(2.0, &[1.0]);
        assert_eq!(upper.factor(1.0), 0.0);
        assert_eq!(upper.factor(1.5), 0.5);
        assert_eq!(upper.factor(2.0), 1.0);
        // open above: keeps rising past its own peak
        assert_eq!(upper.factor(3.0), 2.0);
        assert_eq!(upper.factor(0.5), 0.0);
    }

    #[test]
    fn negative_peak_mirrors() {
        let tent = Tent::new(-1.0, &[]);
        assert_eq!(tent.factor(-0.5), 0.5);
        assert_eq!(tent.factor(-1.0), 1.0);
        assert_eq!(tent.factor(-2.0), 2.0);
        assert_eq!(tent.factor(0.0), 0.0);
    }

    #[test]
    fn equal_peer_coordinates_are_ignored() {
        // two masters of one combination can share a coordinate on one axis
        // while differing on another
        let tent = Tent::new(1.0, &[1.0]);
        assert_eq!(tent, Tent::new(1.0, &[]));
    }

    #[test]
    fn correction_weight_is_the_product_of_tents() {
        let axes = vec![
            TentAxis::new("weight".into(), Tent::new(1.0, &[]), Tent::new(1.0, &[])),
            TentAxis::new("width".into(), Tent::new(1.0, &[]), Tent::new(1.0, &[])),
        ];
        let correction = Correction::new(axes, 1.0f64);

        let at = |w: f64, d: f64| {
            let loc = Location::from_pairs([("weight", w), ("width", d)]);
            correction.weight(&loc, Component::Horizontal)
        };
        assert_eq!(at(1.0, 1.0), 1.0);
        assert_eq!(at(0.5, 1.0), 0.5);
        assert_eq!(at(2.0, 2.0), 4.0);
        assert_eq!(at(1.0, 0.0), 0.0);
    }
}
