//! Coordinates in an n-dimensional design space.

use std::{cmp::Ordering, fmt};

use crate::axis_value::{AxisValue, Component};

/// An immutable coordinate in design space: a mapping from axis name to an
/// [`AxisValue`].
///
/// Entries are stored sorted by axis name, so equality, hashing, and ordering
/// are canonical. An axis absent from the mapping is implicitly zero;
/// [`Location::coordinate`] reflects that. Note that implicit zeroes do not
/// take part in equality: `Location::origin()` and a location holding an
/// explicit `weight=0` entry compare unequal (both still classify as the
/// origin). Use [`Location::without_zeroes`] for a normalized comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    entries: Vec<(String, AxisValue)>,
}

impl Location {
    /// The origin: every axis at zero.
    pub fn origin() -> Self {
        Location { entries: Vec::new() }
    }

    /// Build a location from `(axis name, coordinate)` pairs.
    ///
    /// A duplicated axis name keeps the last value, mirroring map
    /// construction.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<AxisValue>,
    {
        let mut location = Location::origin();
        for (name, value) in pairs {
            location.insert(name.into(), value.into());
        }
        location
    }

    /// Return a copy with `name` set to `value`.
    pub fn with(&self, name: impl Into<String>, value: impl Into<AxisValue>) -> Self {
        let mut location = self.clone();
        location.insert(name.into(), value.into());
        location
    }

    fn insert(&mut self, name: String, value: AxisValue) {
        match self.entries.binary_search_by(|(n, _)| n.as_str().cmp(&name)) {
            Ok(i) => self.entries[i].1 = value,
            Err(i) => self.entries.insert(i, (name, value)),
        }
    }

    /// The coordinate stored for `name`, if any.
    pub fn get(&self, name: &str) -> Option<AxisValue> {
        self.entries
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// The coordinate for `name`, implicit zero when absent.
    pub fn coordinate(&self, name: &str) -> AxisValue {
        self.get(name).unwrap_or(AxisValue::ZERO)
    }

    /// Iterate over the stored `(axis name, coordinate)` entries, sorted by
    /// axis name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AxisValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// The stored axis names, sorted.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of stored entries (zero entries included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn combine(&self, other: &Location, op: impl Fn(f64, f64) -> f64) -> Location {
        let mut entries = Vec::with_capacity(self.entries.len() + other.entries.len());
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() || j < other.entries.len() {
            let (name, a, b) = match (self.entries.get(i), other.entries.get(j)) {
                (Some((na, va)), Some((nb, vb))) => match na.cmp(nb) {
                    Ordering::Less => {
                        i += 1;
                        (na.clone(), *va, AxisValue::ZERO)
                    }
                    Ordering::Greater => {
                        j += 1;
                        (nb.clone(), AxisValue::ZERO, *vb)
                    }
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                        (na.clone(), *va, *vb)
                    }
                },
                (Some((na, va)), None) => {
                    i += 1;
                    (na.clone(), *va, AxisValue::ZERO)
                }
                (None, Some((nb, vb))) => {
                    j += 1;
                    (nb.clone(), AxisValue::ZERO, *vb)
                }
                (None, None) => unreachable!(),
            };
            entries.push((name, AxisValue::combine(a, b, &op)));
        }
        Location { entries }
    }

    /// Axis-wise sum. The result covers the union of both axis sets; a
    /// missing axis counts as zero on the side that lacks it.
    pub fn add(&self, other: &Location) -> Location {
        self.combine(other, |a, b| a + b)
    }

    /// Axis-wise difference, with the same union/zero rules as [`add`].
    ///
    /// [`add`]: Location::add
    pub fn subtract(&self, other: &Location) -> Location {
        self.combine(other, |a, b| a - b)
    }

    /// Multiply every component of every coordinate by `factor`.
    pub fn scale(&self, factor: f64) -> Location {
        Location {
            entries: self
                .entries
                .iter()
                .map(|(n, v)| (n.clone(), v.scale(factor)))
                .collect(),
        }
    }

    /// Drop entries whose every component is zero.
    pub fn without_zeroes(&self) -> Location {
        Location {
            entries: self
                .entries
                .iter()
                .filter(|(_, v)| !v.is_zero())
                .cloned()
                .collect(),
        }
    }

    /// The names of the axes that are nonzero, sorted.
    pub fn nonzero_axes(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_zero())
            .map(|(n, _)| n.as_str())
    }

    /// True when every axis sits at zero (an all-zero split pair counts).
    pub fn is_origin(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_zero())
    }

    /// The single nonzero axis name, when exactly one axis is nonzero.
    pub fn on_axis_name(&self) -> Option<&str> {
        let mut nonzero = self.nonzero_axes();
        let first = nonzero.next()?;
        match nonzero.next() {
            None => Some(first),
            Some(_) => None,
        }
    }

    /// True when exactly one axis is nonzero.
    pub fn is_on_axis(&self) -> bool {
        self.on_axis_name().is_some()
    }

    /// True when two or more axes are nonzero.
    pub fn is_off_axis(&self) -> bool {
        self.nonzero_axes().take(2).count() == 2
    }

    /// True when any axis carries a split pair.
    pub fn is_anisotropic(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_anisotropic())
    }

    /// Project onto one component: every split pair collapses to the selected
    /// component, scalars pass through.
    pub fn project(&self, component: Component) -> Location {
        Location {
            entries: self
                .entries
                .iter()
                .map(|(n, v)| (n.clone(), AxisValue::scalar(v.component(component))))
                .collect(),
        }
    }

    /// Split into the all-scalar horizontal and vertical projections.
    pub fn split(&self) -> (Location, Location) {
        (
            self.project(Component::Horizontal),
            self.project(Component::Vertical),
        )
    }
}

impl Ord for Location {
    /// Lexicographic over the union of both axis sets, with implicit zeroes
    /// for axes one side lacks. Numeric ties fall back to the raw entry
    /// lists, so ordering stays consistent with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        let (mut i, mut j) = (0, 0);
        loop {
            let (a, b) = match (self.entries.get(i), other.entries.get(j)) {
                (None, None) => break,
                (Some((_, va)), None) => {
                    i += 1;
                    (*va, AxisValue::ZERO)
                }
                (None, Some((_, vb))) => {
                    j += 1;
                    (AxisValue::ZERO, *vb)
                }
                (Some((na, va)), Some((nb, vb))) => match na.cmp(nb) {
                    Ordering::Less => {
                        i += 1;
                        (*va, AxisValue::ZERO)
                    }
                    Ordering::Greater => {
                        j += 1;
                        (AxisValue::ZERO, *vb)
                    }
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                        (*va, *vb)
                    }
                },
            };
            let ord = a.cmp(&b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.entries.cmp(&other.entries)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "origin");
        }
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Find the translation that re-centers a master system at the origin.
///
/// If any location already is the origin the system needs no translation.
/// Otherwise the candidate location that leaves the most locations at the
/// origin or on a single axis after subtraction wins; ties break toward the
/// smallest candidate in [`Location`] order. Both the scores and the relative
/// order are preserved under uniform translation, so a translated master set
/// re-centers onto the same master.
pub fn bias_from_locations(locations: &[Location]) -> Location {
    if locations.is_empty() || locations.iter().any(Location::is_origin) {
        return Location::origin();
    }
    let mut best: Option<(usize, &Location)> = None;
    for candidate in locations {
        let score = locations
            .iter()
            .filter(|l| {
                let centered = l.subtract(candidate);
                centered.is_origin() || centered.is_on_axis()
            })
            .count();
        best = match best {
            None => Some((score, candidate)),
            Some((s, b)) if score > s || (score == s && candidate < b) => {
                Some((score, candidate))
            }
            keep => keep,
        };
    }
    best.map(|(_, l)| l.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(pairs: &[(&str, f64)]) -> Location {
        Location::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn add_takes_the_union_of_axis_sets() {
        let a = loc(&[("weight", 1.0)]);
        let b = loc(&[("width", 2.0)]);

        let sum = a.add(&b);
        assert_eq!(sum, loc(&[("weight", 1.0), ("width", 2.0)]));
    }

    #[test]
    fn subtract_treats_missing_axes_as_zero() {
        let a = loc(&[("weight", 1.0)]);
        let b = loc(&[("weight", 0.25), ("width", 2.0)]);

        let diff = a.subtract(&b);
        assert_eq!(diff, loc(&[("weight", 0.75), ("width", -2.0)]));
    }

    #[test]
    fn scale_touches_both_components_of_a_pair() {
        let a = Location::origin().with("weight", (1.0, 2.0));
        assert_eq!(a.scale(2.0), Location::origin().with("weight", (2.0, 4.0)));
    }

    #[test]
    fn anisotropic_combines_with_scalar_by_promotion() {
        let a = Location::origin().with("weight", (1.0, 2.0));
        let b = loc(&[("weight", 1.0)]);

        assert_eq!(a.add(&b), Location::origin().with("weight", (2.0, 3.0)));
    }

    #[test]
    fn classification() {
        assert!(Location::origin().is_origin());
        assert!(loc(&[("weight", 0.0)]).is_origin());
        assert!(Location::origin().with("weight", (0.0, 0.0)).is_origin());

        let on = loc(&[("weight", 1.0), ("width", 0.0)]);
        assert_eq!(on.on_axis_name(), Some("weight"));
        assert!(!on.is_off_axis());

        let off = loc(&[("weight", 1.0), ("width", 1.0)]);
        assert!(off.is_off_axis());
        assert_eq!(off.on_axis_name(), None);
    }

    #[test]
    fn explicit_zero_entries_do_not_compare_equal_to_the_origin() {
        assert_ne!(loc(&[("weight", 0.0)]), Location::origin());
        assert_eq!(loc(&[("weight", 0.0)]).without_zeroes(), Location::origin());
    }

    #[test]
    fn split_projects_components() {
        let a = Location::from_pairs([("weight", AxisValue::anisotropic(0.5, 1.0))])
            .with("width", 2.0);
        let (h, v) = a.split();

        assert_eq!(h, loc(&[("weight", 0.5), ("width", 2.0)]));
        assert_eq!(v, loc(&[("weight", 1.0), ("width", 2.0)]));
        assert!(!h.is_anisotropic());
    }

    #[test]
    fn ordering_uses_implicit_zeroes() {
        assert!(loc(&[("weight", -1.0)]) < Location::origin());
        assert!(Location::origin() < loc(&[("weight", 1.0)]));
        assert!(loc(&[("pop", 1.0), ("snap", 1.0)]) < loc(&[("pop", 1.0), ("snap", 2.0)]));
        assert!(loc(&[("pop", 1.0), ("snap", 1.0)]) < loc(&[("pop", 2.0), ("snap", 1.0)]));
    }

    #[test]
    fn ordering_is_consistent_with_equality_for_zero_entries() {
        let explicit = loc(&[("weight", 0.0)]);
        assert_ne!(explicit, Location::origin());
        assert_ne!(explicit.cmp(&Location::origin()), Ordering::Equal);
    }

    #[test]
    fn bias_of_a_system_with_an_origin_master_is_the_origin() {
        let locations = vec![Location::origin(), loc(&[("weight", 1.0)])];
        assert_eq!(bias_from_locations(&locations), Location::origin());
    }

    #[test]
    fn bias_recenters_a_translated_grid() {
        // The six-master grid from the original calculator's builder test:
        // the common corner (pop=1, snap=1) is the neutral.
        let locations: Vec<Location> = [(1.0, 1.0), (2.0, 1.0), (3.0, 1.0), (1.0, 2.0), (2.0, 2.0), (3.0, 2.0)]
            .iter()
            .map(|&(p, s)| loc(&[("pop", p), ("snap", s)]))
            .collect();

        assert_eq!(bias_from_locations(&locations), loc(&[("pop", 1.0), ("snap", 1.0)]));
    }

    #[test]
    fn display() {
        assert_eq!(Location::origin().to_string(), "origin");
        assert_eq!(
            Location::origin().with("weight", 1.0).with("width", (0.5, 0.75)).to_string(),
            "weight=1, width=(0.5, 0.75)"
        );
    }
}
