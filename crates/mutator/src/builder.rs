//! Building a mutator from a master set.

use blendspace_location::{Component, Location, bias_from_locations};
use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    axis_model::AxisModel,
    error::{Error, Result},
    mutator::{MasterKind, MasterRecord, Model, Mutator},
    offaxis::{Correction, Tent, TentAxis},
    value::Interpolable,
};

/// How the builder picks the bias translation.
#[derive(Debug, Clone, PartialEq)]
pub enum Bias {
    /// Derive it from the master locations (see
    /// [`bias_from_locations`]): a master set specified in any absolute
    /// frame re-centers onto its common corner.
    Auto,
    /// Never translate; masters are taken to be origin-centered already.
    Origin,
    /// Use the given translation as supplied.
    Explicit(Location),
}

/// Build configuration. The defaults match the common case: automatic bias,
/// no neutral fallback value, extrapolation allowed everywhere.
#[derive(Debug, Clone)]
pub struct Options<V> {
    pub bias: Bias,
    /// Used as the neutral value when no master sits at the biased origin.
    /// Without it, the zeroed first master value serves as the neutral.
    pub neutral_default: Option<V>,
    /// Reject axes defined by a single master instead of extrapolating the
    /// line through the origin.
    pub strict: bool,
}

impl<V> Default for Options<V> {
    fn default() -> Self {
        Options {
            bias: Bias::Auto,
            neutral_default: None,
            strict: false,
        }
    }
}

impl<V> Options<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bias(mut self, bias: Bias) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_neutral_default(mut self, value: V) -> Self {
        self.neutral_default = Some(value);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Build a mutator from `(location, value)` pairs with default [`Options`].
///
/// # Example
///
/// ```
/// use blendspace_mutator::{Location, build_mutator};
///
/// let mutator = build_mutator(vec![
///     (Location::origin(), 0.0),
///     (Location::from_pairs([("weight", 1.0)]), 10.0),
/// ])
/// .unwrap();
///
/// let at = |w: f64| mutator.instance(&Location::from_pairs([("weight", w)]));
/// assert_eq!(at(0.5), 5.0);
/// assert_eq!(at(2.0), 20.0);
/// ```
pub fn build_mutator<V: Interpolable>(
    masters: impl IntoIterator<Item = (Location, V)>,
) -> Result<Mutator<V>> {
    build_mutator_with(masters, Options::default())
}

/// Build a mutator from `(location, value)` pairs.
///
/// The pipeline validates the master set, derives the bias, classifies every
/// master as neutral, on-axis, or off-axis, builds the per-axis piecewise
/// models, and chains the off-axis residual corrections so that every master
/// is an exact knot of the finished function.
pub fn build_mutator_with<V: Interpolable>(
    masters: impl IntoIterator<Item = (Location, V)>,
    options: Options<V>,
) -> Result<Mutator<V>> {
    let mut masters: Vec<(Location, V)> = masters.into_iter().collect();
    if masters.is_empty() {
        return Err(Error::EmptyMasterSet);
    }
    debug!("building mutator from {} masters", masters.len());

    // the caller's order does not matter, but every build of the same set
    // must produce the identical mutator
    masters.sort_by(|a, b| a.0.cmp(&b.0));
    for pair in masters.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(Error::DuplicateLocation { location: pair[0].0.clone() });
        }
    }

    let bias = match &options.bias {
        Bias::Auto => {
            let locations: Vec<Location> = masters.iter().map(|(l, _)| l.clone()).collect();
            bias_from_locations(&locations)
        }
        Bias::Origin => Location::origin(),
        Bias::Explicit(location) => location.clone(),
    };
    if !bias.is_origin() {
        debug!("re-centering masters around {bias}");
    }
    let biased: Vec<Location> = masters.iter().map(|(l, _)| l.subtract(&bias)).collect();

    let mut neutral_idx = None;
    for (i, location) in biased.iter().enumerate() {
        if location.is_origin() {
            match neutral_idx {
                None => neutral_idx = Some(i),
                Some(first) => {
                    return Err(Error::AmbiguousNeutral {
                        first: masters[first].0.clone(),
                        second: masters[i].0.clone(),
                    });
                }
            }
        }
    }
    let neutral = match neutral_idx {
        Some(i) => masters[i].1.clone(),
        None => match &options.neutral_default {
            Some(value) => value.clone(),
            None => masters[0].1.zeroed(),
        },
    };
    let zero = neutral.zeroed();

    let mut axes: IndexMap<String, AxisModel<V>> = IndexMap::new();
    let mut records: Vec<MasterRecord> = Vec::with_capacity(masters.len());
    let mut off_axis: Vec<usize> = Vec::new();

    for (i, location) in biased.iter().enumerate() {
        if Some(i) == neutral_idx {
            records.push(MasterRecord {
                location: location.clone(),
                kind: MasterKind::Neutral,
            });
        } else if let Some(axis) = location.on_axis_name() {
            let coordinate = location.coordinate(axis);
            let delta = masters[i].1.subtract(&neutral);
            axes.entry(axis.to_string())
                .or_insert_with(|| AxisModel::new(zero.clone()))
                .insert(coordinate.horizontal(), coordinate.vertical(), delta)
                .map_err(|coordinate| Error::DuplicateBreakpoint {
                    axis: axis.to_string(),
                    coordinate,
                })?;
            records.push(MasterRecord {
                location: location.clone(),
                kind: MasterKind::OnAxis { axis: axis.to_string() },
            });
        } else {
            off_axis.push(i);
        }
    }

    if options.strict {
        for (axis, model) in &axes {
            if model.component(Component::Horizontal).master_count() < 2 {
                return Err(Error::SingleMasterAxis { axis: axis.clone() });
            }
        }
    }

    // masters moving fewer axes are corrected first; within one count the
    // location-sorted order from above still holds
    off_axis.sort_by_key(|&i| biased[i].nonzero_axes().count());

    fn combo_key(location: &Location) -> Vec<&str> {
        location.nonzero_axes().collect()
    }

    let mut model = Model { axes, corrections: Vec::new(), zero };
    for &i in &off_axis {
        let location = &biased[i];
        let key = combo_key(location);
        let mut tent_axes = Vec::with_capacity(key.len());
        for axis in &key {
            let coordinate = location.coordinate(axis);
            if coordinate.horizontal() == 0.0 || coordinate.vertical() == 0.0 {
                return Err(Error::DuplicateBreakpoint {
                    axis: (*axis).to_string(),
                    coordinate: 0.0,
                });
            }
            let peers = |component: Component| -> Vec<f64> {
                off_axis
                    .iter()
                    .filter(|&&j| j != i && combo_key(&biased[j]) == key)
                    .map(|&j| biased[j].coordinate(axis).component(component))
                    .collect()
            };
            tent_axes.push(TentAxis::new(
                (*axis).to_string(),
                Tent::new(coordinate.horizontal(), &peers(Component::Horizontal)),
                Tent::new(coordinate.vertical(), &peers(Component::Vertical)),
            ));
        }
        let predicted = model.delta_at(location);
        let residual = masters[i].1.subtract(&neutral).subtract(&predicted);
        trace!("off-axis correction at {location}");
        records.push(MasterRecord {
            location: location.clone(),
            kind: MasterKind::OffAxis { index: model.corrections.len() },
        });
        model.corrections.push(Correction::new(tent_axes, residual));
    }

    debug!(
        "mutator ready: {} axes, {} off-axis corrections",
        model.axes.len(),
        model.corrections.len()
    );
    Ok(Mutator::assemble(bias, neutral, model, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(pairs: &[(&str, f64)]) -> Location {
        Location::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn empty_master_set_is_rejected() {
        let masters: Vec<(Location, f64)> = vec![];
        assert!(matches!(build_mutator(masters), Err(Error::EmptyMasterSet)));
    }

    #[test]
    fn duplicate_locations_are_rejected() {
        let result = build_mutator(vec![
            (loc(&[("weight", 0.0)]), 1.0),
            (loc(&[("weight", 0.0)]), 2.0),
        ]);
        assert!(matches!(result, Err(Error::DuplicateLocation { .. })));
    }

    #[test]
    fn two_masters_at_the_origin_are_ambiguous() {
        // distinct locations, both at the origin: a scalar zero and an
        // all-zero split pair
        let result = build_mutator(vec![
            (loc(&[("weight", 0.0)]), 1.0),
            (Location::origin().with("weight", (0.0, 0.0)), 2.0),
        ]);
        assert!(matches!(result, Err(Error::AmbiguousNeutral { .. })));
    }

    #[test]
    fn strict_mode_rejects_a_single_master_axis() {
        let masters = vec![
            (Location::origin(), 0.0),
            (loc(&[("weight", 1.0)]), 10.0),
            (loc(&[("width", 1.0)]), 4.0),
            (loc(&[("width", 2.0)]), 8.0),
        ];
        let result = build_mutator_with(
            masters.clone(),
            Options::default().with_strict(true),
        );
        match result {
            Err(Error::SingleMasterAxis { axis }) => assert_eq!(axis, "weight"),
            other => panic!("expected SingleMasterAxis, got {other:?}"),
        }

        // the same set builds fine without strict mode
        assert!(build_mutator(masters).is_ok());
    }

    #[test]
    fn on_axis_component_on_zero_collides_with_the_origin() {
        let result = build_mutator(vec![
            (Location::origin(), 0.0),
            (Location::origin().with("weight", (1.0, 0.0)), 10.0),
        ]);
        assert!(matches!(result, Err(Error::DuplicateBreakpoint { .. })));
    }

    #[test]
    fn neutral_defaults_to_zero_when_no_origin_master_exists() {
        let mutator = build_mutator_with(
            vec![(loc(&[("weight", 1.0)]), 10.0)],
            Options::default().with_bias(Bias::Origin),
        )
        .unwrap();
        assert_eq!(*mutator.neutral(), 0.0);
        assert_eq!(mutator.instance(&loc(&[("weight", 0.5)])), 5.0);
    }

    #[test]
    fn neutral_default_option_is_used_when_supplied() {
        let mutator = build_mutator_with(
            vec![(loc(&[("weight", 1.0)]), 10.0)],
            Options::default()
                .with_bias(Bias::Origin)
                .with_neutral_default(100.0),
        )
        .unwrap();
        assert_eq!(*mutator.neutral(), 100.0);
        // the on-axis delta is relative to the supplied neutral
        assert_eq!(mutator.instance(&loc(&[("weight", 1.0)])), 10.0);
        assert_eq!(mutator.instance(&loc(&[("weight", 0.0)])), 100.0);
    }

    #[test]
    fn explicit_bias_is_applied_verbatim() {
        let mutator = build_mutator_with(
            vec![
                (loc(&[("weight", 400.0)]), 0.0),
                (loc(&[("weight", 700.0)]), 30.0),
            ],
            Options::default().with_bias(Bias::Explicit(loc(&[("weight", 400.0)]))),
        )
        .unwrap();
        assert_eq!(*mutator.bias(), loc(&[("weight", 400.0)]));
        assert_eq!(mutator.instance(&loc(&[("weight", 550.0)])), 15.0);
    }

    #[test]
    fn build_order_does_not_matter() {
        let a = vec![
            (Location::origin(), 0.0),
            (loc(&[("weight", 1.0)]), 10.0),
            (loc(&[("weight", 1.0), ("width", 1.0)]), 25.0),
            (loc(&[("width", 1.0)]), 4.0),
        ];
        let mut b = a.clone();
        b.reverse();

        let ma = build_mutator(a).unwrap();
        let mb = build_mutator(b).unwrap();
        let q = loc(&[("weight", 0.7), ("width", 0.3)]);
        assert_eq!(ma.instance(&q), mb.instance(&q));
    }
}
