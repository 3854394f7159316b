//! The built interpolation function.

use blendspace_location::{Component, Location};
use indexmap::IndexMap;

use crate::{axis_model::AxisModel, offaxis::Correction, value::Interpolable};

/// The delta machinery shared by the builder and the finished mutator: the
/// per-axis models plus the off-axis corrections accumulated so far.
#[derive(Debug, Clone)]
pub(crate) struct Model<V> {
    pub(crate) axes: IndexMap<String, AxisModel<V>>,
    pub(crate) corrections: Vec<Correction<V>>,
    pub(crate) zero: V,
}

impl<V: Interpolable> Model<V> {
    /// The total delta (relative to the neutral) at a biased location.
    ///
    /// A split query runs one pass per component against that component's
    /// sub-models and recombines through `scale_split`; a scalar query runs a
    /// single horizontal pass.
    pub(crate) fn delta_at(&self, location: &Location) -> V {
        if location.is_anisotropic() {
            let (h, v) = location.split();
            let dh = self.delta_pass(&h, Component::Horizontal);
            let dv = self.delta_pass(&v, Component::Vertical);
            dh.scale_split(1.0, 0.0).add(&dv.scale_split(0.0, 1.0))
        } else {
            self.delta_pass(location, Component::Horizontal)
        }
    }

    fn delta_pass(&self, location: &Location, component: Component) -> V {
        let mut total = self.zero.clone();
        for (name, model) in &self.axes {
            let x = location.coordinate(name).component(component);
            if x == 0.0 {
                continue;
            }
            total = total.add(&model.component(component).delta_at(x));
        }
        for correction in &self.corrections {
            let weight = correction.weight(location, component);
            if weight != 0.0 {
                total = total.add(&correction.residual.scale(weight));
            }
        }
        total
    }
}

#[derive(Debug, Clone)]
pub(crate) enum MasterKind {
    Neutral,
    OnAxis { axis: String },
    OffAxis { index: usize },
}

#[derive(Debug, Clone)]
pub(crate) struct MasterRecord {
    pub(crate) location: Location,
    pub(crate) kind: MasterKind,
}

/// A calculator for multi-dimensional piecewise-linear interpolation,
/// built once from a master set by [`build_mutator`] and immutable
/// afterwards. Evaluation never mutates, so one mutator can be shared
/// across threads.
///
/// [`build_mutator`]: crate::build_mutator
#[derive(Debug, Clone)]
pub struct Mutator<V> {
    bias: Location,
    neutral: V,
    model: Model<V>,
    records: Vec<MasterRecord>,
}

impl<V: Interpolable> Mutator<V> {
    pub(crate) fn assemble(
        bias: Location,
        neutral: V,
        model: Model<V>,
        records: Vec<MasterRecord>,
    ) -> Self {
        Mutator { bias, neutral, model, records }
    }

    /// Calculate the value at a location.
    ///
    /// Never fails: queries outside master coverage extrapolate linearly, and
    /// axes no master ever moved contribute nothing.
    pub fn instance(&self, location: &Location) -> V {
        let biased = location.subtract(&self.bias);
        self.neutral.add(&self.model.delta_at(&biased))
    }

    /// The translation that re-centered the master system at the origin.
    pub fn bias(&self) -> &Location {
        &self.bias
    }

    /// The value at the (biased) origin.
    pub fn neutral(&self) -> &V {
        &self.neutral
    }

    /// Every axis the model knows, in build order.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.model.axes.keys().map(String::as_str)
    }

    /// The biased locations of all masters, neutral included.
    pub fn master_locations(&self) -> impl Iterator<Item = &Location> {
        self.records.iter().map(|r| &r.location)
    }

    /// The per-master scalar weights at a query, strongest first, zero
    /// weights filtered out. Locations are reported in the biased frame of
    /// [`master_locations`]; for a split query the horizontal pass is
    /// reported.
    ///
    /// [`master_locations`]: Mutator::master_locations
    pub fn contributions(&self, location: &Location) -> Vec<(Location, f64)> {
        let biased = location.subtract(&self.bias);
        let query = if biased.is_anisotropic() {
            biased.project(Component::Horizontal)
        } else {
            biased
        };
        let mut out = Vec::new();
        for record in &self.records {
            let weight = match &record.kind {
                MasterKind::Neutral => continue,
                MasterKind::OnAxis { axis } => {
                    let Some(model) = self.model.axes.get(axis) else {
                        continue;
                    };
                    let peak = record.location.coordinate(axis).horizontal();
                    let x = query.coordinate(axis).horizontal();
                    model.component(Component::Horizontal).weight_at(peak, x)
                }
                MasterKind::OffAxis { index } => {
                    self.model.corrections[*index].weight(&query, Component::Horizontal)
                }
            };
            if weight != 0.0 {
                out.push((record.location.clone(), weight));
            }
        }
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }
}
