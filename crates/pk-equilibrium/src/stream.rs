//! Material streams.
//!
//! A [`Stream`] is either a [`SingleStream`] (one phase) or a [`MultiStream`]
//! (liquid and vapor flows). Converting a single-phase stream into a
//! multi-phase one is explicit and consumes the original.
//!
//! Flows are molar [mol/s]; masses use molar weights in g/mol and come out
//! in kg/s.

use crate::error::{EquilibriumError, EquilibriumResult};
use crate::thermo::Thermo;
use crate::validation;
use pk_core::constants::{T_STD_K, atm};
use pk_core::{Pressure, Temperature, k, pa, to_k, to_pa};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Liquid,
    Vapor,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Liquid => write!(f, "liquid"),
            Phase::Vapor => write!(f, "vapor"),
        }
    }
}

/// Temperature and pressure of a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalCondition {
    pub t: Temperature,
    pub p: Pressure,
}

impl ThermalCondition {
    pub fn new(t: Temperature, p: Pressure) -> Self {
        Self { t, p }
    }
}

impl Default for ThermalCondition {
    fn default() -> Self {
        Self {
            t: k(T_STD_K),
            p: atm(),
        }
    }
}

/// Solution of a bubble or dew point query on a stream.
///
/// `composition` is the incipient phase composition over every chemical of
/// the stream; chemicals without flow have zero fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumPoint {
    pub t: Temperature,
    pub p: Pressure,
    pub composition: Vec<f64>,
}

fn check_flows(thermo: &Thermo, flows: &[f64]) -> EquilibriumResult<()> {
    validation::length("flows", flows, thermo.len())?;
    if let Some(v) = flows.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(EquilibriumError::composition(format!("invalid flow {v}")));
    }
    Ok(())
}

fn same_chemicals(a: &Thermo, b: &Thermo) -> EquilibriumResult<()> {
    if a.ids() != b.ids() {
        return Err(EquilibriumError::InvalidArg {
            what: "mixed streams must share the same chemicals",
        });
    }
    Ok(())
}

fn molfrac_of(flows: &[f64]) -> EquilibriumResult<Vec<f64>> {
    let total = validation::amounts("stream flows", flows)?;
    Ok(flows.iter().map(|f| f / total).collect())
}

fn massnet_of(thermo: &Thermo, flows: &[f64]) -> f64 {
    thermo
        .chemicals()
        .iter()
        .zip(flows)
        .map(|(c, n)| c.mw() * n)
        .sum::<f64>()
        / 1000.0
}

/// A single-phase stream.
#[derive(Debug, Clone)]
pub struct SingleStream {
    thermo: Arc<Thermo>,
    phase: Phase,
    flows: Vec<f64>,
    condition: ThermalCondition,
}

impl SingleStream {
    pub fn new(thermo: Arc<Thermo>, phase: Phase, flows: Vec<f64>) -> EquilibriumResult<Self> {
        check_flows(&thermo, &flows)?;
        Ok(Self {
            thermo,
            phase,
            flows,
            condition: ThermalCondition::default(),
        })
    }

    /// Stream with no flow.
    pub fn empty(thermo: Arc<Thermo>, phase: Phase) -> Self {
        let flows = vec![0.0; thermo.len()];
        Self {
            thermo,
            phase,
            flows,
            condition: ThermalCondition::default(),
        }
    }

    pub fn with_condition(mut self, condition: ThermalCondition) -> Self {
        self.condition = condition;
        self
    }

    pub fn thermo(&self) -> &Arc<Thermo> {
        &self.thermo
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn flows(&self) -> &[f64] {
        &self.flows
    }

    pub fn condition(&self) -> &ThermalCondition {
        &self.condition
    }

    pub fn condition_mut(&mut self) -> &mut ThermalCondition {
        &mut self.condition
    }

    /// Flow of chemical `id`, or `None` if it is not part of this stream.
    pub fn flow(&self, id: &str) -> Option<f64> {
        self.thermo.index_of(id).map(|i| self.flows[i])
    }

    pub fn set_flow(&mut self, id: &str, flow: f64) -> EquilibriumResult<()> {
        if !flow.is_finite() || flow < 0.0 {
            return Err(EquilibriumError::composition(format!("invalid flow {flow}")));
        }
        let i = self
            .thermo
            .index_of(id)
            .ok_or_else(|| EquilibriumError::UnknownChemical { id: id.to_string() })?;
        self.flows[i] = flow;
        Ok(())
    }

    /// Total molar flow.
    pub fn molnet(&self) -> f64 {
        self.flows.iter().sum()
    }

    pub fn molfrac(&self) -> EquilibriumResult<Vec<f64>> {
        molfrac_of(&self.flows)
    }

    /// Total mass flow [kg/s].
    pub fn massnet(&self) -> f64 {
        massnet_of(&self.thermo, &self.flows)
    }

    /// Replace the flows with the sum of `others`. Temperature, pressure and
    /// phase are kept.
    pub fn mix_from(&mut self, others: &[&Stream]) -> EquilibriumResult<()> {
        let mut flows = vec![0.0; self.flows.len()];
        for other in others {
            same_chemicals(&self.thermo, other.thermo())?;
            for (total, f) in flows.iter_mut().zip(other.total_flows()) {
                *total += f;
            }
        }
        self.flows = flows;
        Ok(())
    }

    /// Multi-phase stream holding these flows in this stream's phase.
    pub fn into_multi_phase(self) -> MultiStream {
        let empty = vec![0.0; self.flows.len()];
        let (liquid, vapor) = match self.phase {
            Phase::Liquid => (self.flows, empty),
            Phase::Vapor => (empty, self.flows),
        };
        MultiStream {
            thermo: self.thermo,
            liquid,
            vapor,
            condition: self.condition,
        }
    }
}

/// A stream with liquid and vapor flows.
#[derive(Debug, Clone)]
pub struct MultiStream {
    thermo: Arc<Thermo>,
    liquid: Vec<f64>,
    vapor: Vec<f64>,
    condition: ThermalCondition,
}

impl MultiStream {
    pub fn new(thermo: Arc<Thermo>, liquid: Vec<f64>, vapor: Vec<f64>) -> EquilibriumResult<Self> {
        check_flows(&thermo, &liquid)?;
        check_flows(&thermo, &vapor)?;
        Ok(Self {
            thermo,
            liquid,
            vapor,
            condition: ThermalCondition::default(),
        })
    }

    pub fn with_condition(mut self, condition: ThermalCondition) -> Self {
        self.condition = condition;
        self
    }

    pub fn thermo(&self) -> &Arc<Thermo> {
        &self.thermo
    }

    pub fn condition(&self) -> &ThermalCondition {
        &self.condition
    }

    pub fn condition_mut(&mut self) -> &mut ThermalCondition {
        &mut self.condition
    }

    pub fn flows(&self, phase: Phase) -> &[f64] {
        match phase {
            Phase::Liquid => &self.liquid,
            Phase::Vapor => &self.vapor,
        }
    }

    pub fn set_flows(&mut self, phase: Phase, flows: Vec<f64>) -> EquilibriumResult<()> {
        check_flows(&self.thermo, &flows)?;
        match phase {
            Phase::Liquid => self.liquid = flows,
            Phase::Vapor => self.vapor = flows,
        }
        Ok(())
    }

    /// Flows summed over both phases.
    pub fn total_flows(&self) -> Vec<f64> {
        self.liquid.iter().zip(&self.vapor).map(|(l, v)| l + v).collect()
    }

    pub fn molnet(&self) -> f64 {
        self.liquid.iter().chain(&self.vapor).sum()
    }

    /// Overall mole fractions.
    pub fn molfrac(&self) -> EquilibriumResult<Vec<f64>> {
        molfrac_of(&self.total_flows())
    }

    pub fn massnet(&self) -> f64 {
        massnet_of(&self.thermo, &self.total_flows())
    }

    /// Replace both phases with the phase-wise sum of `others`. Single-phase
    /// inputs contribute to their own phase.
    pub fn mix_from(&mut self, others: &[&Stream]) -> EquilibriumResult<()> {
        let n = self.liquid.len();
        let mut liquid = vec![0.0; n];
        let mut vapor = vec![0.0; n];
        let none: &[f64] = &[];
        for other in others {
            same_chemicals(&self.thermo, other.thermo())?;
            let (l, v): (&[f64], &[f64]) = match other {
                Stream::Single(s) => match s.phase {
                    Phase::Liquid => (s.flows.as_slice(), none),
                    Phase::Vapor => (none, s.flows.as_slice()),
                },
                Stream::Multi(m) => (m.liquid.as_slice(), m.vapor.as_slice()),
            };
            for (total, f) in liquid.iter_mut().zip(l) {
                *total += f;
            }
            for (total, f) in vapor.iter_mut().zip(v) {
                *total += f;
            }
        }
        self.liquid = liquid;
        self.vapor = vapor;
        Ok(())
    }
}

/// Single- or multi-phase material stream.
#[derive(Debug, Clone)]
pub enum Stream {
    Single(SingleStream),
    Multi(MultiStream),
}

impl From<SingleStream> for Stream {
    fn from(stream: SingleStream) -> Self {
        Stream::Single(stream)
    }
}

impl From<MultiStream> for Stream {
    fn from(stream: MultiStream) -> Self {
        Stream::Multi(stream)
    }
}

#[derive(Clone, Copy)]
enum Query {
    BubbleAtP,
    BubbleAtT,
    DewAtP,
    DewAtT,
}

impl Stream {
    pub fn thermo(&self) -> &Arc<Thermo> {
        match self {
            Stream::Single(s) => &s.thermo,
            Stream::Multi(m) => &m.thermo,
        }
    }

    pub fn condition(&self) -> &ThermalCondition {
        match self {
            Stream::Single(s) => &s.condition,
            Stream::Multi(m) => &m.condition,
        }
    }

    pub fn is_multi_phase(&self) -> bool {
        matches!(self, Stream::Multi(_))
    }

    /// Flows summed over all phases.
    pub fn total_flows(&self) -> Vec<f64> {
        match self {
            Stream::Single(s) => s.flows.clone(),
            Stream::Multi(m) => m.total_flows(),
        }
    }

    pub fn molnet(&self) -> f64 {
        match self {
            Stream::Single(s) => s.molnet(),
            Stream::Multi(m) => m.molnet(),
        }
    }

    pub fn molfrac(&self) -> EquilibriumResult<Vec<f64>> {
        match self {
            Stream::Single(s) => s.molfrac(),
            Stream::Multi(m) => m.molfrac(),
        }
    }

    pub fn massnet(&self) -> f64 {
        match self {
            Stream::Single(s) => s.massnet(),
            Stream::Multi(m) => m.massnet(),
        }
    }

    pub fn mix_from(&mut self, others: &[&Stream]) -> EquilibriumResult<()> {
        match self {
            Stream::Single(s) => s.mix_from(others),
            Stream::Multi(m) => m.mix_from(others),
        }
    }

    /// Multi-phase view of this stream; already multi-phase streams are
    /// returned unchanged.
    pub fn into_multi_phase(self) -> Stream {
        match self {
            Stream::Single(s) => Stream::Multi(s.into_multi_phase()),
            multi => multi,
        }
    }

    /// Bubble point temperature of the stream's overall composition at `p`.
    pub fn bubble_point_at_p(&self, p: Pressure) -> EquilibriumResult<EquilibriumPoint> {
        self.equilibrium(Query::BubbleAtP, to_pa(p))
    }

    /// Bubble point pressure of the stream's overall composition at `t`.
    pub fn bubble_point_at_t(&self, t: Temperature) -> EquilibriumResult<EquilibriumPoint> {
        self.equilibrium(Query::BubbleAtT, to_k(t))
    }

    pub fn dew_point_at_p(&self, p: Pressure) -> EquilibriumResult<EquilibriumPoint> {
        self.equilibrium(Query::DewAtP, to_pa(p))
    }

    pub fn dew_point_at_t(&self, t: Temperature) -> EquilibriumResult<EquilibriumPoint> {
        self.equilibrium(Query::DewAtT, to_k(t))
    }

    fn equilibrium(&self, query: Query, value: f64) -> EquilibriumResult<EquilibriumPoint> {
        let flows = self.total_flows();
        let active: Vec<usize> = (0..flows.len()).filter(|&i| flows[i] > 0.0).collect();
        if active.is_empty() {
            return Err(EquilibriumError::composition("stream has no flow"));
        }
        let z: Vec<f64> = active.iter().map(|&i| flows[i]).collect();
        let thermo = self.thermo();
        let (t, p, partial) = match query {
            Query::BubbleAtP => {
                let (t, y) = thermo.bubble_point_for(&active)?.solve_ty(&z, value)?;
                (t, value, y)
            }
            Query::BubbleAtT => {
                let (p, y) = thermo.bubble_point_for(&active)?.solve_py(&z, value)?;
                (value, p, y)
            }
            Query::DewAtP => {
                let (t, x) = thermo.dew_point_for(&active)?.solve_tx(&z, value)?;
                (t, value, x)
            }
            Query::DewAtT => {
                let (p, x) = thermo.dew_point_for(&active)?.solve_px(&z, value)?;
                (value, p, x)
            }
        };
        let mut composition = vec![0.0; flows.len()];
        for (&i, v) in active.iter().zip(partial) {
            composition[i] = v;
        }
        Ok(EquilibriumPoint {
            t: k(t),
            p: pa(p),
            composition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thermo() -> Arc<Thermo> {
        Arc::new(Thermo::from_ids(&["Ethanol", "Water", "n-Hexane"]).unwrap())
    }

    #[test]
    fn flows_and_fractions() {
        let s = SingleStream::new(thermo(), Phase::Liquid, vec![1.0, 3.0, 0.0]).unwrap();
        assert_eq!(s.molnet(), 4.0);
        assert_eq!(s.molfrac().unwrap(), vec![0.25, 0.75, 0.0]);
        let expected = (46.06844 + 3.0 * 18.01528) / 1000.0;
        assert!((s.massnet() - expected).abs() < 1e-3);
        assert_eq!(s.flow("Water"), Some(3.0));
        assert_eq!(s.flow("Benzene"), None);
    }

    #[test]
    fn invalid_flows_rejected() {
        let t = thermo();
        assert!(SingleStream::new(Arc::clone(&t), Phase::Liquid, vec![1.0, 2.0]).is_err());
        assert!(SingleStream::new(Arc::clone(&t), Phase::Liquid, vec![1.0, -2.0, 0.0]).is_err());
        let mut s = SingleStream::empty(t, Phase::Vapor);
        assert!(s.set_flow("Water", f64::NAN).is_err());
        assert!(s.set_flow("Benzene", 1.0).is_err());
    }

    #[test]
    fn zero_flow_has_no_composition() {
        let s = Stream::from(SingleStream::empty(thermo(), Phase::Liquid));
        assert_eq!(s.molnet(), 0.0);
        assert!(matches!(s.molfrac(), Err(EquilibriumError::Composition { .. })));
        assert!(matches!(
            s.bubble_point_at_p(atm()),
            Err(EquilibriumError::Composition { .. })
        ));
    }

    #[test]
    fn mixing_sums_flows_and_keeps_condition() {
        let t = thermo();
        let a: Stream = SingleStream::new(Arc::clone(&t), Phase::Liquid, vec![1.0, 0.0, 0.0])
            .unwrap()
            .into();
        let b: Stream = MultiStream::new(Arc::clone(&t), vec![0.0, 2.0, 0.0], vec![0.5, 0.0, 1.0])
            .unwrap()
            .into();
        let condition = ThermalCondition::new(k(350.0), pa(2e5));
        let mut out = SingleStream::empty(Arc::clone(&t), Phase::Liquid).with_condition(condition);
        out.mix_from(&[&a, &b]).unwrap();
        assert_eq!(out.flows(), &[1.5, 2.0, 1.0]);
        assert_eq!(out.condition(), &condition);

        let mut multi = MultiStream::new(Arc::clone(&t), vec![0.0; 3], vec![0.0; 3]).unwrap();
        multi.mix_from(&[&a, &b]).unwrap();
        assert_eq!(multi.flows(Phase::Liquid), &[1.0, 2.0, 0.0]);
        assert_eq!(multi.flows(Phase::Vapor), &[0.5, 0.0, 1.0]);
        assert_eq!(multi.molnet(), 4.5);
    }

    #[test]
    fn mixing_requires_same_chemicals() {
        let other = Arc::new(Thermo::from_ids(&["Water", "Ethanol", "n-Hexane"]).unwrap());
        let a: Stream = SingleStream::new(other, Phase::Liquid, vec![1.0, 1.0, 0.0])
            .unwrap()
            .into();
        let mut out = SingleStream::empty(thermo(), Phase::Liquid);
        assert!(out.mix_from(&[&a]).is_err());
    }

    #[test]
    fn conversion_to_multi_phase() {
        let s = SingleStream::new(thermo(), Phase::Vapor, vec![1.0, 2.0, 0.0]).unwrap();
        let stream = Stream::from(s).into_multi_phase();
        assert!(stream.is_multi_phase());
        let Stream::Multi(m) = &stream else {
            panic!("expected multi-phase stream");
        };
        assert_eq!(m.flows(Phase::Vapor), &[1.0, 2.0, 0.0]);
        assert_eq!(m.flows(Phase::Liquid), &[0.0, 0.0, 0.0]);
        assert_eq!(stream.molnet(), 3.0);
        assert!(stream.into_multi_phase().is_multi_phase());
    }

    #[test]
    fn bubble_point_uses_active_chemicals() {
        // Hexane has no flow and must not enter the calculation.
        let s = Stream::from(SingleStream::new(thermo(), Phase::Liquid, vec![0.6, 0.4, 0.0]).unwrap());
        let point = s.bubble_point_at_p(atm()).unwrap();
        assert!((to_k(point.t) - 352.29).abs() < 0.1);
        assert_eq!(point.composition.len(), 3);
        assert_eq!(point.composition[2], 0.0);
        assert!((point.composition[0] - 0.7025).abs() < 0.005);
        assert_eq!(to_pa(point.p), 101325.0);
    }

    #[test]
    fn dew_point_at_t() {
        let s = Stream::from(SingleStream::new(thermo(), Phase::Vapor, vec![0.757, 0.243, 0.0]).unwrap());
        let point = s.dew_point_at_t(k(352.28)).unwrap();
        assert!((to_pa(point.p) - 103437.0).abs() / 103437.0 < 0.005);
        assert!((point.composition[0] - 0.703).abs() < 0.005);
    }
}
