use crate::config::SimulationConfig;
use crate::error::{SimResult, SimulationError};
use crate::scope::StateScope;
use crate::simulation::AtomSource;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Photon counts keyed by whole-nanometre wavelength.
pub type SpectrumData = BTreeMap<u32, u32>;

/// A frozen copy of the spectrum, tagged with the atom that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectrometerSnapshot {
    index: u32,
    source: AtomSource,
    data: SpectrumData,
}

impl SpectrometerSnapshot {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn source(&self) -> AtomSource {
        self.source
    }

    pub fn data(&self) -> &SpectrumData {
        &self.data
    }
}

#[derive(Clone, Debug)]
pub struct Spectrometer {
    scope: StateScope,
    recording: bool,
    data: SpectrumData,
    snapshots: Vec<SpectrometerSnapshot>,
    next_index: u32,
    max_snapshots: usize,
}

impl Spectrometer {
    pub fn new(config: &SimulationConfig, scope: StateScope) -> Self {
        Self {
            scope,
            recording: true,
            data: SpectrumData::new(),
            snapshots: Vec::new(),
            next_index: 1,
            max_snapshots: config.spectrometer.max_snapshots,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn record_emission(&mut self, wavelength: f64) {
        if !self.recording {
            return;
        }
        *self.data.entry(wavelength.round() as u32).or_insert(0) += 1;
    }

    pub fn data(&self) -> &SpectrumData {
        &self.data
    }

    pub fn count(&self, wavelength: u32) -> u32 {
        self.data.get(&wavelength).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.data.values().sum()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn snapshots(&self) -> &[SpectrometerSnapshot] {
        &self.snapshots
    }

    pub fn snapshot(&self, index: u32) -> Option<&SpectrometerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.index == index)
    }

    pub fn can_take_snapshot(&self) -> bool {
        self.snapshots.len() < self.max_snapshots
    }

    /// Copies the current data. Refused once `max_snapshots` are held; nothing is evicted.
    pub fn take_snapshot(&mut self, source: AtomSource) -> SimResult<u32> {
        if !self.can_take_snapshot() {
            warn!(
                "{}: snapshot refused, {} already held",
                self.scope,
                self.snapshots.len()
            );
            return Err(SimulationError::SnapshotLimit {
                max: self.max_snapshots,
            });
        }
        let index = self.next_index;
        self.next_index += 1;
        self.snapshots.push(SpectrometerSnapshot {
            index,
            source,
            data: self.data.clone(),
        });
        info!("{}: snapshot {} of {}", self.scope, index, source);
        Ok(index)
    }

    pub fn delete_snapshot(&mut self, index: u32) -> SimResult<SpectrometerSnapshot> {
        let position = self
            .snapshots
            .iter()
            .position(|snapshot| snapshot.index == index)
            .ok_or(SimulationError::UnknownSnapshot(index))?;
        info!("{}: deleted snapshot {}", self.scope, index);
        Ok(self.snapshots.remove(position))
    }

    pub fn reset(&mut self) {
        self.recording = true;
        self.data.clear();
        self.snapshots.clear();
        self.next_index = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::model::ModelKind;

    const BOHR: AtomSource = AtomSource::Prediction(ModelKind::Bohr);

    fn spectrometer() -> Spectrometer {
        Spectrometer::new(&SimulationConfig::default(), StateScope::root("spectrometer"))
    }

    #[test]
    fn counts_rounded_wavelengths_while_recording() {
        let mut spectrometer = spectrometer();
        spectrometer.record_emission(656.0);
        spectrometer.record_emission(655.6);
        spectrometer.record_emission(122.0);
        spectrometer.set_recording(false);
        spectrometer.record_emission(122.0);

        assert_eq!(spectrometer.count(656), 2);
        assert_eq!(spectrometer.count(122), 1);
        assert_eq!(spectrometer.total(), 3);

        spectrometer.clear();
        assert!(spectrometer.data().is_empty());
    }

    #[test]
    fn snapshots_are_frozen_copies() {
        let mut spectrometer = spectrometer();
        spectrometer.record_emission(486.0);
        let index = spectrometer.take_snapshot(BOHR).unwrap();
        spectrometer.record_emission(486.0);

        let snapshot = spectrometer.snapshot(index).unwrap();
        assert_eq!(snapshot.source(), BOHR);
        assert_eq!(snapshot.data().get(&486), Some(&1));
        assert_eq!(spectrometer.count(486), 2);
    }

    #[test]
    fn full_spectrometer_refuses_until_one_is_deleted() {
        let mut spectrometer = spectrometer();
        let indices: Vec<u32> = (0..5)
            .map(|_| spectrometer.take_snapshot(AtomSource::Experiment).unwrap())
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert!(matches!(
            spectrometer.take_snapshot(AtomSource::Experiment),
            Err(SimulationError::SnapshotLimit { max: 5 })
        ));
        assert_eq!(spectrometer.snapshots().len(), 5);

        let deleted = spectrometer.delete_snapshot(2).unwrap();
        assert_eq!(deleted.index(), 2);
        assert!(matches!(
            spectrometer.delete_snapshot(2),
            Err(SimulationError::UnknownSnapshot(2))
        ));
        assert_eq!(spectrometer.take_snapshot(BOHR).unwrap(), 6);
        assert!(spectrometer.take_snapshot(BOHR).is_err());
    }
}
