use crate::atom::model::{ElectronState, ModelKind};
use crate::physics::photon::{PhotonId, PhotonSource};
use crate::simulation::AtomSource;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Notifications for the presentation layer, drained once per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    PhotonEmitted {
        id: PhotonId,
        wavelength: f64,
        position: DVec2,
        direction: f64,
        source: PhotonSource,
    },
    PhotonAbsorbed {
        id: PhotonId,
        wavelength: f64,
    },
    /// Left the box. Photons dropped by a model switch or reset are not reported.
    PhotonRemoved {
        id: PhotonId,
    },
    StateChanged {
        model: ModelKind,
        from: ElectronState,
        to: ElectronState,
    },
    ModelSwitched {
        from: AtomSource,
        to: AtomSource,
    },
}
