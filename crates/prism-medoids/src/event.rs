//! Progress events and the sink that receives them.

use serde::{Deserialize, Serialize};

use prism_color::{Rgb, Sample};

use crate::cost::Cost;

/// A reported palette: one color per medoid slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// RGB triple for each slot, unpacked with [`Rgb::from_packed`].
    pub colors: Vec<Rgb>,
    /// Raw packed medoid samples, parallel to `colors`.
    pub samples: Vec<Sample>,
    /// Members per slot in the producing run's final assignment.
    pub cluster_sizes: Vec<usize>,
    /// Total cost of the producing run, `None` for [`Palette::unset`].
    pub cost: Option<Cost>,
    /// Index of the producing run, `None` for [`Palette::unset`].
    pub run: Option<usize>,
}

impl Palette {
    /// The default palette reported when no run succeeded: no colors and no
    /// cost.
    #[must_use]
    pub fn unset() -> Self {
        Self {
            colors: Vec::new(),
            samples: Vec::new(),
            cluster_sizes: Vec::new(),
            cost: None,
            run: None,
        }
    }

    /// Return true if this is the [`unset`](Self::unset) palette.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.cost.is_none()
    }

    /// Return the number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Return true if the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// A run that ended without producing a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    /// Index of the failed run.
    pub run: usize,
    /// Human-readable cause.
    pub message: String,
}

/// Notification delivered to a [`PaletteSink`].
///
/// Per call: zero or more `Improved`, zero or more `Error`, then exactly one
/// `Final`, which is always the last event delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEvent {
    /// A run beat the best cost seen so far in this call.
    Improved(Palette),
    /// All runs have completed; carries the best palette of the call.
    Final(Palette),
    /// One run failed. Sibling runs are unaffected.
    Error(RunFailure),
}

impl PaletteEvent {
    /// Return true for the [`Final`](Self::Final) event.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final(_))
    }

    /// Return the carried palette, if any.
    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        match self {
            Self::Improved(p) | Self::Final(p) => Some(p),
            Self::Error(_) => None,
        }
    }
}

/// Receiver for [`PaletteEvent`]s.
///
/// Called from worker threads while the coordinator holds its exclusive
/// section, so implementations should return quickly and must not start
/// another palette call on the same job. Implemented for any
/// `Fn(PaletteEvent) + Send + Sync` closure, which covers forwarding into an
/// `mpsc` channel:
///
/// ```
/// use std::sync::mpsc;
/// use prism_medoids::{PaletteEvent, PaletteSink};
///
/// let (tx, rx) = mpsc::channel::<PaletteEvent>();
/// let sink = move |event: PaletteEvent| {
///     let _ = tx.send(event);
/// };
/// sink.notify(PaletteEvent::Final(prism_medoids::Palette::unset()));
/// assert!(rx.recv().unwrap().is_final());
/// ```
pub trait PaletteSink: Send + Sync {
    /// Deliver one event.
    fn notify(&self, event: PaletteEvent);
}

impl<F> PaletteSink for F
where
    F: Fn(PaletteEvent) + Send + Sync,
{
    fn notify(&self, event: PaletteEvent) {
        self(event);
    }
}
