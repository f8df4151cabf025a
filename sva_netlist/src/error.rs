use crate::{IdString, WireId};

/// Structural problems found by [`crate::Module::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlistError {
    /// A wire has no driver.
    #[error("Wire {name} ({wire}) is not driven")]
    Undriven {
        /// The wire.
        wire: WireId,
        /// Its name.
        name: IdString,
    },

    /// A wire has more than one driver.
    #[error("Wire {name} ({wire}) has {count} drivers")]
    MultipleDrivers {
        /// The wire.
        wire: WireId,
        /// Its name.
        name: IdString,
        /// How many drivers were found.
        count: usize,
    },
}
