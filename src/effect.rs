//! Effects - side effects declared by the reducer

use crate::state::RosterEntry;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch the fixed-size roster listing.
    LoadRoster { limit: u16 },
    /// Fetch one roster entry's full record (species comes along as a
    /// byproduct of the shared entry fetch).
    LoadEntry { entry: RosterEntry },
    /// Redundant activation re-fetch; navigation waits on its result.
    PrefetchEntry { id: u16 },
    LoadDetailRecord { id: u16 },
    LoadDetailSpecies { id: u16 },
    /// Fetch the chain document and resolve the single-branch line.
    ResolveEvolutions { id: u16, url: String },
    LoadSprite { id: u16 },
}
