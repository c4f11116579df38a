/// Behavior variants that differ between historical interpreters.
///
/// Both toggles default to off, matching the majority of modern ROMs.
/// They are policy, not bugs: a ROM written for the original COSMAC VIP
/// interpreter may require one or both.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    /// The shift instructions load Vy into Vx before shifting, rather
    /// than shifting Vx in place.
    pub shift_loads_vy: bool,
    /// The bulk register store/load instructions leave I pointing one
    /// past the last byte they touched.
    pub index_advances: bool,
}
