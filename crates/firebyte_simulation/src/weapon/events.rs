//! Weapon notifications (ammo counter, muzzle flash, reload animation...)

/// Event emitted by `WeaponState` at the point of the state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeaponEvent {
    Fired,
    AmmoChanged { current: u32, max: u32, reserve: u32 },
    ReloadStarted,
    ReloadFinished,
    ReloadCancelled,
}
